use std::f64::consts::PI;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::Vector3;

// WGS-72, matching the SGP4 gravity model.
const WGS72_A_KM: f64 = 6378.135;
const WGS72_F: f64 = 1.0 / 298.26;
const GEODETIC_ITERATIONS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct GeodeticLocation {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub height_km: f64,
}

/// Converts inertial positions to locations on the rotating Earth.
pub trait FrameConverter: Send + Sync {
    fn to_geodetic(&self, position: &Vector3, at: DateTime<Utc>) -> GeodeticLocation;
}

/// Greenwich sidereal rotation followed by an iterative geodetic solution.
#[derive(Debug, Clone, Copy, Default)]
pub struct SiderealFrame;

impl SiderealFrame {
    pub fn sidereal_time(at: DateTime<Utc>) -> f64 {
        sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&at.naive_utc()))
    }
}

impl FrameConverter for SiderealFrame {
    fn to_geodetic(&self, position: &Vector3, at: DateTime<Utc>) -> GeodeticLocation {
        let ecef = teme_to_ecef_position(position, Self::sidereal_time(at));
        ecef_to_geodetic(&ecef)
    }
}

fn teme_to_ecef_position(pos_teme: &Vector3, gmst: f64) -> Vector3 {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    Vector3::new(
        pos_teme.x * cos_gmst + pos_teme.y * sin_gmst,
        -pos_teme.x * sin_gmst + pos_teme.y * cos_gmst,
        pos_teme.z,
    )
}

fn ecef_to_geodetic(ecef: &Vector3) -> GeodeticLocation {
    let e2 = 2.0 * WGS72_F - WGS72_F * WGS72_F;
    let r = ecef.x.hypot(ecef.y);

    let longitude = wrap_pi(ecef.y.atan2(ecef.x));
    let mut latitude = ecef.z.atan2(r);
    let mut c = 1.0;
    for _ in 0..GEODETIC_ITERATIONS {
        let sin_lat = latitude.sin();
        c = 1.0 / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        latitude = (ecef.z + WGS72_A_KM * c * e2 * sin_lat).atan2(r);
    }
    let height = r / latitude.cos() - WGS72_A_KM * c;

    GeodeticLocation {
        latitude_deg: latitude.to_degrees(),
        longitude_deg: longitude.to_degrees(),
        height_km: height,
    }
}

fn wrap_pi(angle: f64) -> f64 {
    (angle + PI).rem_euclid(2.0 * PI) - PI
}
