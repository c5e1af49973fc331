use chrono::{DateTime, TimeDelta, Utc};

use crate::elements::OrbitalElementSet;
use crate::propagation::{GeodeticLocation, Propagator, Vector3};

/// Segments of a sampled orbit loop; the loop has one more point than this.
pub const ORBIT_SEGMENTS: usize = 128;

/// Mapping between physical kilometres and scene units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneScale {
    pub earth_radius_km: f64,
    pub render_radius: f64,
}

impl Default for SceneScale {
    fn default() -> Self {
        Self {
            earth_radius_km: 6371.0,
            render_radius: 2.5,
        }
    }
}

impl SceneScale {
    /// Kilometres per scene unit.
    pub fn factor(&self) -> f64 {
        self.earth_radius_km / self.render_radius
    }

    /// Scene point of a geodetic location, lifted above the globe by its height.
    pub fn geodetic_position(&self, location: &GeodeticLocation) -> Vector3 {
        let radius = self.render_radius * (self.earth_radius_km + location.height_km) / self.earth_radius_km;
        geodetic_to_scene(location.longitude_deg, location.latitude_deg, radius)
    }
}

/// Point on a sphere of `radius` for a longitude/latitude in degrees.
///
/// The polar axis maps to scene `y`; longitude is offset by 180°.
pub fn geodetic_to_scene(longitude_deg: f64, latitude_deg: f64, radius: f64) -> Vector3 {
    let phi = (90.0 - latitude_deg).to_radians();
    let theta = (longitude_deg + 180.0).to_radians();
    Vector3::new(
        -(radius * phi.sin() * theta.cos()),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// Inertial kilometres to scene units: `(x, z, -y) / factor`.
pub fn inertial_to_scene(inertial: &Vector3, scale: &SceneScale) -> Vector3 {
    Vector3::new(inertial.x, inertial.z, -inertial.y) / scale.factor()
}

/// Samples one full orbit starting at `start` and returns the valid points in
/// scene coordinates. Instants that fail to propagate are skipped.
pub fn sample_orbit(
    elements: &OrbitalElementSet,
    start: DateTime<Utc>,
    propagator: &dyn Propagator,
    scale: &SceneScale,
    segments: usize,
) -> Vec<Vector3> {
    let Some(period_minutes) = elements.period_minutes() else {
        return Vec::new();
    };
    let segments = segments.max(1);
    let period_ms = period_minutes * 60_000.0;

    (0..=segments)
        .filter_map(|i| {
            let Some(at) = offset_instant(start, i as f64 / segments as f64 * period_ms) else {
                log::debug!("{}: orbit sample {i} is out of the representable time range", elements.catalog_number);
                return None;
            };
            match propagator.propagate(elements, at) {
                Ok(state) => Some(inertial_to_scene(&state.position, scale)),
                Err(e) => {
                    log::debug!("{}: orbit sample {i} skipped: {e}", elements.catalog_number);
                    None
                }
            }
        })
        .collect()
}

fn offset_instant(start: DateTime<Utc>, offset_ms: f64) -> Option<DateTime<Utc>> {
    let offset_ms = offset_ms.round();
    if !offset_ms.is_finite() || offset_ms.abs() >= i64::MAX as f64 {
        return None;
    }
    start.checked_add_signed(TimeDelta::try_milliseconds(offset_ms as i64)?)
}
