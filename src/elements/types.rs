use std::f64::consts::TAU;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sgp4::{Constants, Elements};
use utoipa::ToSchema;

use super::error::ElementError;

const MINUTES_PER_DAY: f64 = 1440.0;

/// Immutable orbital elements of one tracked object, as parsed from a TLE.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrbitalElementSet {
    pub catalog_number: String,
    pub name: String,
    pub category: String,
    pub international_designator: Option<String>,
    pub epoch: DateTime<Utc>,
    /// Mean motion in radians per minute.
    pub mean_motion: f64,
    pub inclination_deg: f64,
    pub eccentricity: f64,
    pub right_ascension_deg: f64,
    pub argument_of_perigee_deg: f64,
    pub mean_anomaly_deg: f64,
    pub line1: String,
    pub line2: String,
    #[serde(skip)]
    elements: Elements,
}

impl OrbitalElementSet {
    /// Builds an element set from the two TLE lines, rejecting anything the
    /// SGP4 model cannot be initialised from.
    pub fn from_tle(
        name: &str,
        line1: &str,
        line2: &str,
        category: &str,
    ) -> Result<Self, ElementError> {
        let elements = Elements::from_tle(
            Some(name.to_string()),
            line1.as_bytes(),
            line2.as_bytes(),
        )?;
        Constants::from_elements(&elements)?;

        Ok(Self {
            catalog_number: elements.norad_id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            international_designator: elements.international_designator.clone(),
            epoch: elements.datetime.and_utc(),
            mean_motion: elements.mean_motion * TAU / MINUTES_PER_DAY,
            inclination_deg: elements.inclination,
            eccentricity: elements.eccentricity,
            right_ascension_deg: elements.right_ascension,
            argument_of_perigee_deg: elements.argument_of_perigee,
            mean_anomaly_deg: elements.mean_anomaly,
            line1: line1.to_string(),
            line2: line2.to_string(),
            elements,
        })
    }

    pub fn sgp4_elements(&self) -> &Elements {
        &self.elements
    }

    /// Orbital period in minutes, `None` for a non-positive mean motion.
    pub fn period_minutes(&self) -> Option<f64> {
        (self.mean_motion > 0.0).then(|| TAU / self.mean_motion)
    }
}
