use chrono::{DateTime, Utc};
use serde::Serialize;
use sgp4::Constants;

use super::error::PropagationError;
use super::{Vector3, EARTH_EQUATORIAL_RADIUS_KM};
use crate::elements::OrbitalElementSet;

/// Inertial (TEME) position and velocity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateVector {
    pub position: Vector3,
    pub velocity: Vector3,
}

/// Estimates an object's inertial state at an instant from its elements.
///
/// Implementations must be deterministic for a given `(elements, at)` pair.
pub trait Propagator: Send + Sync {
    fn propagate(
        &self,
        elements: &OrbitalElementSet,
        at: DateTime<Utc>,
    ) -> Result<StateVector, PropagationError>;
}

/// SGP4 propagation through the `sgp4` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sgp4Propagator;

impl Propagator for Sgp4Propagator {
    fn propagate(
        &self,
        elements: &OrbitalElementSet,
        at: DateTime<Utc>,
    ) -> Result<StateVector, PropagationError> {
        let sgp4_elements = elements.sgp4_elements();
        let minutes = sgp4_elements
            .datetime_to_minutes_since_epoch(&at.naive_utc())
            .map_err(|e| PropagationError::Fault(e.to_string()))?;
        let constants = Constants::from_elements(sgp4_elements)
            .map_err(|e| PropagationError::Fault(e.to_string()))?;

        let prediction = constants
            .propagate(minutes)
            .map_err(|e| PropagationError::NonPhysical(e.to_string()))?;

        let position = Vector3::from(prediction.position);
        let velocity = Vector3::from(prediction.velocity);

        if !position.iter().chain(velocity.iter()).all(|v| v.is_finite()) {
            return Err(PropagationError::Fault("non-finite state vector".into()));
        }
        if position.norm() < EARTH_EQUATORIAL_RADIUS_KM {
            return Err(PropagationError::NonPhysical(format!(
                "decayed (radius {:.1} km)",
                position.norm()
            )));
        }

        Ok(StateVector { position, velocity })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::fixtures::*;

    #[test]
    fn iss_at_epoch_is_in_low_earth_orbit() {
        let set = OrbitalElementSet::from_tle(ISS_NAME, ISS_LINE1, ISS_LINE2, "STATIONS").unwrap();
        let state = Sgp4Propagator.propagate(&set, set.epoch).unwrap();

        let radius = state.position.norm();
        assert!(radius > 6600.0 && radius < 6900.0, "radius {radius}");
        let speed = state.velocity.norm();
        assert!(speed > 7.5 && speed < 7.9, "speed {speed}");
    }

    #[test]
    fn propagation_is_deterministic() {
        let set = OrbitalElementSet::from_tle(HST_NAME, HST_LINE1, HST_LINE2, "SPECIAL").unwrap();
        let at = set.epoch + chrono::Duration::minutes(42);
        let a = Sgp4Propagator.propagate(&set, at).unwrap();
        let b = Sgp4Propagator.propagate(&set, at).unwrap();
        assert_eq!(a, b);
    }
}
