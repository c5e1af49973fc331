use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::catalog::{transition, Catalog, DerivedState, ObjectStatus, Outcome, TrackedObject};
use crate::propagation::{FrameConverter, PropagationError, Propagator, StateVector};

/// Derives one object's state at `at`.
pub fn derive_state(
    object: &TrackedObject,
    at: DateTime<Utc>,
    propagator: &dyn Propagator,
    frames: &dyn FrameConverter,
) -> DerivedState {
    let result = propagator.propagate(&object.elements, at);
    let outcome = match &result {
        Ok(_) => Outcome::Propagated,
        Err(PropagationError::NonPhysical(_)) => Outcome::NonPhysical,
        Err(PropagationError::Fault(_)) => Outcome::Fault,
    };
    let status = transition(object.status, object.pinned_status, outcome);

    if status != object.status {
        match (&result, status) {
            (Err(e), ObjectStatus::Deorbited) => {
                log::info!("{} ({}) deorbited: {e}", object.id, object.name)
            }
            (Err(e), ObjectStatus::Degraded) => {
                log::warn!("{} ({}) degraded: {e}", object.id, object.name)
            }
            _ => log::info!("{} ({}) is now {status}", object.id, object.name),
        }
    }

    match result {
        Ok(StateVector { position, velocity }) if !status.is_sticky() => DerivedState {
            status,
            inertial_position: Some(position),
            inertial_velocity: Some(velocity),
            geodetic_location: Some(frames.to_geodetic(&position, at)),
        },
        _ => DerivedState::without_state(status),
    }
}

/// Computes the full replacement set of derived state for one tick.
pub fn compute_tick(
    catalog: &Catalog,
    at: DateTime<Utc>,
    propagator: &dyn Propagator,
    frames: &dyn FrameConverter,
) -> HashMap<String, DerivedState> {
    catalog
        .iter()
        .map(|object| (object.id.clone(), derive_state(object, at, propagator, frames)))
        .collect()
}

/// Computes initial state for a freshly merged catalog in place.
pub fn initialize(
    catalog: &mut Catalog,
    at: DateTime<Utc>,
    propagator: &dyn Propagator,
    frames: &dyn FrameConverter,
) {
    let derived = compute_tick(catalog, at, propagator, frames);
    catalog.apply_derived(&derived);
}

#[cfg(test)]
pub(crate) mod stubs {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use chrono::{DateTime, Utc};

    use crate::elements::OrbitalElementSet;
    use crate::propagation::{
        FrameConverter, GeodeticLocation, PropagationError, Propagator, StateVector, Vector3,
    };

    /// Scripted propagator: per-object outcome, successful by default.
    #[derive(Default)]
    pub struct StubPropagator {
        pub outcomes: Mutex<HashMap<String, Result<(), PropagationError>>>,
        pub calls: AtomicUsize,
    }

    impl StubPropagator {
        pub fn set(&self, id: &str, outcome: Result<(), PropagationError>) {
            self.outcomes.lock().unwrap().insert(id.to_string(), outcome);
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Propagator for StubPropagator {
        fn propagate(
            &self,
            elements: &OrbitalElementSet,
            at: DateTime<Utc>,
        ) -> Result<StateVector, PropagationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(Err(e)) = self.outcomes.lock().unwrap().get(&elements.catalog_number) {
                return Err(e.clone());
            }
            let phase = (at.timestamp() % 360) as f64;
            Ok(StateVector {
                position: Vector3::new(7000.0 * phase.to_radians().cos(), 0.0, 7000.0 * phase.to_radians().sin()),
                velocity: Vector3::new(0.0, 7.5, 0.0),
            })
        }
    }

    pub struct FlatFrame;

    impl FrameConverter for FlatFrame {
        fn to_geodetic(&self, position: &Vector3, _at: DateTime<Utc>) -> GeodeticLocation {
            GeodeticLocation {
                latitude_deg: 0.0,
                longitude_deg: 0.0,
                height_km: position.norm() - 6371.0,
            }
        }
    }
}
