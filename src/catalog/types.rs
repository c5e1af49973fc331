use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use utoipa::ToSchema;

use super::status::ObjectStatus;
use crate::elements::OrbitalElementSet;
use crate::propagation::{GeodeticLocation, Vector3};

/// Time-varying state derived by one propagation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedState {
    pub status: ObjectStatus,
    pub inertial_position: Option<Vector3>,
    pub inertial_velocity: Option<Vector3>,
    pub geodetic_location: Option<GeodeticLocation>,
}

impl DerivedState {
    pub fn without_state(status: ObjectStatus) -> Self {
        Self {
            status,
            inertial_position: None,
            inertial_velocity: None,
            geodetic_location: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TrackedObject {
    pub id: String,
    pub name: String,
    pub category: String,
    pub status: ObjectStatus,
    #[schema(value_type = Option<Vec<f64>>)]
    pub inertial_position: Option<Vector3>,
    #[schema(value_type = Option<Vec<f64>>)]
    pub inertial_velocity: Option<Vector3>,
    pub geodetic_location: Option<GeodeticLocation>,
    #[serde(skip)]
    pub pinned_status: Option<ObjectStatus>,
    #[serde(skip)]
    pub elements: Arc<OrbitalElementSet>,
}

impl TrackedObject {
    pub fn new(elements: OrbitalElementSet, pinned_status: Option<ObjectStatus>) -> Self {
        Self {
            id: elements.catalog_number.clone(),
            name: elements.name.clone(),
            category: elements.category.clone(),
            status: pinned_status.unwrap_or(ObjectStatus::Operational),
            inertial_position: None,
            inertial_velocity: None,
            geodetic_location: None,
            pinned_status,
            elements: Arc::new(elements),
        }
    }

    pub fn apply(&mut self, derived: &DerivedState) {
        self.status = derived.status;
        self.inertial_position = derived.inertial_position;
        self.inertial_velocity = derived.inertial_velocity;
        self.geodetic_location = derived.geodetic_location;
    }

    #[cfg(test)]
    pub fn derived(&self) -> DerivedState {
        DerivedState {
            status: self.status,
            inertial_position: self.inertial_position,
            inertial_velocity: self.inertial_velocity,
            geodetic_location: self.geodetic_location,
        }
    }

    pub fn speed_km_s(&self) -> Option<f64> {
        self.inertial_velocity.map(|v| v.norm())
    }

    pub fn altitude_km(&self) -> Option<f64> {
        self.geodetic_location.map(|l| l.height_km)
    }
}

/// Tracked objects keyed by catalog number.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    objects: HashMap<String, TrackedObject>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an object, returning the one it replaced.
    pub fn insert(&mut self, object: TrackedObject) -> Option<TrackedObject> {
        self.objects.insert(object.id.clone(), object)
    }

    pub fn get(&self, id: &str) -> Option<&TrackedObject> {
        self.objects.get(id)
    }

    #[cfg(test)]
    pub fn get_mut(&mut self, id: &str) -> Option<&mut TrackedObject> {
        self.objects.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedObject> {
        self.objects.values()
    }

    /// Objects ordered by catalog number, for stable listings.
    pub fn sorted(&self) -> Vec<&TrackedObject> {
        let mut objects: Vec<_> = self.objects.values().collect();
        objects.sort_by(|a, b| a.id.cmp(&b.id));
        objects
    }

    /// Applies a tick's results. Objects without an entry in `derived` keep
    /// their state, entries for unknown ids are ignored.
    pub fn apply_derived(&mut self, derived: &HashMap<String, DerivedState>) {
        for (id, state) in derived {
            if let Some(object) = self.objects.get_mut(id) {
                object.apply(state);
            }
        }
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.sorted())
    }
}

/// One immutable published version of the catalog.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogSnapshot {
    /// Bumped whenever the active category set changes.
    pub generation: u64,
    /// Bumped on every publish.
    pub version: u64,
    /// Bumped whenever the object set is replaced. Ticks computed against an
    /// older object set are rejected.
    #[serde(skip)]
    pub rebuild: u64,
    /// Instant the derived state reflects.
    pub computed_at: Option<DateTime<Utc>>,
    pub objects: Catalog,
}
