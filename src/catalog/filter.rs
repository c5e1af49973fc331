use serde::Deserialize;
use utoipa::IntoParams;

use super::types::{CatalogSnapshot, TrackedObject};

/// List filter: free-text search plus an inclusive altitude window.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ObjectFilter {
    /// Case-insensitive match against the name, or a substring of the id.
    pub search: Option<String>,
    pub min_altitude_km: Option<f64>,
    pub max_altitude_km: Option<f64>,
}

impl ObjectFilter {
    pub fn matches(&self, object: &TrackedObject) -> bool {
        self.matches_search(object) && self.matches_altitude(object)
    }

    fn matches_search(&self, object: &TrackedObject) -> bool {
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                object.name.to_lowercase().contains(&term.to_lowercase()) || object.id.contains(term)
            }
        }
    }

    // Objects without a location yet are always listed.
    fn matches_altitude(&self, object: &TrackedObject) -> bool {
        let Some(altitude) = object.altitude_km() else {
            return true;
        };
        self.min_altitude_km.map_or(true, |min| altitude >= min)
            && self.max_altitude_km.map_or(true, |max| altitude <= max)
    }

    pub fn apply<'a>(&self, snapshot: &'a CatalogSnapshot) -> Vec<&'a TrackedObject> {
        snapshot
            .objects
            .sorted()
            .into_iter()
            .filter(|object| self.matches(object))
            .collect()
    }
}
