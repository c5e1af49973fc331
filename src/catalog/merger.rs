use super::status::ObjectStatus;
use super::types::{Catalog, TrackedObject};
use crate::elements::OrbitalElementSet;

/// Parse results of one category fetch.
#[derive(Debug, Clone, Default)]
pub struct CategoryBatch {
    pub category: String,
    pub pinned_status: Option<ObjectStatus>,
    pub elements: Vec<OrbitalElementSet>,
}

/// Builds a fresh catalog from category batches.
///
/// Batches are applied in iteration order, so when the same catalog number
/// appears in several categories the last batch wins.
pub fn merge<'a>(batches: impl IntoIterator<Item = &'a CategoryBatch>) -> Catalog {
    let mut catalog = Catalog::new();

    for batch in batches {
        for elements in &batch.elements {
            let object = TrackedObject::new(elements.clone(), batch.pinned_status);
            if let Some(previous) = catalog.insert(object) {
                log::debug!(
                    "{} ({}) from {} replaced by {}",
                    previous.id,
                    previous.name,
                    previous.category,
                    batch.category
                );
            }
        }
    }

    catalog
}
