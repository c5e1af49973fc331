use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use super::types::{Catalog, CatalogSnapshot, DerivedState};

/// Shared handle to the latest published catalog snapshot.
///
/// Readers take an `Arc` to an immutable snapshot; writers replace the whole
/// snapshot, so no reader ever observes a partially applied tick.
#[derive(Debug, Clone, Default)]
pub struct CatalogHandle {
    current: Arc<RwLock<Arc<CatalogSnapshot>>>,
}

impl CatalogHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.read().clone()
    }

    pub fn generation(&self) -> u64 {
        self.read().generation
    }

    /// Starts a new generation with an empty catalog. Results tagged with an
    /// older generation are rejected from now on.
    pub fn begin_generation(&self) -> u64 {
        let mut current = self.write();
        let next = CatalogSnapshot {
            generation: current.generation + 1,
            version: current.version + 1,
            rebuild: current.rebuild + 1,
            computed_at: None,
            objects: Catalog::new(),
        };
        let generation = next.generation;
        *current = Arc::new(next);
        generation
    }

    /// Publishes a rebuilt catalog whose state was computed at `computed_at`.
    pub fn publish_rebuild(
        &self,
        generation: u64,
        objects: Catalog,
        computed_at: DateTime<Utc>,
    ) -> bool {
        let mut current = self.write();
        if current.generation != generation {
            log::debug!("discarding rebuild for stale generation {generation}");
            return false;
        }
        *current = Arc::new(CatalogSnapshot {
            generation,
            version: current.version + 1,
            rebuild: current.rebuild + 1,
            computed_at: Some(computed_at),
            objects,
        });
        true
    }

    /// Publishes the results of one tick started at `computed_at`, computed
    /// against the object set of rebuild `base`.
    pub fn publish_tick(
        &self,
        generation: u64,
        base: u64,
        computed_at: DateTime<Utc>,
        derived: &HashMap<String, DerivedState>,
    ) -> bool {
        let mut current = self.write();
        if current.generation != generation {
            log::debug!("discarding tick for stale generation {generation}");
            return false;
        }
        if current.rebuild != base {
            log::debug!("discarding tick computed against replaced object set {base}");
            return false;
        }
        if current.computed_at.is_some_and(|published| computed_at < published) {
            log::debug!("discarding tick at {computed_at}, snapshot is newer");
            return false;
        }

        let mut objects = current.objects.clone();
        objects.apply_derived(derived);
        *current = Arc::new(CatalogSnapshot {
            generation,
            version: current.version + 1,
            rebuild: current.rebuild,
            computed_at: Some(computed_at),
            objects,
        });
        true
    }

    fn read(&self) -> RwLockReadGuard<'_, Arc<CatalogSnapshot>> {
        self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Arc<CatalogSnapshot>> {
        self.current.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{merge, CategoryBatch, ObjectStatus};
    use crate::elements::{fixtures::*, parse_elements};

    fn stations() -> Catalog {
        merge(&[CategoryBatch {
            category: "STATIONS".into(),
            pinned_status: None,
            elements: parse_elements(&format!("{}{}", iss_tle(), hst_tle()), "STATIONS"),
        }])
    }

    fn degraded() -> HashMap<String, DerivedState> {
        HashMap::from([(
            "25544".to_string(),
            DerivedState::without_state(ObjectStatus::Degraded),
        )])
    }

    #[test]
    fn rebuild_from_old_generation_is_discarded() {
        let handle = CatalogHandle::new();
        let old = handle.begin_generation();
        let new = handle.begin_generation();
        assert!(!handle.publish_rebuild(old, stations(), Utc::now()));
        assert!(handle.snapshot().objects.is_empty());
        assert!(handle.publish_rebuild(new, stations(), Utc::now()));
        assert_eq!(handle.snapshot().objects.len(), 2);
    }

    #[test]
    fn tick_keeps_objects_missing_from_results() {
        let handle = CatalogHandle::new();
        let generation = handle.begin_generation();
        let start = Utc::now();
        handle.publish_rebuild(generation, stations(), start);

        let base = handle.snapshot().rebuild;
        assert!(handle.publish_tick(generation, base, start + chrono::Duration::seconds(1), &degraded()));
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.objects.len(), 2);
        assert_eq!(snapshot.objects.get("25544").unwrap().status, ObjectStatus::Degraded);
        assert_eq!(snapshot.objects.get("20580").unwrap().status, ObjectStatus::Operational);
    }

    #[test]
    fn stale_tick_is_not_applied() {
        let handle = CatalogHandle::new();
        let generation = handle.begin_generation();
        let start = Utc::now();
        handle.publish_rebuild(generation, stations(), start);
        let snapshot = handle.snapshot();

        assert!(!handle.publish_tick(
            generation,
            snapshot.rebuild,
            start - chrono::Duration::seconds(1),
            &degraded()
        ));
        assert_eq!(handle.snapshot().version, snapshot.version);
    }

    #[test]
    fn tick_against_replaced_object_set_is_not_applied() {
        let handle = CatalogHandle::new();
        let generation = handle.begin_generation();
        let start = Utc::now();
        handle.publish_rebuild(generation, stations(), start);

        // a tick reads this snapshot, then a later category settles
        let base = handle.snapshot();
        let rebuilt = merge(&[
            CategoryBatch {
                category: "STATIONS".into(),
                pinned_status: None,
                elements: parse_elements(&iss_tle(), "STATIONS"),
            },
            CategoryBatch {
                category: "SPECIAL".into(),
                pinned_status: None,
                elements: parse_elements(&iss_tle(), "SPECIAL"),
            },
        ]);
        assert!(handle.publish_rebuild(generation, rebuilt, start + chrono::Duration::milliseconds(10)));

        let deorbited = HashMap::from([(
            "25544".to_string(),
            DerivedState::without_state(ObjectStatus::Deorbited),
        )]);
        let tick_start = start + chrono::Duration::milliseconds(20);
        assert!(!handle.publish_tick(generation, base.rebuild, tick_start, &deorbited));

        let snapshot = handle.snapshot();
        let iss = snapshot.objects.get("25544").unwrap();
        assert_eq!(iss.category, "SPECIAL");
        assert_eq!(iss.status, ObjectStatus::Operational);

        // the next tick reads the rebuilt set and applies
        assert!(handle.publish_tick(generation, snapshot.rebuild, tick_start, &degraded()));
        assert_eq!(handle.snapshot().objects.get("25544").unwrap().status, ObjectStatus::Degraded);
        assert_eq!(handle.snapshot().version, version);
    }

    #[test]
    fn readers_keep_their_snapshot() {
        let handle = CatalogHandle::new();
        let generation = handle.begin_generation();
        handle.publish_rebuild(generation, stations(), Utc::now());

        let before = handle.snapshot();
        handle.begin_generation();
        assert_eq!(before.objects.len(), 2);
        assert!(handle.snapshot().objects.is_empty());
    }
}
