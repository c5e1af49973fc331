use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use super::transform::{sample_orbit, SceneScale};
use crate::elements::OrbitalElementSet;
use crate::propagation::{Propagator, Vector3};

type PathKey = (String, String, i64);

/// Sampled orbit paths keyed by (element lines, instant bucket).
///
/// A path is sampled from the start of its bucket, so a cached entry is exactly
/// what [`sample_orbit`] returns for that key. Keying on the element lines
/// keeps a reloaded object with new elements from reusing its old path. Only
/// the current bucket is kept.
pub struct OrbitPathCache {
    bucket_secs: i64,
    segments: usize,
    paths: Mutex<HashMap<PathKey, Arc<Vec<Vector3>>>>,
}

impl OrbitPathCache {
    pub fn new(bucket: Duration, segments: usize) -> Self {
        Self {
            bucket_secs: (bucket.as_secs() as i64).max(1),
            segments,
            paths: Mutex::new(HashMap::new()),
        }
    }

    pub fn bucket_of(&self, at: DateTime<Utc>) -> i64 {
        at.timestamp().div_euclid(self.bucket_secs)
    }

    pub fn bucket_start(&self, bucket: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(bucket * self.bucket_secs, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    pub fn get_or_sample(
        &self,
        elements: &OrbitalElementSet,
        at: DateTime<Utc>,
        propagator: &dyn Propagator,
        scale: &SceneScale,
    ) -> Arc<Vec<Vector3>> {
        let bucket = self.bucket_of(at);
        let key = (elements.line1.clone(), elements.line2.clone(), bucket);

        if let Some(path) = self.lock().get(&key) {
            return path.clone();
        }

        let path = Arc::new(sample_orbit(
            elements,
            self.bucket_start(bucket),
            propagator,
            scale,
            self.segments,
        ));

        let mut paths = self.lock();
        paths.retain(|(_, _, b), _| *b >= bucket);
        paths.insert(key, path.clone());
        path
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathKey, Arc<Vec<Vector3>>>> {
        self.paths.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::fixtures::*;
    use crate::propagation::Sgp4Propagator;
    use crate::scene::ORBIT_SEGMENTS;

    #[test]
    fn same_bucket_reuses_the_path() {
        let cache = OrbitPathCache::new(Duration::from_secs(30), ORBIT_SEGMENTS);
        let set = OrbitalElementSet::from_tle(ISS_NAME, ISS_LINE1, ISS_LINE2, "STATIONS").unwrap();
        let start = cache.bucket_start(cache.bucket_of(set.epoch));

        let a = cache.get_or_sample(&set, start, &Sgp4Propagator, &SceneScale::default());
        let b = cache.get_or_sample(
            &set,
            start + chrono::Duration::seconds(29),
            &Sgp4Propagator,
            &SceneScale::default(),
        );
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), ORBIT_SEGMENTS + 1);
    }

    #[test]
    fn new_bucket_evicts_older_paths() {
        let cache = OrbitPathCache::new(Duration::from_secs(30), 16);
        let set = OrbitalElementSet::from_tle(HST_NAME, HST_LINE1, HST_LINE2, "SPECIAL").unwrap();
        let start = cache.bucket_start(cache.bucket_of(set.epoch));

        let a = cache.get_or_sample(&set, start, &Sgp4Propagator, &SceneScale::default());
        let b = cache.get_or_sample(
            &set,
            start + chrono::Duration::seconds(30),
            &Sgp4Propagator,
            &SceneScale::default(),
        );
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn reloaded_elements_get_a_fresh_path() {
        let cache = OrbitPathCache::new(Duration::from_secs(30), 16);
        let old = OrbitalElementSet::from_tle(ISS_NAME, ISS_LINE1, ISS_LINE2, "STATIONS").unwrap();
        let reloaded = OrbitalElementSet::from_tle(
            ISS_NAME,
            ISS_LINE1,
            "2 25544  51.6461 221.2784 0001413  89.1723 100.4612 15.49507896236009",
            "SPECIAL",
        )
        .unwrap();
        assert_eq!(old.catalog_number, reloaded.catalog_number);
        let start = cache.bucket_start(cache.bucket_of(old.epoch));

        let a = cache.get_or_sample(&old, start, &Sgp4Propagator, &SceneScale::default());
        let b = cache.get_or_sample(&reloaded, start, &Sgp4Propagator, &SceneScale::default());
        assert!(!Arc::ptr_eq(&a, &b));
        assert_ne!(a[0], b[0]);
        assert_eq!(cache.len(), 2);
    }
}
