use std::sync::Arc;
use tokio::sync::Mutex;

use crate::catalog::CatalogHandle;
use crate::config::{Config, ConfigError};
use crate::pipeline::Pipeline;
use crate::propagation::Propagator;
use crate::scene::{Camera, OrbitPathCache, SceneScale};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: CatalogHandle,
    pub pipeline: Arc<Mutex<Pipeline>>,
    pub camera: Arc<Mutex<Camera>>,
    pub propagator: Arc<dyn Propagator>,
    pub orbit_cache: Arc<OrbitPathCache>,
    pub scale: SceneScale,
}

impl AppState {
    pub fn new(config: Config, pipeline: Pipeline) -> Result<Self, ConfigError> {
        let scale = config.scene_scale();
        let orbit_cache = OrbitPathCache::new(config.orbit_cache_bucket()?, config.scene.orbit_segments);
        Ok(Self {
            catalog: pipeline.catalog().clone(),
            propagator: pipeline.propagator(),
            pipeline: Arc::new(Mutex::new(pipeline)),
            camera: Arc::new(Mutex::new(Camera::new(scale))),
            orbit_cache: Arc::new(orbit_cache),
            scale,
            config: Arc::new(config),
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::time::Duration;

    use crate::elements::fixtures::{hst_tle, iss_tle};
    use crate::scheduler::tick::stubs::{FlatFrame, StubPropagator};
    use crate::source::StaticSource;

    const CONFIG: &str = r#"
source: { directory: . }
categories:
  STATIONS: {}
  SPECIAL: { pinned_status: stealth }
  GPS: {}
active: [STATIONS]
"#;

    /// State with STATIONS (ISS) loaded and SPECIAL (Hubble) available.
    pub async fn loaded_state() -> AppState {
        let config = Config::from_yaml(CONFIG).unwrap();
        let propagator = Arc::new(StubPropagator::default());
        let source = StaticSource::new()
            .with("STATIONS", iss_tle())
            .with("SPECIAL", hst_tle());
        let mut pipeline = Pipeline::new(
            config.categories.clone(),
            CatalogHandle::new(),
            Arc::new(source),
            propagator,
            Arc::new(FlatFrame),
            Duration::from_secs(3600),
        );
        pipeline
            .set_active_categories(config.active.clone())
            .await
            .unwrap();
        pipeline.settled().await;
        AppState::new(config, pipeline).unwrap()
    }
}
