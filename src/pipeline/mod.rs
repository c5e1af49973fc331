mod error;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::{JoinHandle, JoinSet};

use crate::catalog::{merge, CatalogHandle, CategoryBatch};
use crate::config::{CategoryConfig, Config, ConfigError};
use crate::elements::parse_elements;
use crate::propagation::{FrameConverter, Propagator, Sgp4Propagator, SiderealFrame};
use crate::scheduler::{initialize, Scheduler};
use crate::source::{DirectorySource, ElementSource};

pub use error::PipelineError;

#[derive(Clone)]
struct Collaborators {
    catalog: CatalogHandle,
    source: Arc<dyn ElementSource>,
    propagator: Arc<dyn Propagator>,
    frames: Arc<dyn FrameConverter>,
    scheduler: Arc<Mutex<Scheduler>>,
}

/// Owns the active category set and everything derived from it.
///
/// Each change of the category set starts a new catalog generation: in-flight
/// fetches are aborted, the scheduler is stopped, and late results from the
/// previous generation are rejected by the [`CatalogHandle`].
pub struct Pipeline {
    categories: BTreeMap<String, CategoryConfig>,
    active: Vec<String>,
    parts: Collaborators,
    loader: Option<JoinHandle<()>>,
}

impl Pipeline {
    pub fn new(
        categories: BTreeMap<String, CategoryConfig>,
        catalog: CatalogHandle,
        source: Arc<dyn ElementSource>,
        propagator: Arc<dyn Propagator>,
        frames: Arc<dyn FrameConverter>,
        period: Duration,
    ) -> Self {
        let scheduler = Scheduler::new(catalog.clone(), propagator.clone(), frames.clone(), period);
        Self {
            categories,
            active: Vec::new(),
            parts: Collaborators {
                catalog,
                source,
                propagator,
                frames,
                scheduler: Arc::new(Mutex::new(scheduler)),
            },
            loader: None,
        }
    }

    /// Default wiring: element files from the configured directory, SGP4 and
    /// the sidereal-rotation geodetic frame.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.categories.clone(),
            CatalogHandle::new(),
            Arc::new(DirectorySource::new(config.source.directory.clone())),
            Arc::new(Sgp4Propagator),
            Arc::new(SiderealFrame),
            config.tick_period()?,
        ))
    }

    pub fn propagator(&self) -> Arc<dyn Propagator> {
        self.parts.propagator.clone()
    }

    pub fn catalog(&self) -> &CatalogHandle {
        &self.parts.catalog
    }

    pub fn active(&self) -> &[String] {
        &self.active
    }

    pub async fn is_ticking(&self) -> bool {
        self.parts.scheduler.lock().await.is_running()
    }

    /// Replaces the active category set and starts a full rebuild. Returns the
    /// new generation.
    pub async fn set_active_categories(
        &mut self,
        requested: Vec<String>,
    ) -> Result<u64, PipelineError> {
        let mut active: Vec<String> = Vec::with_capacity(requested.len());
        for key in requested {
            if !self.categories.contains_key(&key) {
                return Err(PipelineError::UnknownCategory(key));
            }
            if !active.contains(&key) {
                active.push(key);
            }
        }

        if let Some(loader) = self.loader.take() {
            loader.abort();
            let _ = loader.await;
        }
        self.parts.scheduler.lock().await.stop().await;

        let generation = self.parts.catalog.begin_generation();
        self.active = active.clone();
        log::info!("generation {generation}: active categories {active:?}");

        if active.is_empty() {
            return Ok(generation);
        }

        let requests = active
            .into_iter()
            .map(|key| {
                let category = self.categories.get(&key).cloned().unwrap_or_default();
                (key, category)
            })
            .collect();
        self.loader = Some(tokio::spawn(load_generation(
            self.parts.clone(),
            generation,
            requests,
        )));
        Ok(generation)
    }

    /// Waits until every category of the current generation has settled.
    pub async fn settled(&mut self) {
        if let Some(loader) = self.loader.take() {
            let _ = loader.await;
        }
    }

    pub async fn shutdown(&mut self) {
        if let Some(loader) = self.loader.take() {
            loader.abort();
            let _ = loader.await;
        }
        self.parts.scheduler.lock().await.stop().await;
    }
}

/// Fetches all categories concurrently and republishes the catalog as each one
/// settles, so a slow category never hides the ones that already arrived.
async fn load_generation(
    parts: Collaborators,
    generation: u64,
    requests: Vec<(String, CategoryConfig)>,
) {
    let mut fetches = JoinSet::new();
    for (index, (key, category)) in requests.iter().cloned().enumerate() {
        let source = parts.source.clone();
        fetches.spawn(async move {
            let result = source.fetch(&key, &category).await;
            let batch = match result {
                Ok(text) => {
                    let elements = parse_elements(&text, &key);
                    log::info!("{key}: {} element sets", elements.len());
                    elements
                }
                Err(e) => {
                    log::warn!("{key}: fetch failed: {e}");
                    Vec::new()
                }
            };
            (
                index,
                CategoryBatch {
                    category: key,
                    pinned_status: category.pinned_status,
                    elements: batch,
                },
            )
        });
    }

    let mut settled: Vec<Option<CategoryBatch>> = vec![None; requests.len()];
    while let Some(joined) = fetches.join_next().await {
        match joined {
            Ok((index, batch)) => settled[index] = Some(batch),
            Err(e) => {
                log::error!("category fetch task failed: {e}");
                continue;
            }
        }

        let mut objects = merge(settled.iter().flatten());
        let computed_at = Utc::now();
        initialize(
            &mut objects,
            computed_at,
            parts.propagator.as_ref(),
            parts.frames.as_ref(),
        );
        let count = objects.len();
        if !parts.catalog.publish_rebuild(generation, objects, computed_at) {
            return;
        }
        log::info!(
            "generation {generation}: published {count} objects ({} of {} categories settled)",
            settled.iter().flatten().count(),
            requests.len()
        );

        let mut scheduler = parts.scheduler.lock().await;
        if count > 0 {
            scheduler.start(generation).await;
        } else {
            scheduler.stop().await;
        }
    }
}
