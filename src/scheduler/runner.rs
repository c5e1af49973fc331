use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::tick::compute_tick;
use crate::catalog::CatalogHandle;
use crate::propagation::{FrameConverter, Propagator};

#[derive(Debug)]
struct WorkerHandle {
    generation: u64,
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

/// Periodically re-propagates the published catalog.
///
/// One worker runs at a time and ticks run back to back on its task, so a slow
/// tick delays the next one instead of overlapping it.
pub struct Scheduler {
    catalog: CatalogHandle,
    propagator: Arc<dyn Propagator>,
    frames: Arc<dyn FrameConverter>,
    period: Duration,
    worker: Option<WorkerHandle>,
}

impl Scheduler {
    pub fn new(
        catalog: CatalogHandle,
        propagator: Arc<dyn Propagator>,
        frames: Arc<dyn FrameConverter>,
        period: Duration,
    ) -> Self {
        Self {
            catalog,
            propagator,
            frames,
            period,
            worker: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.join.is_finished())
    }

    /// Starts ticking for `generation` unless a worker for it is already alive.
    pub async fn start(&mut self, generation: u64) {
        if let Some(worker) = &self.worker {
            if worker.generation == generation && !worker.join.is_finished() {
                return;
            }
        }
        self.stop().await;

        let (stop_tx, stop_rx) = oneshot::channel();
        let join = tokio::spawn(run_tick_loop(
            self.catalog.clone(),
            self.propagator.clone(),
            self.frames.clone(),
            generation,
            self.period,
            stop_rx,
        ));
        log::info!(
            "scheduler started for generation {generation} (period {})",
            humantime::format_duration(self.period)
        );
        self.worker = Some(WorkerHandle {
            generation,
            stop_tx,
            join,
        });
    }

    pub async fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(());
            let _ = worker.join.await;
            log::info!("scheduler stopped for generation {}", worker.generation);
        }
    }
}

async fn run_tick_loop(
    catalog: CatalogHandle,
    propagator: Arc<dyn Propagator>,
    frames: Arc<dyn FrameConverter>,
    generation: u64,
    period: Duration,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately; initial state is already published.
    ticker.tick().await;

    loop {
        let should_stop = tokio::select! {
            _ = ticker.tick() => false,
            _ = &mut stop_rx => true,
        };
        if should_stop {
            return;
        }

        let snapshot = catalog.snapshot();
        if snapshot.generation != generation {
            log::debug!("generation {generation} superseded, tick loop exiting");
            return;
        }
        if snapshot.objects.is_empty() {
            log::debug!("catalog is empty, tick loop exiting");
            return;
        }

        let started = Utc::now();
        let derived = compute_tick(&snapshot.objects, started, propagator.as_ref(), frames.as_ref());
        catalog.publish_tick(generation, snapshot.rebuild, started, &derived);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{merge, CategoryBatch, ObjectStatus};
    use crate::elements::{fixtures::*, parse_elements};
    use crate::propagation::PropagationError;
    use crate::scheduler::tick::stubs::{FlatFrame, StubPropagator};

    fn publish_stations(handle: &CatalogHandle) -> u64 {
        let generation = handle.begin_generation();
        let objects = merge(&[CategoryBatch {
            category: "STATIONS".into(),
            pinned_status: None,
            elements: parse_elements(&iss_tle(), "STATIONS"),
        }]);
        handle.publish_rebuild(generation, objects, Utc::now());
        generation
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_until_stopped() {
        let handle = CatalogHandle::new();
        let propagator = Arc::new(StubPropagator::default());
        propagator.set("25544", Err(PropagationError::Fault("nan".into())));
        let mut scheduler = Scheduler::new(
            handle.clone(),
            propagator.clone(),
            Arc::new(FlatFrame),
            Duration::from_secs(1),
        );

        let generation = publish_stations(&handle);
        scheduler.start(generation).await;
        tokio::time::sleep(Duration::from_millis(3500)).await;

        assert_eq!(propagator.calls(), 3);
        let snapshot = handle.snapshot();
        assert_eq!(snapshot.objects.get("25544").unwrap().status, ObjectStatus::Degraded);

        scheduler.stop().await;
        assert!(!scheduler.is_running());
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(propagator.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exits_when_generation_changes() {
        let handle = CatalogHandle::new();
        let propagator = Arc::new(StubPropagator::default());
        let mut scheduler = Scheduler::new(
            handle.clone(),
            propagator.clone(),
            Arc::new(FlatFrame),
            Duration::from_secs(1),
        );

        let generation = publish_stations(&handle);
        scheduler.start(generation).await;
        handle.begin_generation();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(propagator.calls(), 0);
        assert!(!scheduler.is_running());
    }
}
