//! Synthetic telemetry loop.
//!
//! Every tick ingests one random sample per registered slice through the orchestrator, exactly
//! like an external telemetry sender would.

use rand::Rng;
use slice_core::{SliceOrchestrator, TelemetrySample};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

pub struct MetricSimulator {
    orchestrator: Arc<SliceOrchestrator>,
    interval: Duration,
}

impl MetricSimulator {
    pub fn new(orchestrator: Arc<SliceOrchestrator>, interval: Duration) -> Self {
        Self {
            orchestrator,
            interval,
        }
    }

    /// Runs until `shutdown` flips to `true` or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(interval_secs = self.interval.as_secs(), "metric simulator started");
        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {
                    let ingested = self.tick().await;
                    debug!(ingested, "simulated telemetry round");
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("metric simulator stopped");
    }

    /// One telemetry round. Returns the number of samples ingested.
    pub async fn tick(&self) -> usize {
        let slice_ids = self.orchestrator.registry().slice_ids().await;
        let samples: Vec<(String, TelemetrySample)> = {
            let mut rng = rand::thread_rng();
            slice_ids
                .into_iter()
                .map(|id| (id, random_sample(&mut rng)))
                .collect()
        };

        let count = samples.len();
        for (slice_id, sample) in samples {
            self.orchestrator.ingest_metric(&slice_id, sample).await;
        }
        count
    }
}

/// Ranges chosen so roughly half of the samples breach the default health thresholds.
pub fn random_sample<R: Rng + ?Sized>(rng: &mut R) -> TelemetrySample {
    TelemetrySample::new(
        rng.gen_range(80.0..200.0),
        rng.gen_range(10.0..100.0),
        rng.gen_range(0.0..5.0),
        rng.gen_range(0.6..0.95),
    )
}
