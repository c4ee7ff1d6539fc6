use crate::{MempoolSource, Metrics, ShutdownGuard};

use bx_core::StateWriter;

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::time::{MissedTickBehavior, interval};

/// Samples the raw mempool size on a fixed interval into the mempool cell.
pub struct MempoolCounter {
    source: Arc<dyn MempoolSource>,
    writer: StateWriter<u64>,
    every: Duration,
    metrics: Metrics,
}

impl MempoolCounter {
    pub fn new(source: Arc<dyn MempoolSource>, writer: StateWriter<u64>, every: Duration) -> Self {
        Self {
            source,
            writer,
            every,
            metrics: Metrics::new(),
        }
    }

    pub async fn run(self, mut shutdown: ShutdownGuard) {
        info!("Mempool counter polling every {:?}", self.every);
        let mut ticker = interval(self.every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll_once().await;
                }
                _ = shutdown.wait() => break,
            }
        }

        info!("Mempool counter stopped");
    }

    /// One sample. On failure the previous count stays published.
    pub async fn poll_once(&self) -> Option<u64> {
        match self.source.mempool_size().await {
            Ok(count) => {
                if count != self.writer.current().value {
                    self.writer.publish(count);
                    debug!("Mempool size now {}", count);
                }
                Some(count)
            }
            Err(e) => {
                self.metrics.poll_failed("mempool");
                warn!(
                    "Mempool size poll failed, keeping {}: {}",
                    self.writer.current().value,
                    e
                );
                None
            }
        }
    }
}
