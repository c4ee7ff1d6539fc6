use crate::{BroadcastGroup, Metrics, PriceSource, ShutdownGuard};

use bx_core::{EventEnvelope, StateWriter};

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Keeps the market price fresh and announces changes on the price group.
pub struct PriceRefresher {
    source: Arc<dyn PriceSource>,
    writer: StateWriter<f64>,
    group: BroadcastGroup,
    every: Duration,
    metrics: Metrics,
}

impl PriceRefresher {
    pub fn new(
        source: Arc<dyn PriceSource>,
        writer: StateWriter<f64>,
        group: BroadcastGroup,
        every: Duration,
    ) -> Self {
        Self {
            source,
            writer,
            group,
            every,
            metrics: Metrics::new(),
        }
    }

    /// Startup fetch: fills the cell without broadcasting.
    pub async fn prime(&self) -> Option<f64> {
        match self.source.fetch_price().await {
            Ok(price) => {
                self.writer.publish(price);
                info!("Initial price: {}", price);
                Some(price)
            }
            Err(e) => {
                self.metrics.poll_failed("price");
                warn!("Initial price fetch failed: {}", e);
                None
            }
        }
    }

    /// Fetch once; on success publish and broadcast, otherwise keep the old
    /// value until the next tick.
    pub async fn refresh_once(&self) -> Option<f64> {
        match self.source.fetch_price().await {
            Ok(price) => {
                self.writer.publish(price);
                info!("New price: {}", price);
                self.group.send(EventEnvelope::price(price)).await;
                Some(price)
            }
            Err(e) => {
                self.metrics.poll_failed("price");
                warn!(
                    "Price refresh failed, keeping {}: {}",
                    self.writer.current().value,
                    e
                );
                None
            }
        }
    }

    pub async fn run(self, mut shutdown: ShutdownGuard) {
        tokio::select! {
            _ = self.prime() => {}
            _ = shutdown.wait() => return,
        }

        info!("Price refresher ticking every {:?}", self.every);
        let mut ticker = interval_at(Instant::now() + self.every, self.every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.refresh_once().await;
                }
                _ = shutdown.wait() => break,
            }
        }

        info!("Price refresher stopped");
    }
}
