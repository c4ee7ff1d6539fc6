use crate::{
    Backoff, BroadcastGroup, BusStream, BusSubscriber, Metrics, RetryConfig, ShutdownGuard,
};

use bx_core::{Channel, EventEnvelope};

use std::sync::Arc;

use futures::StreamExt;
use log::{debug, info, warn};
use tokio::time::sleep;

/// Forwards one bus channel into one broadcast group for the process lifetime.
///
/// Subscribes once and keeps that subscription; on disconnect it resubscribes
/// with exponential backoff. Bus failures are logged, never fatal.
pub struct BridgeRelay {
    bus: Arc<dyn BusSubscriber>,
    channel: Channel,
    bus_channel: String,
    group: BroadcastGroup,
    retry: RetryConfig,
    metrics: Metrics,
}

impl BridgeRelay {
    pub fn new(
        bus: Arc<dyn BusSubscriber>,
        channel: Channel,
        bus_channel: impl Into<String>,
        group: BroadcastGroup,
        retry: RetryConfig,
    ) -> Self {
        Self {
            bus,
            channel,
            bus_channel: bus_channel.into(),
            group,
            retry,
            metrics: Metrics::new(),
        }
    }

    /// Relay for a channel that has a bus name (height, blocknotify, utxs).
    pub fn for_channel(
        bus: Arc<dyn BusSubscriber>,
        channel: Channel,
        group: BroadcastGroup,
        retry: RetryConfig,
    ) -> Option<Self> {
        channel
            .bus_name()
            .map(|bus_channel| Self::new(bus, channel, bus_channel, group, retry))
    }

    /// Run until shutdown.
    pub async fn run(self, mut shutdown: ShutdownGuard) {
        let mut backoff = Backoff::new(self.retry.clone());
        info!(
            "Relay {} -> group {} starting",
            self.bus_channel,
            self.group.name()
        );

        loop {
            let subscribed = tokio::select! {
                result = self.bus.subscribe(&self.bus_channel) => result,
                _ = shutdown.wait() => break,
            };

            match subscribed {
                Ok(stream) => {
                    info!("Relay subscribed to {}", self.bus_channel);
                    backoff.reset();
                    if self.pump(stream, &mut shutdown).await {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Relay failed to subscribe to {}: {}", self.bus_channel, e);
                }
            }

            self.metrics.relay_reconnect(self.channel.as_str());
            let delay = backoff.next_delay();
            debug!("Relay {} reconnecting in {:?}", self.bus_channel, delay);

            tokio::select! {
                _ = sleep(delay) => {}
                _ = shutdown.wait() => break,
            }
        }

        info!("Relay {} stopped", self.bus_channel);
    }

    /// Forward until the stream ends or errors. Returns true on shutdown.
    async fn pump(&self, mut stream: BusStream, shutdown: &mut ShutdownGuard) -> bool {
        loop {
            tokio::select! {
                item = stream.next() => match item {
                    Some(Ok(payload)) => self.forward(payload).await,
                    Some(Err(e)) => {
                        warn!("Relay {} bus error: {}", self.bus_channel, e);
                        return false;
                    }
                    None => {
                        warn!("Relay {} lost its bus connection", self.bus_channel);
                        return false;
                    }
                },
                _ = shutdown.wait() => return true,
            }
        }
    }

    async fn forward(&self, payload: String) {
        let report = self
            .group
            .send(EventEnvelope::new(self.channel, payload))
            .await;
        self.metrics.relay_forwarded(self.channel.as_str());
        debug!(
            "Relay {} forwarded to {}/{} subscribers",
            self.bus_channel, report.delivered, report.subscribers
        );
    }
}
