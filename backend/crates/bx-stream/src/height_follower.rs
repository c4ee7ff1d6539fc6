use crate::{
    BroadcastGroup, HeightSource, RetryConfig, ShutdownGuard, SubscriberHandle, parse_height,
    with_retry,
};

use bx_core::StateWriter;

use std::sync::Arc;

use log::{debug, info, warn};

/// Tracks the latest block height: bootstraps from the indexed store, then
/// follows height events from the height group.
pub struct HeightFollower {
    source: Arc<dyn HeightSource>,
    writer: StateWriter<u64>,
    retry: RetryConfig,
}

impl HeightFollower {
    pub fn new(source: Arc<dyn HeightSource>, writer: StateWriter<u64>, retry: RetryConfig) -> Self {
        Self {
            source,
            writer,
            retry,
        }
    }

    /// Read `height:latest` once. Missing or unreadable leaves the cell as is.
    pub async fn bootstrap(&self) -> Option<u64> {
        let source = Arc::clone(&self.source);
        let result = with_retry(&self.retry, "height bootstrap", || {
            let source = Arc::clone(&source);
            async move { source.latest_height().await }
        })
        .await;

        match result {
            Ok(Some(height)) => {
                self.writer.publish(height);
                info!("Latest height: {}", height);
                Some(height)
            }
            Ok(None) => {
                warn!("No latest height in store yet");
                None
            }
            Err(e) => {
                warn!("Height bootstrap failed: {}", e);
                None
            }
        }
    }

    /// Apply one height-channel payload. Malformed payloads and heights
    /// older than the current one are ignored.
    pub fn apply(&self, payload: &str) -> Option<u64> {
        match parse_height(payload) {
            Ok(height) if height >= self.writer.current().value => {
                self.writer.publish(height);
                debug!("Height advanced to {}", height);
                Some(height)
            }
            Ok(height) => {
                debug!("Ignoring stale height {}", height);
                None
            }
            Err(e) => {
                warn!("Dropping height event: {}", e);
                None
            }
        }
    }

    /// Bootstrap, join the height group, and follow it until shutdown or
    /// until the group closes.
    pub async fn run(self, group: BroadcastGroup, mut shutdown: ShutdownGuard) {
        // Join first so nothing published during bootstrap is missed
        let handle: SubscriberHandle = group.join();

        tokio::select! {
            _ = self.bootstrap() => {}
            _ = shutdown.wait() => return,
        }

        loop {
            tokio::select! {
                message = handle.recv() => match message {
                    Some(message) => {
                        self.apply(message.payload());
                    }
                    None => break,
                },
                _ = shutdown.wait() => break,
            }
        }

        group.leave(handle);
        info!("Height follower stopped");
    }
}
