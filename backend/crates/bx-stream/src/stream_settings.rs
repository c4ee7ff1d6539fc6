use bx_config::StreamConfig;

use std::time::Duration;

/// Per-endpoint stream parameters, resolved from config.
#[derive(Debug, Clone)]
pub struct StreamSettings {
    /// Frames buffered between a handler and the HTTP body (backpressure)
    pub frame_buffer: usize,
    pub events_timeout: Duration,
    pub blocknotify_timeout: Duration,
    pub unconfirmed_timeout: Duration,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self::from(&StreamConfig::default())
    }
}

impl From<&StreamConfig> for StreamSettings {
    fn from(config: &StreamConfig) -> Self {
        Self {
            frame_buffer: config.frame_buffer.max(1),
            events_timeout: Duration::from_secs(config.events_timeout_secs),
            blocknotify_timeout: Duration::from_secs(config.blocknotify_timeout_secs),
            unconfirmed_timeout: Duration::from_secs(config.unconfirmed_timeout_secs),
        }
    }
}
