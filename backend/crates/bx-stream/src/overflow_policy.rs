use bx_config::{OverflowMode, StreamConfig};

use std::time::Duration;

/// What happens when a send finds a subscriber's queue full.
///
/// Whatever the policy, only the slow subscriber loses messages; the sender
/// and the other subscribers are never held up beyond `BoundedWait`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Discard the incoming message
    #[default]
    DropNewest,
    /// Evict the oldest queued message to make room
    DropOldest,
    /// Wait up to the duration for room, then discard the incoming message
    BoundedWait(Duration),
}

impl From<&StreamConfig> for OverflowPolicy {
    fn from(config: &StreamConfig) -> Self {
        match config.overflow {
            OverflowMode::DropNewest => Self::DropNewest,
            OverflowMode::DropOldest => Self::DropOldest,
            OverflowMode::BoundedWait => {
                Self::BoundedWait(Duration::from_millis(config.bounded_wait_ms))
            }
        }
    }
}
