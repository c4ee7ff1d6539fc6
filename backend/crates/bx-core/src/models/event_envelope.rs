use crate::Channel;

use std::sync::Arc;

/// Typed message passed through a broadcast group.
///
/// The payload is opaque (usually JSON) and shared between all receivers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEnvelope {
    pub channel: Channel,
    pub payload: Arc<str>,
}

impl EventEnvelope {
    pub fn new(channel: Channel, payload: impl Into<Arc<str>>) -> Self {
        Self {
            channel,
            payload: payload.into(),
        }
    }

    /// Price update in the shape the explorer front-end listens for.
    pub fn price(price: f64) -> Self {
        Self::new(
            Channel::Price,
            format!("{{\"t\": \"price\", \"price\": {}}}", price),
        )
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}
