use crate::Result;

use bx_core::EventEnvelope;

use std::sync::Arc;

/// Turns a group message into the `data:` payload of one SSE frame.
pub trait EventFormatter: Send + Sync {
    fn format(&self, envelope: &EventEnvelope) -> Result<Arc<str>>;
}

/// Forwards the payload untouched (price, height, block notifications).
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughFormatter;

impl EventFormatter for PassthroughFormatter {
    fn format(&self, envelope: &EventEnvelope) -> Result<Arc<str>> {
        Ok(Arc::clone(&envelope.payload))
    }
}
