mod bridge_relay;
mod property_tests;
mod stream_handler;

use bx_core::{Channel, EventEnvelope};

pub(crate) fn envelope(channel: Channel, payload: &str) -> EventEnvelope {
    EventEnvelope::new(channel, payload)
}

pub(crate) fn height(payload: &str) -> EventEnvelope {
    envelope(Channel::Height, payload)
}
