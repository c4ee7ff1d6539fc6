pub mod channel;
pub mod event_envelope;
pub mod tx;
