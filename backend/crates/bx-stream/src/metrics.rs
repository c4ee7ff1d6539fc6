use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// Metrics collector for event streams, relays and pollers
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "bx_stream" }
    }

    /// Record a streaming connection opened on `endpoint`
    pub fn stream_opened(&self, endpoint: &str) {
        counter!(format!("{}.streams.opened", self.prefix)).increment(1);
        counter!(format!("{}.streams.opened.{}", self.prefix, endpoint)).increment(1);
        gauge!(format!("{}.streams.active", self.prefix)).increment(1.0);
    }

    /// Record a streaming connection closed, with why
    pub fn stream_closed(&self, endpoint: &str, reason: &str, lifetime: Duration) {
        counter!(format!("{}.streams.closed", self.prefix)).increment(1);
        counter!(format!("{}.streams.closed.{}", self.prefix, reason)).increment(1);
        gauge!(format!("{}.streams.active", self.prefix)).decrement(1.0);
        histogram!(format!("{}.streams.lifetime_secs.{}", self.prefix, endpoint))
            .record(lifetime.as_secs_f64());
    }

    pub fn event_sent(&self, channel: &str) {
        counter!(format!("{}.events.sent", self.prefix)).increment(1);
        counter!(format!("{}.events.sent.{}", self.prefix, channel)).increment(1);
    }

    /// Record events lost to a full subscriber queue
    pub fn events_dropped(&self, group: &str, count: usize) {
        counter!(format!("{}.events.dropped", self.prefix)).increment(count as u64);
        counter!(format!("{}.events.dropped.{}", self.prefix, group)).increment(count as u64);
    }

    /// Record an event skipped because it could not be formatted
    pub fn event_skipped(&self, channel: &str) {
        counter!(format!("{}.events.skipped.{}", self.prefix, channel)).increment(1);
    }

    pub fn group_subscribers(&self, group: &str, count: usize) {
        gauge!(format!("{}.groups.subscribers.{}", self.prefix, group)).set(count as f64);
    }

    pub fn relay_reconnect(&self, channel: &str) {
        counter!(format!("{}.relay.reconnects", self.prefix)).increment(1);
        counter!(format!("{}.relay.reconnects.{}", self.prefix, channel)).increment(1);
    }

    pub fn relay_forwarded(&self, channel: &str) {
        counter!(format!("{}.relay.forwarded.{}", self.prefix, channel)).increment(1);
    }

    pub fn poll_failed(&self, poller: &str) {
        counter!(format!("{}.pollers.failures.{}", self.prefix, poller)).increment(1);
    }

    pub fn rate_limited(&self) {
        counter!(format!("{}.rate_limit.limited", self.prefix)).increment(1);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
