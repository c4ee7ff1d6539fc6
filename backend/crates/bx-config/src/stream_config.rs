use crate::{ConfigError, ConfigErrorResult};

use std::str::FromStr;

use serde::Deserialize;

// Per-subscriber queue constraints
pub const MIN_QUEUE_CAPACITY: usize = 1;
pub const MAX_QUEUE_CAPACITY: usize = 10000;
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

pub const MIN_BOUNDED_WAIT_MS: u64 = 1;
pub const MAX_BOUNDED_WAIT_MS: u64 = 5000;
pub const DEFAULT_BOUNDED_WAIT_MS: u64 = 50;

// Stream deadlines (seconds)
pub const MIN_STREAM_TIMEOUT_SECS: u64 = 1;
pub const MAX_STREAM_TIMEOUT_SECS: u64 = 86400;
pub const DEFAULT_EVENTS_TIMEOUT_SECS: u64 = 900;
pub const DEFAULT_BLOCKNOTIFY_TIMEOUT_SECS: u64 = 1300;
pub const DEFAULT_UNCONFIRMED_TIMEOUT_SECS: u64 = 900;

pub const MIN_FRAME_BUFFER: usize = 1;
pub const MAX_FRAME_BUFFER: usize = 1024;
pub const DEFAULT_FRAME_BUFFER: usize = 16;

/// What a broadcast group does when a subscriber's queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowMode {
    DropNewest,
    DropOldest,
    BoundedWait,
}

impl FromStr for OverflowMode {
    type Err = ConfigError;

    #[track_caller]
    fn from_str(s: &str) -> ConfigErrorResult<Self> {
        match s.to_lowercase().as_str() {
            "drop_newest" => Ok(Self::DropNewest),
            "drop_oldest" => Ok(Self::DropOldest),
            "bounded_wait" => Ok(Self::BoundedWait),
            other => Err(ConfigError::config(format!(
                "streams.overflow must be drop_newest, drop_oldest or bounded_wait, got '{}'",
                other
            ))),
        }
    }
}

/// Server-sent event stream settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Per-subscriber queue capacity inside a broadcast group
    pub queue_capacity: usize,
    pub overflow: OverflowMode,
    /// Max time a send waits for queue space under `bounded_wait`
    pub bounded_wait_ms: u64,
    /// Deadline for `/events` (price + height)
    pub events_timeout_secs: u64,
    /// Deadline for `/api/v1/blocknotify`
    pub blocknotify_timeout_secs: u64,
    /// Deadline for `/events_unconfirmed`
    pub unconfirmed_timeout_secs: u64,
    /// Frames buffered between a stream handler and the HTTP body
    pub frame_buffer: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            overflow: OverflowMode::DropNewest,
            bounded_wait_ms: DEFAULT_BOUNDED_WAIT_MS,
            events_timeout_secs: DEFAULT_EVENTS_TIMEOUT_SECS,
            blocknotify_timeout_secs: DEFAULT_BLOCKNOTIFY_TIMEOUT_SECS,
            unconfirmed_timeout_secs: DEFAULT_UNCONFIRMED_TIMEOUT_SECS,
            frame_buffer: DEFAULT_FRAME_BUFFER,
        }
    }
}

impl StreamConfig {
    /// Validate all fields are within acceptable ranges.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.queue_capacity < MIN_QUEUE_CAPACITY || self.queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(ConfigError::config(format!(
                "streams.queue_capacity must be {}-{}, got {}",
                MIN_QUEUE_CAPACITY, MAX_QUEUE_CAPACITY, self.queue_capacity
            )));
        }

        if self.bounded_wait_ms < MIN_BOUNDED_WAIT_MS || self.bounded_wait_ms > MAX_BOUNDED_WAIT_MS
        {
            return Err(ConfigError::config(format!(
                "streams.bounded_wait_ms must be {}-{}, got {}",
                MIN_BOUNDED_WAIT_MS, MAX_BOUNDED_WAIT_MS, self.bounded_wait_ms
            )));
        }

        for (name, value) in [
            ("events_timeout_secs", self.events_timeout_secs),
            ("blocknotify_timeout_secs", self.blocknotify_timeout_secs),
            ("unconfirmed_timeout_secs", self.unconfirmed_timeout_secs),
        ] {
            if !(MIN_STREAM_TIMEOUT_SECS..=MAX_STREAM_TIMEOUT_SECS).contains(&value) {
                return Err(ConfigError::config(format!(
                    "streams.{} must be {}-{}, got {}",
                    name, MIN_STREAM_TIMEOUT_SECS, MAX_STREAM_TIMEOUT_SECS, value
                )));
            }
        }

        if self.frame_buffer < MIN_FRAME_BUFFER || self.frame_buffer > MAX_FRAME_BUFFER {
            return Err(ConfigError::config(format!(
                "streams.frame_buffer must be {}-{}, got {}",
                MIN_FRAME_BUFFER, MAX_FRAME_BUFFER, self.frame_buffer
            )));
        }

        Ok(())
    }
}
