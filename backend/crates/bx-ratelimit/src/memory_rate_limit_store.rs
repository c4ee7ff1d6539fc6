use crate::{RateLimitError, RateLimitStore, Result};

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

#[derive(Default)]
struct Counters {
    entries: HashMap<String, (u64, u64)>,
    newest_expiry: u64,
}

/// Process-local counters for single-instance deployments and tests.
///
/// Windows only move forward, so when a newer expiry shows up every counter
/// belonging to an older window is purged.
#[derive(Default)]
pub struct MemoryRateLimitStore {
    counters: Mutex<Counters>,
}

impl MemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live counters.
    pub fn len(&self) -> usize {
        self.counters
            .lock()
            .map(|c| c.entries.len())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RateLimitStore for MemoryRateLimitStore {
    async fn incr_with_expiry(&self, key: &str, expire_at: u64) -> Result<u64> {
        let mut counters = self
            .counters
            .lock()
            .map_err(|_| RateLimitError::store("memory counters poisoned"))?;

        if expire_at > counters.newest_expiry {
            counters.newest_expiry = expire_at;
            counters.entries.retain(|_, (_, exp)| *exp >= expire_at);
        }

        let entry = counters.entries.entry(key.to_string()).or_insert((0, expire_at));
        entry.0 += 1;
        entry.1 = expire_at;

        Ok(entry.0)
    }
}
