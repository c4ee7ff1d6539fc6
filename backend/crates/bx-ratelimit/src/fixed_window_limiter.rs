use crate::{RateLimitConfig, RateLimitDecision, RateLimitStore, Result, Window};

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;

/// Fixed-window request limiter keyed by client identity.
///
/// Every check increments the counter, limited or not, so a client that
/// keeps hammering stays limited until the window rolls over.
#[derive(Clone)]
pub struct FixedWindowLimiter {
    store: Arc<dyn RateLimitStore>,
    config: RateLimitConfig,
}

impl FixedWindowLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>, config: RateLimitConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    /// Count one request for `identity` at the current wall-clock time.
    pub async fn check(&self, identity: &str) -> Result<RateLimitDecision> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        self.check_at(identity, now).await
    }

    /// Count one request for `identity` at `now` (unix seconds).
    pub async fn check_at(&self, identity: &str, now: u64) -> Result<RateLimitDecision> {
        let window = Window::containing(now, self.config.window_secs);
        let key = window.key(identity);

        let count = self.store.incr_with_expiry(&key, window.expire_at).await?;
        let decision = RateLimitDecision {
            limited: count > self.config.max_requests,
            count,
            limit: self.config.max_requests,
            reset: window.end,
        };

        if decision.limited {
            debug!("{} limited ({} > {})", identity, count, decision.limit);
        }

        Ok(decision)
    }
}
