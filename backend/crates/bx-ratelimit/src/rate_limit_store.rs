use crate::Result;

use async_trait::async_trait;

/// Shared counter store backing the limiter.
///
/// `incr_with_expiry` must increment the counter and (re)set its absolute
/// expiry as one atomic unit, returning the post-increment value. Concurrent
/// callers on the same key must never observe a lost update.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    async fn incr_with_expiry(&self, key: &str, expire_at: u64) -> Result<u64>;
}
