/// An aligned fixed-length time bucket.
///
/// Buckets are identified by their end epoch: `floor(now / W) * W + W`.
/// The counter record outlives its own window by one more window, so
/// `expire_at = end + W`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Unix seconds at which this window closes; also its identifier
    pub end: u64,
    /// Unix seconds at which the stored counter is dropped
    pub expire_at: u64,
}

impl Window {
    /// Window containing `now` (unix seconds). `window_secs` must be non-zero.
    pub fn containing(now: u64, window_secs: u64) -> Self {
        let end = now / window_secs * window_secs + window_secs;
        Self {
            end,
            expire_at: end + window_secs,
        }
    }

    /// Store key for `identity` in this window: `rl:{identity}:{end}`.
    pub fn key(&self, identity: &str) -> String {
        format!("rl:{}:{}", identity, self.end)
    }
}
