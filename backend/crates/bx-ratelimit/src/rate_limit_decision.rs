/// Outcome of one limiter check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// True once `count` exceeds `limit`
    pub limited: bool,
    /// Requests counted in the current window, this one included
    pub count: u64,
    pub limit: u64,
    /// Unix seconds at which the current window ends
    pub reset: u64,
}

impl RateLimitDecision {
    /// Requests left in this window, never negative.
    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.count)
    }
}
