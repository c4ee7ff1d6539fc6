use crate::{RateLimitError, Result};

/// Threshold and window of the fixed-window limiter
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Requests allowed per window; the next one is limited
    pub max_requests: u64,
    /// Window duration in seconds
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 3600, // 3600 requests
            window_secs: 3600,  // per hour
        }
    }
}

impl RateLimitConfig {
    #[track_caller]
    pub fn validate(&self) -> Result<()> {
        if self.window_secs == 0 {
            return Err(RateLimitError::invalid_config("window_secs must be > 0"));
        }
        if self.max_requests == 0 {
            return Err(RateLimitError::invalid_config("max_requests must be > 0"));
        }
        Ok(())
    }
}
