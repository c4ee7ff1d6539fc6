pub mod client_identity;
pub mod error;
pub mod fixed_window_limiter;
pub mod memory_rate_limit_store;
pub mod rate_limit_config;
pub mod rate_limit_decision;
pub mod rate_limit_store;
pub mod redis_rate_limit_store;
pub mod window;

pub use client_identity::client_identity;
pub use error::{RateLimitError, Result};
pub use fixed_window_limiter::FixedWindowLimiter;
pub use memory_rate_limit_store::MemoryRateLimitStore;
pub use rate_limit_config::RateLimitConfig;
pub use rate_limit_decision::RateLimitDecision;
pub use rate_limit_store::RateLimitStore;
pub use redis_rate_limit_store::RedisRateLimitStore;
pub use window::Window;

#[cfg(test)]
mod tests;
