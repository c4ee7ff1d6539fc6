use crate::{ConfigError, ConfigErrorResult, DEFAULT_REDIS_URL, DEFAULT_STORE_URL};

use serde::Deserialize;

/// Connection settings for the two redis-protocol backends.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Pub/sub bus, raw mempool set and rate-limit counters
    pub url: String,
    /// Indexed blockchain store (SSDB speaks the redis protocol)
    pub store_url: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: String::from(DEFAULT_REDIS_URL),
            store_url: String::from(DEFAULT_STORE_URL),
        }
    }
}

impl RedisConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        for (name, url) in [("redis.url", &self.url), ("redis.store_url", &self.store_url)] {
            if !(url.starts_with("redis://") || url.starts_with("rediss://")) {
                return Err(ConfigError::redis(format!(
                    "{} must start with redis:// or rediss://, got '{}'",
                    name, url
                )));
            }
        }

        Ok(())
    }
}
