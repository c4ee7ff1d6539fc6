use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_MEMPOOL_INTERVAL_MS: u64 = 100;
pub const MAX_MEMPOOL_INTERVAL_MS: u64 = 60000;
pub const DEFAULT_MEMPOOL_INTERVAL_MS: u64 = 500;

pub const MIN_PRICE_INTERVAL_SECS: u64 = 10;
pub const MAX_PRICE_INTERVAL_SECS: u64 = 86400;
pub const DEFAULT_PRICE_INTERVAL_SECS: u64 = 300;

pub const DEFAULT_PRICE_URL: &str = "https://www.bitstamp.net/api/ticker/";
pub const DEFAULT_PRICE_FIELD: &str = "last";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// How often the raw mempool size is sampled
    pub mempool_interval_ms: u64,
    /// How often the market price is refreshed
    pub price_interval_secs: u64,
    /// JSON ticker endpoint
    pub price_url: String,
    /// Top-level field of the ticker holding the price (number or numeric string)
    pub price_field: String,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            mempool_interval_ms: DEFAULT_MEMPOOL_INTERVAL_MS,
            price_interval_secs: DEFAULT_PRICE_INTERVAL_SECS,
            price_url: String::from(DEFAULT_PRICE_URL),
            price_field: String::from(DEFAULT_PRICE_FIELD),
        }
    }
}

impl PollerConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.mempool_interval_ms < MIN_MEMPOOL_INTERVAL_MS
            || self.mempool_interval_ms > MAX_MEMPOOL_INTERVAL_MS
        {
            return Err(ConfigError::config(format!(
                "pollers.mempool_interval_ms must be {}-{}, got {}",
                MIN_MEMPOOL_INTERVAL_MS, MAX_MEMPOOL_INTERVAL_MS, self.mempool_interval_ms
            )));
        }

        if self.price_interval_secs < MIN_PRICE_INTERVAL_SECS
            || self.price_interval_secs > MAX_PRICE_INTERVAL_SECS
        {
            return Err(ConfigError::config(format!(
                "pollers.price_interval_secs must be {}-{}, got {}",
                MIN_PRICE_INTERVAL_SECS, MAX_PRICE_INTERVAL_SECS, self.price_interval_secs
            )));
        }

        if !(self.price_url.starts_with("http://") || self.price_url.starts_with("https://")) {
            return Err(ConfigError::config(format!(
                "pollers.price_url must be an http(s) URL, got '{}'",
                self.price_url
            )));
        }

        if self.price_field.is_empty() {
            return Err(ConfigError::config("pollers.price_field must not be empty"));
        }

        Ok(())
    }
}
