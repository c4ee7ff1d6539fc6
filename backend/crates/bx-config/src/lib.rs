mod config;
mod error;
mod log_level;
mod logging_config;
mod poller_config;
mod rate_limit_config;
mod redis_config;
mod relay_config;
mod server_config;
mod stream_config;

pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use poller_config::PollerConfig;
pub use rate_limit_config::{RateLimitBackend, RateLimitConfig};
pub use redis_config::RedisConfig;
pub use relay_config::RelayConfig;
pub use server_config::ServerConfig;
pub use stream_config::{OverflowMode, StreamConfig};

#[cfg(test)]
mod tests;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const MIN_PORT: u16 = 1024;
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_STORE_URL: &str = "redis://127.0.0.1:8888";
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
const CONFIG_DIR_ENV: &str = "BX_CONFIG_DIR";
const CONFIG_DIR_NAME: &str = ".bx";
const CONFIG_FILE_NAME: &str = "config.toml";
