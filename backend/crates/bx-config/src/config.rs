use crate::{
    CONFIG_DIR_ENV, CONFIG_DIR_NAME, CONFIG_FILE_NAME, ConfigError, ConfigErrorResult,
    LoggingConfig, PollerConfig, RateLimitConfig, RedisConfig, RelayConfig, ServerConfig,
    StreamConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub redis: RedisConfig,
    pub logging: LoggingConfig,
    pub rate_limit: RateLimitConfig,
    pub streams: StreamConfig,
    pub relay: RelayConfig,
    pub pollers: PollerConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for BX_CONFIG_DIR env var, else use ./.bx/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply BX_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: BX_CONFIG_DIR env var > ./.bx/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(CONFIG_DIR_NAME))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.redis.validate()?;
        self.rate_limit.validate()?;
        self.streams.validate()?;
        self.relay.validate()?;
        self.pollers.validate()?;

        if let Some(file) = &self.logging.file
            && (Path::new(file).is_absolute() || file.contains(".."))
        {
            return Err(ConfigError::logging(
                "logging.file must be relative and cannot contain '..'",
            ));
        }

        Ok(())
    }

    /// Get bind address as string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Absolute-or-relative path of the log file, when file logging is on.
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.logging
            .file
            .as_ref()
            .map(|file| Path::new(&self.logging.dir).join(file))
    }

    /// Log configuration summary (NEVER logs credentials embedded in URLs).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  server: {}:{}", self.server.host, self.server.port);
        info!(
            "  redis: bus={}, store={}",
            redact_url(&self.redis.url),
            redact_url(&self.redis.store_url)
        );
        info!(
            "  logging: {} (connections: {}, colored: {}, file: {})",
            *self.logging.level,
            *self.logging.connections.unwrap_or(self.logging.level),
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("stdout")
        );
        info!(
            "  rate_limit: {} {}/{}s ({:?}, enforce: {})",
            if self.rate_limit.enabled {
                "enabled"
            } else {
                "disabled"
            },
            self.rate_limit.max_requests,
            self.rate_limit.window_secs,
            self.rate_limit.backend,
            self.rate_limit.enforce
        );
        info!(
            "  streams: queue={} ({:?}), timeouts events={}s blocknotify={}s unconfirmed={}s",
            self.streams.queue_capacity,
            self.streams.overflow,
            self.streams.events_timeout_secs,
            self.streams.blocknotify_timeout_secs,
            self.streams.unconfirmed_timeout_secs
        );
        info!(
            "  relay: initial={}ms, max={}s, backoff={}x",
            self.relay.initial_delay_ms, self.relay.max_delay_secs, self.relay.backoff_multiplier
        );
        info!(
            "  pollers: mempool={}ms, price={}s",
            self.pollers.mempool_interval_ms, self.pollers.price_interval_secs
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("BX_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("BX_SERVER_PORT", &mut self.server.port);

        // Redis
        Self::apply_env_string("BX_REDIS_URL", &mut self.redis.url);
        Self::apply_env_string("BX_STORE_URL", &mut self.redis.store_url);

        // Logging
        Self::apply_env_parse("BX_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("BX_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("BX_LOG_FILE", &mut self.logging.file);
        Self::apply_env_string("BX_LOG_DIR", &mut self.logging.dir);
        Self::apply_env_option_parse("BX_LOG_CONNECTIONS", &mut self.logging.connections);

        // Rate limit
        Self::apply_env_bool("BX_RATE_LIMIT_ENABLED", &mut self.rate_limit.enabled);
        Self::apply_env_parse(
            "BX_RATE_LIMIT_MAX_REQUESTS",
            &mut self.rate_limit.max_requests,
        );
        Self::apply_env_parse(
            "BX_RATE_LIMIT_WINDOW_SECS",
            &mut self.rate_limit.window_secs,
        );
        Self::apply_env_bool("BX_RATE_LIMIT_ENFORCE", &mut self.rate_limit.enforce);
        Self::apply_env_parse("BX_RATE_LIMIT_BACKEND", &mut self.rate_limit.backend);

        // Streams
        Self::apply_env_parse(
            "BX_STREAM_QUEUE_CAPACITY",
            &mut self.streams.queue_capacity,
        );
        Self::apply_env_parse("BX_STREAM_OVERFLOW", &mut self.streams.overflow);
        Self::apply_env_parse(
            "BX_STREAM_BOUNDED_WAIT_MS",
            &mut self.streams.bounded_wait_ms,
        );
        Self::apply_env_parse(
            "BX_STREAM_EVENTS_TIMEOUT_SECS",
            &mut self.streams.events_timeout_secs,
        );
        Self::apply_env_parse(
            "BX_STREAM_BLOCKNOTIFY_TIMEOUT_SECS",
            &mut self.streams.blocknotify_timeout_secs,
        );
        Self::apply_env_parse(
            "BX_STREAM_UNCONFIRMED_TIMEOUT_SECS",
            &mut self.streams.unconfirmed_timeout_secs,
        );
        Self::apply_env_parse("BX_STREAM_FRAME_BUFFER", &mut self.streams.frame_buffer);

        // Relay
        Self::apply_env_parse(
            "BX_RELAY_INITIAL_DELAY_MS",
            &mut self.relay.initial_delay_ms,
        );
        Self::apply_env_parse("BX_RELAY_MAX_DELAY_SECS", &mut self.relay.max_delay_secs);
        Self::apply_env_parse(
            "BX_RELAY_BACKOFF_MULTIPLIER",
            &mut self.relay.backoff_multiplier,
        );
        Self::apply_env_bool("BX_RELAY_JITTER", &mut self.relay.jitter);

        // Pollers
        Self::apply_env_parse(
            "BX_MEMPOOL_INTERVAL_MS",
            &mut self.pollers.mempool_interval_ms,
        );
        Self::apply_env_parse(
            "BX_PRICE_INTERVAL_SECS",
            &mut self.pollers.price_interval_secs,
        );
        Self::apply_env_string("BX_PRICE_URL", &mut self.pollers.price_url);
        Self::apply_env_string("BX_PRICE_FIELD", &mut self.pollers.price_field);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values.
    /// Unparseable values are ignored and the previous value kept.
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for optional parseable values
    fn apply_env_option_parse<T: std::str::FromStr>(var_name: &str, target: &mut Option<T>) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = Some(parsed);
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}

/// Strip `user:password@` from a connection URL before logging it.
fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***@{}", &url[..scheme_end], &url[at + 1..])
        }
        _ => url.to_string(),
    }
}
