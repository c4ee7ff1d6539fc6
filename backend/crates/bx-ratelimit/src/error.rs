use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RateLimitError {
    #[error("Rate limit store error: {message} {location}")]
    Store {
        message: String,
        location: ErrorLocation,
    },

    #[error("Redis error: {source} {location}")]
    Redis {
        #[source]
        source: redis::RedisError,
        location: ErrorLocation,
    },

    #[error("Invalid rate limit configuration: {message} {location}")]
    InvalidConfig {
        message: String,
        location: ErrorLocation,
    },
}

impl RateLimitError {
    #[track_caller]
    pub fn store<S: Into<String>>(message: S) -> Self {
        Self::Store {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<redis::RedisError> for RateLimitError {
    #[track_caller]
    fn from(source: redis::RedisError) -> Self {
        Self::Redis {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, RateLimitError>;
