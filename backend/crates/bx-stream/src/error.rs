use bx_core::CoreError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Upstream unavailable: {message} {location}")]
    Upstream {
        message: String,
        location: ErrorLocation,
    },

    #[error("Redis error: {source} {location}")]
    Redis {
        #[source]
        source: redis::RedisError,
        location: ErrorLocation,
    },

    #[error("HTTP request failed: {source} {location}")]
    Http {
        #[source]
        source: reqwest::Error,
        location: ErrorLocation,
    },

    #[error("Malformed payload on {channel}: {message} {location}")]
    MalformedPayload {
        channel: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Render failed: {message} {location}")]
    Render {
        message: String,
        location: ErrorLocation,
    },
}

impl StreamError {
    #[track_caller]
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn malformed<C: Into<String>, M: Into<String>>(channel: C, message: M) -> Self {
        Self::MalformedPayload {
            channel: channel.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn render<S: Into<String>>(message: S) -> Self {
        Self::Render {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Transient upstream failures are retried; payload problems only drop
    /// the offending event.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Upstream { .. } | Self::Redis { .. } | Self::Http { .. }
        )
    }
}

impl From<redis::RedisError> for StreamError {
    #[track_caller]
    fn from(source: redis::RedisError) -> Self {
        Self::Redis {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for StreamError {
    #[track_caller]
    fn from(source: reqwest::Error) -> Self {
        Self::Http {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CoreError> for StreamError {
    #[track_caller]
    fn from(source: CoreError) -> Self {
        match source {
            CoreError::MalformedPayload {
                channel,
                message,
                location,
            } => Self::MalformedPayload {
                channel,
                message,
                location,
            },
            other => Self::MalformedPayload {
                channel: String::from("unknown"),
                message: other.to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, StreamError>;
