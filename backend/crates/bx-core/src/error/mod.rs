use std::panic::Location;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown channel: {value} {location}")]
    InvalidChannel {
        value: String,
        location: ErrorLocation,
    },

    #[error("Malformed payload on {channel}: {message} {location}")]
    MalformedPayload {
        channel: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON decode failed: {source} {location}")]
    Json {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },
}

impl CoreError {
    #[track_caller]
    pub fn malformed<C: Into<String>, M: Into<String>>(channel: C, message: M) -> Self {
        Self::MalformedPayload {
            channel: channel.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Json {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = StdResult<T, CoreError>;
