use crate::{CoreError, CoreResult};

use std::fmt;
use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Logical event channel carried by an [`EventEnvelope`](crate::EventEnvelope).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Latest processed block height
    Height,
    /// bitcoind-style block notification
    BlockNotify,
    /// Transaction entering the raw mempool
    PendingTx,
    /// Market price update (produced in-process, never on the bus)
    Price,
}

impl Channel {
    /// Channels relayed from the external pub/sub bus.
    pub const BUS_CHANNELS: [Channel; 3] = [Channel::Height, Channel::BlockNotify, Channel::PendingTx];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Height => "height",
            Self::BlockNotify => "blocknotify",
            Self::PendingTx => "utxs",
            Self::Price => "price",
        }
    }

    /// Name of the pub/sub channel this is relayed from, if any.
    pub fn bus_name(&self) -> Option<&'static str> {
        match self {
            Self::Height => Some("btcplex:height"),
            Self::BlockNotify => Some("btcplex:blocknotify"),
            Self::PendingTx => Some("btcplex:utxs"),
            Self::Price => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "height" => Ok(Self::Height),
            "blocknotify" => Ok(Self::BlockNotify),
            "utxs" => Ok(Self::PendingTx),
            "price" => Ok(Self::Price),
            _ => Err(CoreError::InvalidChannel {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
