use crate::{Channel, CoreError, CoreResult};

use serde::{Deserialize, Serialize};

/// Partial transaction record published on the pending-transaction channel.
///
/// Only the fields needed to render a mempool row are decoded; anything else
/// in the payload is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Tx {
    pub hash: String,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub total_in: u64,
    #[serde(default)]
    pub total_out: u64,
    #[serde(default)]
    pub vin_cnt: u32,
    #[serde(default)]
    pub vout_cnt: u32,
    #[serde(default)]
    pub first_seen_time: u32,
}

impl Tx {
    /// Decode a pending-transaction payload.
    #[track_caller]
    pub fn from_payload(payload: &str) -> CoreResult<Self> {
        let tx: Tx = serde_json::from_str(payload)
            .map_err(|e| CoreError::malformed(Channel::PendingTx.as_str(), e.to_string()))?;

        if tx.hash.is_empty() {
            return Err(CoreError::malformed(
                Channel::PendingTx.as_str(),
                "transaction hash is empty",
            ));
        }

        Ok(tx)
    }

    /// Fee in satoshis, zero for coinbase-like records without inputs.
    pub fn fee(&self) -> u64 {
        self.total_in.saturating_sub(self.total_out)
    }
}
