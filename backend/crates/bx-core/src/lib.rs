pub mod error;
pub mod format;
pub mod models;
pub mod state;

pub use error::{CoreError, Result as CoreResult};
pub use format::{compute_fee, cut, cut_middle, escape_html, to_btc, to_kb};
pub use models::channel::Channel;
pub use models::event_envelope::EventEnvelope;
pub use models::tx::Tx;
pub use state::live_state::{LiveState, LiveStateWriters};
pub use state::state_cell::{StateCell, StateReader, StateWriter, Versioned};

#[cfg(test)]
mod tests;

/// Satoshis per bitcoin
pub const SATOSHIS_PER_BTC: f64 = 1e8;
