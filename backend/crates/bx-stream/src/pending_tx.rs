use crate::{EventFormatter, Result, StreamError};

use bx_core::{EventEnvelope, StateReader, Tx, compute_fee, cut_middle, escape_html, to_btc, to_kb};

use std::fmt::Write;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Renders one pending transaction as an HTML fragment.
pub trait TxRenderer: Send + Sync {
    fn render(&self, tx: &Tx) -> Result<String>;
}

/// Built-in mempool table row.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTxRenderer;

impl TxRenderer for HtmlTxRenderer {
    fn render(&self, tx: &Tx) -> Result<String> {
        let hash = escape_html(&tx.hash);
        let mut html = String::with_capacity(256);

        write!(
            html,
            "<tr class=\"utx\"><td><a href=\"/tx/{hash}\">{short}</a></td>\
             <td>{out} BTC</td><td>{fee} BTC</td><td>{kb} KB</td>\
             <td>{vin} / {vout}</td></tr>",
            hash = hash,
            short = escape_html(&cut_middle(&tx.hash, 15)),
            out = escape_html(&to_btc(tx.total_out)),
            fee = escape_html(&compute_fee(tx)),
            kb = escape_html(&to_kb(tx.size)),
            vin = tx.vin_cnt,
            vout = tx.vout_cnt,
        )
        .map_err(|e| StreamError::render(e.to_string()))?;

        Ok(html)
    }
}

#[derive(Serialize)]
struct PendingTxFrame<'a> {
    /// Mempool size when the frame was built
    cnt: u64,
    tmpl: &'a str,
    time: String,
}

/// Enriches pending-transaction events with the rendered row, the current
/// mempool count and a UTC timestamp.
#[derive(Clone)]
pub struct PendingTxFormatter {
    renderer: Arc<dyn TxRenderer>,
    mempool_count: StateReader<u64>,
}

impl PendingTxFormatter {
    pub fn new(renderer: Arc<dyn TxRenderer>, mempool_count: StateReader<u64>) -> Self {
        Self {
            renderer,
            mempool_count,
        }
    }
}

impl EventFormatter for PendingTxFormatter {
    fn format(&self, envelope: &EventEnvelope) -> Result<Arc<str>> {
        let tx = Tx::from_payload(envelope.payload())?;
        let tmpl = self.renderer.render(&tx)?;

        let frame = PendingTxFrame {
            cnt: self.mempool_count.get(),
            tmpl: &tmpl,
            time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        };

        serde_json::to_string(&frame)
            .map(Arc::from)
            .map_err(|e| StreamError::render(e.to_string()))
    }
}
