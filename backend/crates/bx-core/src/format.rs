//! Formatting helpers shared by the HTML fragment renderer.

use crate::{SATOSHIS_PER_BTC, Tx};

/// Truncate to `length` characters and append an ellipsis.
pub fn cut(value: &str, length: usize) -> String {
    let head: String = value.chars().take(length).collect();
    format!("{head}...")
}

/// Keep `length` characters at each end with an ellipsis in between.
pub fn cut_middle(value: &str, length: usize) -> String {
    let count = value.chars().count();
    if count <= length * 2 {
        return value.to_string();
    }

    let head: String = value.chars().take(length).collect();
    let tail: String = value.chars().skip(count - length).collect();
    format!("{head}...{tail}")
}

/// Byte size as kilobytes with three decimals.
pub fn to_kb(size: u32) -> String {
    format!("{:.3}", size as f64 / 1024.0)
}

/// Satoshi amount as BTC with eight decimals.
pub fn to_btc(satoshis: u64) -> String {
    format!("{:.8}", satoshis as f64 / SATOSHIS_PER_BTC)
}

/// Fee paid by a transaction in BTC; "0" when inputs are unknown.
pub fn compute_fee(tx: &Tx) -> String {
    if tx.total_in == 0 {
        return String::from("0");
    }
    format!("{}", tx.fee() as f64 / SATOSHIS_PER_BTC)
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
