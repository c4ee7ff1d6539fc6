use crate::{Result, StreamError};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use serde_json::Value;
use tokio::sync::OnceCell;

/// Sorted set holding the raw mempool
pub const RAW_MEMPOOL_KEY: &str = "btcplex:rawmempool";
/// Indexed-store key holding the latest processed height
pub const LATEST_HEIGHT_KEY: &str = "height:latest";

#[async_trait]
pub trait MempoolSource: Send + Sync {
    /// Current number of pending transactions
    async fn mempool_size(&self) -> Result<u64>;
}

#[async_trait]
pub trait HeightSource: Send + Sync {
    /// Latest indexed height, `None` before the first block is indexed
    async fn latest_height(&self) -> Result<Option<u64>>;
}

#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_price(&self) -> Result<f64>;
}

/// Upper bound on one attempt to establish the store connection
pub const STORE_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Redis-protocol store (the bus redis or the SSDB index) read by pollers.
///
/// The connection is made on first use, so an unreachable store surfaces
/// as a retryable error inside the polling loop instead of at startup.
#[derive(Clone)]
pub struct RedisStore {
    client: redis::Client,
    conn: Arc<OnceCell<ConnectionManager>>,
}

impl RedisStore {
    /// Parse `url` without connecting.
    pub fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        Ok(Self {
            client,
            conn: Arc::new(OnceCell::new()),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                let conn = tokio::time::timeout(
                    STORE_CONNECT_TIMEOUT,
                    ConnectionManager::new(self.client.clone()),
                )
                .await
                .map_err(|_| {
                    StreamError::upstream(format!(
                        "store connect timed out after {:?}",
                        STORE_CONNECT_TIMEOUT
                    ))
                })??;
                info!("Connected to store {}", self.client.get_connection_info().addr);
                Ok::<_, StreamError>(conn)
            })
            .await?;
        Ok(conn.clone())
    }
}

#[async_trait]
impl MempoolSource for RedisStore {
    async fn mempool_size(&self) -> Result<u64> {
        let mut conn = self.connection().await?;
        let count: u64 = conn.zcard(RAW_MEMPOOL_KEY).await?;
        Ok(count)
    }
}

#[async_trait]
impl HeightSource for RedisStore {
    async fn latest_height(&self) -> Result<Option<u64>> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.get(LATEST_HEIGHT_KEY).await?;

        raw.map(|value| {
            value.trim().parse::<u64>().map_err(|e| {
                StreamError::malformed(LATEST_HEIGHT_KEY, format!("'{}': {}", value, e))
            })
        })
        .transpose()
    }
}

/// JSON ticker over HTTP; the price is read from one top-level field that
/// may hold a number or a numeric string.
#[derive(Clone)]
pub struct HttpPriceSource {
    client: reqwest::Client,
    url: String,
    field: String,
}

impl HttpPriceSource {
    pub fn new(url: impl Into<String>, field: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url, field)
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            field: field.into(),
        }
    }
}

#[async_trait]
impl PriceSource for HttpPriceSource {
    async fn fetch_price(&self) -> Result<f64> {
        let body: Value = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("Price ticker responded from {}", self.url);
        parse_price(&body, &self.field)
    }
}

/// Extract a positive, finite price from `body[field]`.
pub fn parse_price(body: &Value, field: &str) -> Result<f64> {
    let price = match body.get(field) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match price {
        Some(p) if p.is_finite() && p > 0.0 => Ok(p),
        _ => Err(StreamError::malformed(
            "price",
            format!("field '{}' missing or not a positive number", field),
        )),
    }
}

/// Height carried by a height-channel payload: a bare integer or a JSON
/// object with a `height` field.
pub fn parse_height(payload: &str) -> Result<u64> {
    let trimmed = payload.trim();
    if let Ok(height) = trimmed.parse::<u64>() {
        return Ok(height);
    }

    serde_json::from_str::<Value>(trimmed)
        .ok()
        .and_then(|value| value.get("height").and_then(Value::as_u64))
        .ok_or_else(|| StreamError::malformed("height", format!("unrecognised payload '{}'", trimmed)))
}
