use crate::{RateLimitError, RateLimitStore, Result};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::info;
use redis::aio::ConnectionManager;
use tokio::sync::OnceCell;

/// Upper bound on one attempt to reach the counter store
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Counters kept in redis, shared by every server instance.
///
/// Connects on the first check. Until the store answers every check
/// errors, which the middleware treats as "not limited".
#[derive(Clone)]
pub struct RedisRateLimitStore {
    client: redis::Client,
    conn: Arc<OnceCell<ConnectionManager>>,
}

impl RedisRateLimitStore {
    /// Parse `redis_url` without connecting.
    pub fn new(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
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
                    CONNECT_TIMEOUT,
                    ConnectionManager::new(self.client.clone()),
                )
                .await
                .map_err(|_| {
                    RateLimitError::store(format!("connect timed out after {:?}", CONNECT_TIMEOUT))
                })??;
                info!("Rate limit store connected");
                Ok::<_, RateLimitError>(conn)
            })
            .await?;
        Ok(conn.clone())
    }
}

#[async_trait]
impl RateLimitStore for RedisRateLimitStore {
    async fn incr_with_expiry(&self, key: &str, expire_at: u64) -> Result<u64> {
        let mut conn = self.connection().await?;

        // MULTI / INCR / EXPIREAT / EXEC
        let (count,): (u64,) = redis::pipe()
            .atomic()
            .cmd("INCR")
            .arg(key)
            .cmd("EXPIREAT")
            .arg(key)
            .arg(expire_at)
            .ignore()
            .query_async(&mut conn)
            .await?;

        Ok(count)
    }
}
