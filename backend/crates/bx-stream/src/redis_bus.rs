use crate::{BusStream, BusSubscriber, Result};

use async_trait::async_trait;
use futures::StreamExt;
use log::debug;

/// Redis pub/sub as the external message bus.
///
/// Every `subscribe` opens a dedicated pub/sub connection, so a relay that
/// reconnects never shares state with the previous attempt.
#[derive(Clone)]
pub struct RedisBus {
    client: redis::Client,
}

impl RedisBus {
    pub fn new(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl BusSubscriber for RedisBus {
    async fn subscribe(&self, channel: &str) -> Result<BusStream> {
        let mut pubsub = self.client.get_async_pubsub().await?;
        pubsub.subscribe(channel).await?;
        debug!("Subscribed to redis channel {}", channel);

        let stream = pubsub
            .into_on_message()
            .map(|msg| msg.get_payload::<String>().map_err(Into::into));

        Ok(stream.boxed())
    }
}
