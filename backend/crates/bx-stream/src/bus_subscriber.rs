use crate::Result;

use async_trait::async_trait;
use futures::stream::BoxStream;

/// Payload stream from one bus channel. Ends when the connection drops.
pub type BusStream = BoxStream<'static, Result<String>>;

/// Source side of a bridge relay: anything that can subscribe to a named
/// pub/sub channel.
#[async_trait]
pub trait BusSubscriber: Send + Sync {
    async fn subscribe(&self, channel: &str) -> Result<BusStream>;
}
