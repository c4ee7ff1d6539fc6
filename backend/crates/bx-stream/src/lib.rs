pub mod app_state;
pub mod bridge_relay;
pub mod broadcast_group;
pub mod bus_subscriber;
pub mod connection_id;
pub mod error;
pub mod event_formatter;
pub mod height_follower;
pub mod mempool_counter;
pub mod metrics;
pub mod overflow_policy;
pub mod pending_tx;
pub mod poll_sources;
pub mod price_refresher;
pub mod redis_bus;
pub mod retry;
pub mod send_report;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod sse;
pub mod stream_groups;
pub mod stream_handler;
pub mod stream_settings;
pub mod subscriber_handle;

mod subscriber_queue;

pub use app_state::{AppState, blocknotify_handler, events_handler, unconfirmed_handler};
pub use bridge_relay::BridgeRelay;
pub use broadcast_group::{BroadcastGroup, GroupMessage};
pub use bus_subscriber::{BusStream, BusSubscriber};
pub use connection_id::ConnectionId;
pub use error::{Result, StreamError};
pub use event_formatter::{EventFormatter, PassthroughFormatter};
pub use height_follower::HeightFollower;
pub use mempool_counter::MempoolCounter;
pub use metrics::Metrics;
pub use overflow_policy::OverflowPolicy;
pub use pending_tx::{HtmlTxRenderer, PendingTxFormatter, TxRenderer};
pub use poll_sources::{
    HeightSource, HttpPriceSource, MempoolSource, PriceSource, RedisStore, parse_height,
    parse_price,
};
pub use price_refresher::PriceRefresher;
pub use redis_bus::RedisBus;
pub use retry::{Backoff, IsRetryable, RetryConfig, with_retry};
pub use send_report::SendReport;
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use stream_groups::StreamGroups;
pub use stream_handler::{CONNECTION_LOG_TARGET, StreamExit, StreamHandler, StreamSpec};
pub use stream_settings::StreamSettings;
pub use subscriber_handle::SubscriberHandle;

#[cfg(test)]
mod tests;
