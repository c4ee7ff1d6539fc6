use crate::{
    BridgeRelay, BroadcastGroup, BusStream, BusSubscriber, OverflowPolicy, RetryConfig,
    ShutdownCoordinator, StreamError,
};

use bx_core::Channel;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::time::timeout;

/// Bus whose subscriptions follow a script; once the script runs out every
/// subscription stays open and silent.
struct ScriptedBus {
    sessions: Mutex<VecDeque<Option<Vec<&'static str>>>>,
    subscribe_calls: AtomicUsize,
    channels: Mutex<Vec<String>>,
}

impl ScriptedBus {
    fn new(sessions: Vec<Option<Vec<&'static str>>>) -> Arc<Self> {
        Arc::new(Self {
            sessions: Mutex::new(sessions.into()),
            subscribe_calls: AtomicUsize::new(0),
            channels: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl BusSubscriber for ScriptedBus {
    async fn subscribe(&self, channel: &str) -> crate::Result<BusStream> {
        self.subscribe_calls.fetch_add(1, Ordering::SeqCst);
        self.channels.lock().unwrap().push(channel.to_string());

        match self.sessions.lock().unwrap().pop_front() {
            // None models a refused connection
            Some(None) => Err(StreamError::upstream("connection refused")),
            Some(Some(payloads)) => {
                Ok(futures::stream::iter(payloads.into_iter().map(|p| Ok(p.to_string()))).boxed())
            }
            None => Ok(futures::stream::pending().boxed()),
        }
    }
}

fn fast_retry() -> RetryConfig {
    RetryConfig {
        initial_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(40),
        jitter: false,
        ..RetryConfig::default()
    }
}

async fn next_payload(handle: &crate::SubscriberHandle) -> String {
    timeout(Duration::from_secs(5), handle.recv())
        .await
        .expect("relay should forward")
        .expect("group open")
        .payload()
        .to_string()
}

#[tokio::test(start_paused = true)]
async fn given_bus_messages_when_relay_runs_then_forwarded_in_order() {
    let bus = ScriptedBus::new(vec![Some(vec!["100", "101"])]);
    let group = BroadcastGroup::new("height", 16, OverflowPolicy::DropNewest);
    let handle = group.join();
    let coordinator = ShutdownCoordinator::new();

    let relay = BridgeRelay::for_channel(bus.clone(), Channel::Height, group.clone(), fast_retry())
        .unwrap();
    let task = tokio::spawn(relay.run(coordinator.subscribe_guard()));

    assert_eq!(next_payload(&handle).await, "100");
    assert_eq!(next_payload(&handle).await, "101");
    assert_eq!(bus.channels.lock().unwrap()[0], "btcplex:height");

    coordinator.shutdown();
    timeout(Duration::from_secs(1), task).await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn given_disconnects_and_refusals_when_relay_runs_then_resubscribes_and_keeps_forwarding() {
    let bus = ScriptedBus::new(vec![
        None,
        Some(vec!["a"]),
        None,
        Some(vec!["b", "c"]),
    ]);
    let group = BroadcastGroup::new("blocknotify", 16, OverflowPolicy::DropNewest);
    let handle = group.join();
    let coordinator = ShutdownCoordinator::new();

    let relay = BridgeRelay::new(bus.clone(), Channel::BlockNotify, "bn", group.clone(), fast_retry());
    let task = tokio::spawn(relay.run(coordinator.subscribe_guard()));

    assert_eq!(next_payload(&handle).await, "a");
    assert_eq!(next_payload(&handle).await, "b");
    assert_eq!(next_payload(&handle).await, "c");
    assert!(bus.subscribe_calls.load(Ordering::SeqCst) >= 4);

    coordinator.shutdown();
    timeout(Duration::from_secs(1), task).await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn given_relay_when_shutdown_then_stops_and_group_stays_usable() {
    let bus = ScriptedBus::new(vec![]);
    let group = BroadcastGroup::new("utxs", 16, OverflowPolicy::DropNewest);
    let coordinator = ShutdownCoordinator::new();

    let relay = BridgeRelay::for_channel(bus, Channel::PendingTx, group.clone(), fast_retry())
        .unwrap();
    let task = tokio::spawn(relay.run(coordinator.subscribe_guard()));
    tokio::task::yield_now().await;

    coordinator.shutdown();

    assert!(timeout(Duration::from_secs(1), task).await.is_ok());
    assert_eq!(group.subscriber_count(), 0);
}

#[test]
fn given_price_channel_when_for_channel_then_none() {
    let bus = ScriptedBus::new(vec![]);
    let group = BroadcastGroup::new("price", 4, OverflowPolicy::DropNewest);

    assert!(BridgeRelay::for_channel(bus, Channel::Price, group, fast_retry()).is_none());
}
