use crate::tests::{envelope, height};
use crate::{
    BroadcastGroup, EventFormatter, HtmlTxRenderer, OverflowPolicy, PassthroughFormatter,
    PendingTxFormatter, ShutdownCoordinator, StreamExit, StreamHandler, StreamSpec,
};

use bx_core::{Channel, EventEnvelope, StateCell};

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{advance, timeout};

fn group(name: &str) -> BroadcastGroup {
    BroadcastGroup::new(name, 16, OverflowPolicy::DropNewest)
}

fn spec(groups: Vec<BroadcastGroup>, timeout: Duration) -> StreamSpec {
    StreamSpec {
        endpoint: "events",
        groups,
        timeout,
        formatter: Arc::new(PassthroughFormatter),
    }
}

/// Create the handler (joining its groups) and run it on a task.
fn start(
    spec: StreamSpec,
    coordinator: &ShutdownCoordinator,
) -> (mpsc::Receiver<Bytes>, JoinHandle<StreamExit>) {
    start_buffered(spec, coordinator, 8)
}

fn start_buffered(
    spec: StreamSpec,
    coordinator: &ShutdownCoordinator,
    frame_buffer: usize,
) -> (mpsc::Receiver<Bytes>, JoinHandle<StreamExit>) {
    let (tx, rx) = mpsc::channel(frame_buffer);
    let handler = StreamHandler::new(spec);
    let task = tokio::spawn(handler.run(tx, coordinator.subscribe_guard()));
    (rx, task)
}

async fn next_frame(rx: &mut mpsc::Receiver<Bytes>) -> String {
    let frame = timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("frame in time")
        .expect("stream still open");
    String::from_utf8(frame.to_vec()).unwrap()
}

#[tokio::test]
async fn given_price_event_when_sent_then_client_gets_sse_frame() {
    let price = group("price");
    let coordinator = ShutdownCoordinator::new();
    let (mut rx, _task) = start(spec(vec![price.clone()], Duration::from_secs(900)), &coordinator);

    price.send(EventEnvelope::price(612.5)).await;

    assert_eq!(
        next_frame(&mut rx).await,
        "data: {\"t\": \"price\", \"price\": 612.5}\n\n"
    );
}

#[tokio::test]
async fn given_two_groups_when_each_sends_then_both_events_delivered() {
    let price = group("price");
    let height_group = group("height");
    let coordinator = ShutdownCoordinator::new();
    let (mut rx, _task) = start(
        spec(vec![price.clone(), height_group.clone()], Duration::from_secs(900)),
        &coordinator,
    );

    height_group.send(height("812345")).await;
    assert_eq!(next_frame(&mut rx).await, "data: 812345\n\n");

    price.send(EventEnvelope::price(1.5)).await;
    assert_eq!(
        next_frame(&mut rx).await,
        "data: {\"t\": \"price\", \"price\": 1.5}\n\n"
    );
}

#[tokio::test(start_paused = true)]
async fn given_open_stream_when_lifetime_elapses_then_deadline_exit_despite_events() {
    let height_group = group("height");
    let coordinator = ShutdownCoordinator::new();
    let (mut rx, task) = start(spec(vec![height_group.clone()], Duration::from_secs(900)), &coordinator);

    advance(Duration::from_secs(899)).await;
    height_group.send(height("1")).await;
    assert_eq!(next_frame(&mut rx).await, "data: 1\n\n");

    // The event above must not have extended the lifetime
    advance(Duration::from_secs(1)).await;
    let exit = timeout(Duration::from_millis(10), task).await.unwrap().unwrap();

    assert_eq!(exit, StreamExit::Deadline);
    assert_eq!(height_group.subscriber_count(), 0);
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn given_client_disconnect_when_detected_then_subscriptions_released() {
    let height_group = group("height");
    let coordinator = ShutdownCoordinator::new();
    let (rx, task) = start(spec(vec![height_group.clone()], Duration::from_secs(900)), &coordinator);
    assert_eq!(height_group.subscriber_count(), 1);

    drop(rx);
    let exit = timeout(Duration::from_secs(1), task).await.unwrap().unwrap();

    assert_eq!(exit, StreamExit::ClientGone);
    assert_eq!(height_group.subscriber_count(), 0);
}

#[tokio::test]
async fn given_shutdown_when_signalled_then_stream_ends() {
    let height_group = group("height");
    let coordinator = ShutdownCoordinator::new();
    let (_rx, task) = start(spec(vec![height_group.clone()], Duration::from_secs(900)), &coordinator);

    coordinator.shutdown();
    let exit = timeout(Duration::from_secs(1), task).await.unwrap().unwrap();

    assert_eq!(exit, StreamExit::Shutdown);
    assert_eq!(height_group.subscriber_count(), 0);
}

#[tokio::test]
async fn given_group_closed_when_running_then_stream_ends() {
    let height_group = group("height");
    let coordinator = ShutdownCoordinator::new();
    let (_rx, task) = start(spec(vec![height_group.clone()], Duration::from_secs(900)), &coordinator);

    height_group.close();
    let exit = timeout(Duration::from_secs(1), task).await.unwrap().unwrap();

    assert_eq!(exit, StreamExit::GroupClosed);
}

#[tokio::test]
async fn given_malformed_pending_tx_when_formatted_then_skipped_and_stream_continues() {
    let pending = group("utxs");
    let (_writer, mempool_count) = StateCell::new(2u64);
    let formatter: Arc<dyn EventFormatter> = Arc::new(PendingTxFormatter::new(
        Arc::new(HtmlTxRenderer),
        mempool_count,
    ));
    let coordinator = ShutdownCoordinator::new();
    let (mut rx, _task) = start(
        StreamSpec {
            endpoint: "events_unconfirmed",
            groups: vec![pending.clone()],
            timeout: Duration::from_secs(900),
            formatter,
        },
        &coordinator,
    );

    pending.send(envelope(Channel::PendingTx, "not json")).await;
    pending
        .send(envelope(
            Channel::PendingTx,
            r#"{"hash": "abcd", "size": 250, "total_in": 6000, "total_out": 5000, "vin_cnt": 1, "vout_cnt": 2}"#,
        ))
        .await;

    let frame = next_frame(&mut rx).await;
    assert!(frame.starts_with("data: {"));
    assert!(frame.contains("\"cnt\":2"));
    assert!(frame.contains("/tx/abcd"));
}

#[tokio::test(start_paused = true)]
async fn given_idle_stream_when_before_deadline_then_still_open() {
    let height_group = group("height");
    let coordinator = ShutdownCoordinator::new();
    let (_rx, task) = start(spec(vec![height_group.clone()], Duration::from_secs(1300)), &coordinator);

    advance(Duration::from_secs(1299)).await;
    assert!(!task.is_finished());
    assert_eq!(height_group.subscriber_count(), 1);

    advance(Duration::from_secs(1)).await;
    let exit = timeout(Duration::from_millis(10), task).await.unwrap().unwrap();
    assert_eq!(exit, StreamExit::Deadline);
}

/// Fill a one-frame buffer and leave the handler parked on the next send.
async fn stall_client(height_group: &BroadcastGroup, rx: &mpsc::Receiver<Bytes>) {
    for value in ["1", "2", "3"] {
        height_group.send(height(value)).await;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(rx.len(), 1);
}

#[tokio::test]
async fn given_stalled_client_when_shutdown_signalled_then_stream_ends() {
    let height_group = group("height");
    let coordinator = ShutdownCoordinator::new();
    let (rx, task) = start_buffered(
        spec(vec![height_group.clone()], Duration::from_secs(900)),
        &coordinator,
        1,
    );
    stall_client(&height_group, &rx).await;
    assert!(!task.is_finished());

    coordinator.shutdown();
    let exit = timeout(Duration::from_secs(1), task).await.unwrap().unwrap();

    assert_eq!(exit, StreamExit::Shutdown);
    assert_eq!(height_group.subscriber_count(), 0);
    drop(rx);
}

#[tokio::test]
async fn given_inflight_send_when_client_disconnects_then_subscriptions_released() {
    let height_group = group("height");
    let coordinator = ShutdownCoordinator::new();
    let (rx, task) = start_buffered(
        spec(vec![height_group.clone()], Duration::from_secs(900)),
        &coordinator,
        1,
    );
    stall_client(&height_group, &rx).await;
    assert_eq!(height_group.subscriber_count(), 1);

    drop(rx);
    let exit = timeout(Duration::from_secs(1), task).await.unwrap().unwrap();

    assert_eq!(exit, StreamExit::ClientGone);
    assert_eq!(height_group.subscriber_count(), 0);
}
