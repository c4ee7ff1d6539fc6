use crate::broadcast_group::GroupMessage;
use crate::{
    BroadcastGroup, ConnectionId, EventFormatter, Metrics, ShutdownGuard, SubscriberHandle, sse,
};

use std::fmt;
use std::future::pending;
use std::sync::Arc;
use std::time::Duration;

use axum::response::Response;
use bytes::Bytes;
use futures::future::select_all;
use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

/// Why a stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamExit {
    /// The client went away (body dropped)
    ClientGone,
    /// Fixed connection lifetime elapsed
    Deadline,
    Shutdown,
    /// A joined group was closed
    GroupClosed,
}

impl StreamExit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClientGone => "client_gone",
            Self::Deadline => "deadline",
            Self::Shutdown => "shutdown",
            Self::GroupClosed => "group_closed",
        }
    }
}

/// Log target for per-connection lifecycle lines, so they can be filtered
/// apart from the rest of the crate
pub const CONNECTION_LOG_TARGET: &str = "bx_stream::connection";

/// `{endpoint}#{connection id}` prefix on every connection log line
struct StreamContext {
    endpoint: &'static str,
    id: ConnectionId,
}

impl fmt::Display for StreamContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.endpoint, self.id)
    }
}

/// What one endpoint streams and for how long.
#[derive(Clone)]
pub struct StreamSpec {
    pub endpoint: &'static str,
    pub groups: Vec<BroadcastGroup>,
    /// Counted from connection open; events do not extend it
    pub timeout: Duration,
    pub formatter: Arc<dyn EventFormatter>,
}

/// One long-lived SSE connection.
///
/// Joins its groups when created and owns the handles; whatever the exit
/// path, the handles are released before `run` returns. The lifetime is
/// counted from creation.
pub struct StreamHandler {
    id: ConnectionId,
    spec: StreamSpec,
    handles: Vec<SubscriberHandle>,
    opened: Instant,
    metrics: Metrics,
}

impl StreamHandler {
    pub fn new(spec: StreamSpec) -> Self {
        let handles = spec.groups.iter().map(BroadcastGroup::join).collect();
        Self {
            id: ConnectionId::new(),
            spec,
            handles,
            opened: Instant::now(),
            metrics: Metrics::new(),
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    fn context(&self) -> StreamContext {
        StreamContext {
            endpoint: self.spec.endpoint,
            id: self.id,
        }
    }

    /// Join the groups, spawn the handler task and return the SSE response
    /// it feeds.
    pub fn open(spec: StreamSpec, frame_buffer: usize, shutdown: ShutdownGuard) -> Response {
        let (tx, rx) = mpsc::channel(frame_buffer.max(1));
        let handler = Self::new(spec);
        tokio::spawn(handler.run(tx, shutdown));
        sse::response(rx)
    }

    /// Relay group messages into `tx` until the client leaves, the deadline
    /// passes, shutdown is signalled or a group closes.
    pub async fn run(mut self, tx: mpsc::Sender<Bytes>, mut shutdown: ShutdownGuard) -> StreamExit {
        let deadline = self.opened + self.spec.timeout;

        self.metrics.stream_opened(self.spec.endpoint);
        info!(
            target: CONNECTION_LOG_TARGET,
            "{} opened ({} groups, {:?} lifetime)",
            self.context(),
            self.handles.len(),
            self.spec.timeout
        );

        let exit = loop {
            tokio::select! {
                message = next_message(&self.handles) => match message {
                    Some(message) => {
                        if let Some(exit) = self.deliver(&message, &tx, deadline, &mut shutdown).await {
                            break exit;
                        }
                    }
                    None => break StreamExit::GroupClosed,
                },
                _ = tx.closed() => break StreamExit::ClientGone,
                _ = sleep_until(deadline) => break StreamExit::Deadline,
                _ = shutdown.wait() => break StreamExit::Shutdown,
            }
        };

        // Leave every group before reporting the stream closed
        self.handles.clear();
        drop(tx);

        self.metrics
            .stream_closed(self.spec.endpoint, exit.as_str(), self.opened.elapsed());
        info!(target: CONNECTION_LOG_TARGET, "{} closed: {}", self.context(), exit.as_str());

        exit
    }

    /// Format and queue one frame. Formatting failures only skip the event.
    ///
    /// A client that stops reading parks the send; shutdown and the
    /// deadline still end the stream while it waits.
    async fn deliver(
        &self,
        message: &GroupMessage,
        tx: &mpsc::Sender<Bytes>,
        deadline: Instant,
        shutdown: &mut ShutdownGuard,
    ) -> Option<StreamExit> {
        let payload = match self.spec.formatter.format(message) {
            Ok(payload) => payload,
            Err(e) => {
                self.metrics.event_skipped(message.channel.as_str());
                warn!(
                    target: CONNECTION_LOG_TARGET,
                    "{} skipped {} event: {}",
                    self.context(),
                    message.channel,
                    e
                );
                return None;
            }
        };

        tokio::select! {
            sent = tx.send(sse::frame(&payload)) => match sent {
                Ok(()) => {
                    self.metrics.event_sent(message.channel.as_str());
                    debug!(target: CONNECTION_LOG_TARGET, "{} sent {} event", self.context(), message.channel);
                    None
                }
                Err(_) => Some(StreamExit::ClientGone),
            },
            _ = sleep_until(deadline) => Some(StreamExit::Deadline),
            _ = shutdown.wait() => {
                debug!(
                    target: CONNECTION_LOG_TARGET,
                    "{} dropped a pending {} frame on shutdown",
                    self.context(),
                    message.channel
                );
                Some(StreamExit::Shutdown)
            }
        }
    }
}

/// Next message from any of the handles; `None` when one of them closes.
async fn next_message(handles: &[SubscriberHandle]) -> Option<GroupMessage> {
    match handles {
        [] => pending().await,
        [only] => only.recv().await,
        many => {
            let (message, _, _) = select_all(many.iter().map(|handle| Box::pin(handle.recv()))).await;
            message
        }
    }
}
