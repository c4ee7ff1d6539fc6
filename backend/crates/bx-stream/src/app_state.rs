use crate::{
    EventFormatter, PassthroughFormatter, PendingTxFormatter, ShutdownCoordinator, StreamGroups,
    StreamHandler, StreamSettings, StreamSpec, TxRenderer,
};

use bx_core::LiveState;

use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;

pub const EVENTS_ENDPOINT: &str = "events";
pub const BLOCKNOTIFY_ENDPOINT: &str = "blocknotify";
pub const UNCONFIRMED_ENDPOINT: &str = "events_unconfirmed";

/// Shared state for the streaming endpoints
#[derive(Clone)]
pub struct AppState {
    pub groups: StreamGroups,
    pub live: LiveState,
    pub shutdown: ShutdownCoordinator,
    pub settings: StreamSettings,
    pub renderer: Arc<dyn TxRenderer>,
}

impl AppState {
    /// Price and height updates for the explorer header
    pub fn events_spec(&self) -> StreamSpec {
        StreamSpec {
            endpoint: EVENTS_ENDPOINT,
            groups: vec![self.groups.price.clone(), self.groups.height.clone()],
            timeout: self.settings.events_timeout,
            formatter: Arc::new(PassthroughFormatter),
        }
    }

    /// Raw block notifications for API consumers
    pub fn blocknotify_spec(&self) -> StreamSpec {
        StreamSpec {
            endpoint: BLOCKNOTIFY_ENDPOINT,
            groups: vec![self.groups.block_notify.clone()],
            timeout: self.settings.blocknotify_timeout,
            formatter: Arc::new(PassthroughFormatter),
        }
    }

    /// Rendered pending transactions with the live mempool count
    pub fn unconfirmed_spec(&self) -> StreamSpec {
        let formatter: Arc<dyn EventFormatter> = Arc::new(PendingTxFormatter::new(
            Arc::clone(&self.renderer),
            self.live.mempool_count.clone(),
        ));

        StreamSpec {
            endpoint: UNCONFIRMED_ENDPOINT,
            groups: vec![self.groups.pending_tx.clone()],
            timeout: self.settings.unconfirmed_timeout,
            formatter,
        }
    }

    fn open(&self, spec: StreamSpec) -> Response {
        StreamHandler::open(
            spec,
            self.settings.frame_buffer,
            self.shutdown.subscribe_guard(),
        )
    }
}

/// `GET /events`
pub async fn events_handler(State(state): State<AppState>) -> Response {
    state.open(state.events_spec())
}

/// `GET /api/v1/blocknotify`
pub async fn blocknotify_handler(State(state): State<AppState>) -> Response {
    state.open(state.blocknotify_spec())
}

/// `GET /events_unconfirmed`
pub async fn unconfirmed_handler(State(state): State<AppState>) -> Response {
    state.open(state.unconfirmed_spec())
}
