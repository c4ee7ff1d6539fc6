#![allow(dead_code)]

//! Test infrastructure for bx-server router tests

use bx_core::LiveState;
use bx_ratelimit::{
    FixedWindowLimiter, MemoryRateLimitStore, RateLimitConfig, RateLimitError, RateLimitStore,
};
use bx_server::{ApiRateLimit, build_router};
use bx_stream::{AppState, HtmlTxRenderer, ShutdownCoordinator, StreamGroups, StreamSettings};

use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;

pub const TEST_HEIGHT: u64 = 812_345;

/// AppState whose height cell already holds `TEST_HEIGHT`
pub fn create_test_app_state() -> AppState {
    create_app_state(Some(TEST_HEIGHT))
}

/// AppState with an optional published height; `None` leaves the cell unset
pub fn create_app_state(height: Option<u64>) -> AppState {
    let config = bx_config::StreamConfig::default();
    let (writers, live) = LiveState::new(0, 0.0);
    if let Some(height) = height {
        writers.height.publish(height);
    }
    writers.price.publish(612.5);

    AppState {
        groups: StreamGroups::new(&config),
        live,
        shutdown: ShutdownCoordinator::new(),
        settings: StreamSettings::from(&config),
        renderer: Arc::new(HtmlTxRenderer),
    }
}

/// Limiter over in-process counters
pub fn memory_rate_limit(max_requests: u64, enforce: bool) -> ApiRateLimit {
    let limiter = FixedWindowLimiter::new(
        Arc::new(MemoryRateLimitStore::new()),
        RateLimitConfig {
            max_requests,
            window_secs: 3600,
        },
    )
    .expect("valid rate limit config");
    ApiRateLimit::new(limiter, enforce)
}

/// Counter store that is always down
struct UnavailableStore;

#[async_trait]
impl RateLimitStore for UnavailableStore {
    async fn incr_with_expiry(&self, _key: &str, _expire_at: u64) -> bx_ratelimit::Result<u64> {
        Err(RateLimitError::store("connection refused"))
    }
}

/// Limiter whose store never answers
pub fn unavailable_rate_limit(max_requests: u64) -> ApiRateLimit {
    let limiter = FixedWindowLimiter::new(
        Arc::new(UnavailableStore),
        RateLimitConfig {
            max_requests,
            window_secs: 3600,
        },
    )
    .expect("valid rate limit config");
    ApiRateLimit::new(limiter, true)
}

pub fn create_test_server(state: AppState, rate_limit: Option<ApiRateLimit>) -> TestServer {
    TestServer::builder()
        .http_transport()
        .build(build_router(state, rate_limit))
        .expect("Failed to create test server")
}
