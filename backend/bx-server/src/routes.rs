use crate::rate_limit::{ApiRateLimit, enforce_rate_limit};
use crate::{api, health};

use bx_stream::{AppState, blocknotify_handler, events_handler, unconfirmed_handler};

use axum::{Router, middleware, routing::get};
use tower_http::cors::{Any, CorsLayer};

pub const ROBOTS_TXT: &str = "User-agent: *\nDisallow: /api";

/// Build the application router with all endpoints.
/// `rate_limit` of `None` leaves the API unmetered.
pub fn build_router(state: AppState, rate_limit: Option<ApiRateLimit>) -> Router {
    let mut api_routes = Router::new()
        .route("/blocknotify", get(blocknotify_handler))
        .route("/getblockcount", get(api::blocks::get_block_count));

    if let Some(rate_limit) = rate_limit {
        api_routes = api_routes.layer(middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ));
    }

    Router::new()
        // Server-sent event streams
        .route("/events", get(events_handler))
        .route("/events_unconfirmed", get(unconfirmed_handler))
        // Keep crawlers off the API
        .route("/robots.txt", get(robots_txt))
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api/v1", api_routes)
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn robots_txt() -> &'static str {
    ROBOTS_TXT
}
