use bx_stream::AppState;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};

/// GET /health - process status with live state and per-group subscribers
pub async fn health_check(State(state): State<AppState>) -> Response {
    let groups: Map<String, Value> = state
        .groups
        .subscriber_counts()
        .into_iter()
        .map(|(name, count)| (name.to_string(), json!(count)))
        .collect();

    let status = if state.shutdown.is_shutdown() {
        "shutting_down"
    } else {
        "healthy"
    };

    let health = json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "height": state.live.height.get(),
        "price": state.live.price.get(),
        "mempool": state.live.mempool_count.get(),
        "subscribers": groups,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(health)).into_response()
}

/// GET /live - liveness probe (is the process alive?)
pub async fn liveness_check() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// GET /ready - readiness probe; not ready once shutdown has begun
pub async fn readiness_check(State(state): State<AppState>) -> Response {
    if state.shutdown.is_shutdown() {
        return (StatusCode::SERVICE_UNAVAILABLE, "Shutting down").into_response();
    }

    (StatusCode::OK, "Ready").into_response()
}
