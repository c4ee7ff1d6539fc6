//! Per-client request budget for the `/api/v1` routes.

use crate::ApiError;

use bx_ratelimit::{FixedWindowLimiter, RateLimitDecision, client_identity};
use bx_stream::Metrics;

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use log::warn;

pub const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
pub const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

const EXPOSED_HEADERS: &str = "X-RateLimit-Limit, X-RateLimit-Remaining, X-RateLimit-Reset";

/// Middleware state: the shared limiter plus what to do once a client is over.
#[derive(Clone)]
pub struct ApiRateLimit {
    limiter: FixedWindowLimiter,
    /// `true` answers 429 without running the route; `false` runs it and
    /// then marks the response 429
    enforce: bool,
    metrics: Metrics,
}

impl ApiRateLimit {
    pub fn new(limiter: FixedWindowLimiter, enforce: bool) -> Self {
        Self {
            limiter,
            enforce,
            metrics: Metrics::new(),
        }
    }
}

/// Count the request against the caller's window and attach the
/// `X-RateLimit-*` headers. A failing counter store lets the request through
/// with only the limit and CORS headers set.
pub async fn enforce_rate_limit(
    State(rate_limit): State<ApiRateLimit>,
    request: Request,
    next: Next,
) -> Response {
    let forwarded_for = request
        .headers()
        .get(X_FORWARDED_FOR)
        .and_then(|value| value.to_str().ok());
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let identity = client_identity(forwarded_for, peer);

    let decision = match rate_limit.limiter.check(&identity).await {
        Ok(decision) => decision,
        Err(e) => {
            warn!("Rate limit check failed for {}, allowing request: {}", identity, e);
            let mut response = next.run(request).await;
            apply_limit_headers(
                response.headers_mut(),
                rate_limit.limiter.config().max_requests,
            );
            return response;
        }
    };

    if decision.limited {
        rate_limit.metrics.rate_limited();

        if rate_limit.enforce {
            let mut response = ApiError::rate_limited(decision.reset).into_response();
            apply_headers(response.headers_mut(), &decision);
            return response;
        }
    }

    let mut response = next.run(request).await;
    if decision.limited {
        *response.status_mut() = StatusCode::TOO_MANY_REQUESTS;
    }
    apply_headers(response.headers_mut(), &decision);
    response
}

fn apply_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    apply_limit_headers(headers, decision.limit);
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(decision.remaining()));
    headers.insert(X_RATELIMIT_RESET, HeaderValue::from(decision.reset));
}

/// Headers that do not depend on the counter
fn apply_limit_headers(headers: &mut HeaderMap, limit: u64) {
    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(limit));
    headers.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static(EXPOSED_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
}
