//! # Request Throttling
//!
//! One process-wide token bucket in front of every route. The dashboard
//! polls `/series` once per control change, so the limit is global rather
//! than per client.
//!
//! `server.rate_limit` (or `DRMDASH_RATE_LIMIT`) sets the requests per
//! second; `0` turns throttling off and no layer is installed.

use super::types::ErrorResponse;
use axum::{
    Json,
    body::Body,
    extract::State,
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Seconds a throttled client should wait; the quota refills per second.
const RETRY_AFTER_SECS: &str = "1";

pub type GlobalRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Build the shared limiter, or `None` when throttling is disabled.
#[must_use]
pub fn create_rate_limiter(requests_per_second: u32) -> Option<GlobalRateLimiter> {
    NonZeroU32::new(requests_per_second)
        .map(|rps| Arc::new(RateLimiter::direct(Quota::per_second(rps))))
}

/// Reject with 429, a JSON `ErrorResponse` and `Retry-After` once the
/// bucket is empty.
pub async fn rate_limit_middleware(
    State(limiter): State<GlobalRateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if limiter.check().is_ok() {
        return next.run(request).await;
    }

    tracing::warn!(
        method = %request.method(),
        path = request.uri().path(),
        "Request throttled"
    );
    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(ErrorResponse::new("Too many requests, retry shortly")),
    )
        .into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from_static(RETRY_AFTER_SECS));
    response
}
