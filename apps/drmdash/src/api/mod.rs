//! # drmdash HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /status` - Snapshot summary
//! - `GET /countries` - Country selector options
//! - `GET /benchmarks/{scope}` - Benchmark options for `regional` or `global`
//! - `POST /series` - Resolve the series for one chart
//! - `POST /export` - Download resolved series as CSV
//!
//! ## Security Configuration
//!
//! - `server.cors_origins` / `DRMDASH_CORS_ORIGINS`: allowed origins, or "*" for all (default: localhost only)
//! - `server.rate_limit` / `DRMDASH_RATE_LIMIT`: requests per second (default: 100, 0 to disable)

mod handlers;
mod middleware;
mod types;

pub use middleware::{GlobalRateLimiter, create_rate_limiter};
// Re-export handlers and types for integration tests (via `drmdash::api::*`)
#[allow(unused_imports)]
pub use handlers::{
    benchmarks_handler, countries_handler, export_handler, health_handler, series_handler,
    status_handler,
};
#[allow(unused_imports)]
pub use types::{
    BenchmarksResponse, ChartResponse, CountryJson, ErrorResponse, HealthResponse,
    PlaceholderJson, SeriesJson, SeriesRequestJson, StatusResponse,
};

use crate::config::ServerConfig;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use drmdash_core::{DashError, Snapshot};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Maximum accepted request body (64 KB).
const MAX_BODY_SIZE: usize = 64 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: the read-only snapshot and the chart base year.
#[derive(Clone)]
pub struct AppState {
    pub snapshot: Arc<Snapshot>,
    pub base_year: i32,
}

impl AppState {
    /// Create new app state around a loaded snapshot.
    #[must_use]
    pub fn new(snapshot: Snapshot, base_year: i32) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            base_year,
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from the configured origins.
///
/// - `["*"]`: allows all origins
/// - empty: localhost only
/// - otherwise: the listed origins; invalid entries are skipped
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS: Allowing ALL origins. This is insecure for production!");
        return CorsLayer::permissive();
    }
    if origins.is_empty() {
        tracing::info!("CORS: No origins configured, defaulting to localhost only");
        return build_localhost_cors();
    }

    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(hv) => {
                tracing::info!("CORS: Allowing origin: {}", origin);
                Some(hv)
            }
            Err(e) => {
                tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    if allowed_origins.is_empty() {
        tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
        return build_localhost_cors();
    }

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Restrictive CORS layer for local dashboard front-ends.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:8050",
        "http://localhost:3000",
        "http://127.0.0.1:8050",
        "http://127.0.0.1:3000",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting - if enabled
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/countries", get(handlers::countries_handler))
        .route("/benchmarks/{scope}", get(handlers::benchmarks_handler))
        .route("/series", post(handlers::series_handler))
        .route("/export", post(handlers::export_handler));

    match create_rate_limiter(server.rate_limit) {
        Some(limiter) => {
            tracing::info!("Rate limiting enabled: {} requests/second", server.rate_limit);
            router = router.layer(axum_middleware::from_fn_with_state(
                limiter,
                middleware::rate_limit_middleware,
            ));
        }
        None => tracing::info!("Rate limiting disabled"),
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(&server.cors_origins))
                .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_SIZE)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(state: AppState, server: &ServerConfig) -> Result<(), DashError> {
    let addr = format!("{}:{}", server.host, server.port);
    let router = create_router(state, server);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| DashError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("drmdash HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| DashError::Io(format!("Server error: {}", e)))
}
