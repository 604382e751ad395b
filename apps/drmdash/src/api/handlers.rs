//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{
        BenchmarksResponse, ChartResponse, CountryJson, ErrorResponse, HealthResponse,
        SeriesRequestJson, StatusResponse,
    },
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use drmdash_core::{
    BenchmarkRegistry, BenchmarkScope, ChartOutcome, DashError, export_csv, export_file_name,
    resolve, validate_request,
};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

/// Snapshot summary.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let response = StatusResponse::new(state.snapshot.summary(), state.base_year);
    (StatusCode::OK, Json(response))
}

// =============================================================================
// REFERENCE DATA HANDLERS
// =============================================================================

/// Country selector options, ordered by display name.
pub async fn countries_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut countries: Vec<CountryJson> = state
        .snapshot
        .countries()
        .iter()
        .map(CountryJson::from)
        .collect();
    countries.sort_by(|a, b| {
        a.display_name
            .cmp(&b.display_name)
            .then_with(|| a.code.cmp(&b.code))
    });
    (StatusCode::OK, Json(countries))
}

/// Benchmark options for `regional` or `global`.
pub async fn benchmarks_handler(Path(scope): Path<String>) -> Response {
    match scope.parse::<BenchmarkScope>() {
        Ok(scope) => {
            let response = BenchmarksResponse {
                scope: scope.to_string(),
                options: BenchmarkRegistry::for_scope(scope).options(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => (StatusCode::NOT_FOUND, Json(ErrorResponse::new(e.to_string()))).into_response(),
    }
}

// =============================================================================
// SERIES HANDLER
// =============================================================================

/// Map a body rejection to 400 with a JSON error.
fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
}

/// Resolve the series for one chart.
///
/// Resolution failures are reported as a placeholder inside a 200 response;
/// only a malformed or oversized request is a 400.
pub async fn series_handler(
    State(state): State<AppState>,
    body: Result<Json<SeriesRequestJson>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(format!("Invalid request body: {}", rejection)),
    };

    let request = body.to_request();
    if let Err(e) = validate_request(&request) {
        return bad_request(e.to_string());
    }

    let snapshot = &state.snapshot;
    let result = resolve(&body.source, &request, snapshot.countries(), snapshot.as_ref());
    if let Err(e) = &result {
        if !e.is_no_data() {
            tracing::warn!(source = %body.source, "Series resolution failed: {}", e);
        }
    }

    let outcome = ChartOutcome::from_result(&request, result);
    tracing::debug!(
        source = %body.source,
        series = outcome.series().len(),
        placeholder = outcome.is_placeholder(),
        "Resolved chart"
    );

    let response = ChartResponse::from_outcome(&body.source, state.base_year, &outcome);
    (StatusCode::OK, Json(response)).into_response()
}

// =============================================================================
// EXPORT HANDLER
// =============================================================================

/// Download the resolved series as CSV.
///
/// Anything that would render as a placeholder is a 404 here.
pub async fn export_handler(
    State(state): State<AppState>,
    body: Result<Json<SeriesRequestJson>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(format!("Invalid request body: {}", rejection)),
    };

    let request = body.to_request();
    let snapshot = &state.snapshot;
    let series = match resolve(&body.source, &request, snapshot.countries(), snapshot.as_ref()) {
        Ok(series) if !series.is_empty() => series,
        Ok(_) => return (StatusCode::NOT_FOUND, "No data available").into_response(),
        Err(DashError::InvalidRequest(message)) => return bad_request(message),
        Err(e) => {
            tracing::warn!(source = %body.source, "Export failed: {}", e);
            return (StatusCode::NOT_FOUND, e.to_string()).into_response();
        }
    };

    match export_csv(&series) {
        Ok(bytes) => {
            let disposition = format!(
                "attachment; filename=\"{}\"",
                export_file_name(&body.source, &series)
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(format!("Export failed: {}", e))),
        )
            .into_response(),
    }
}
