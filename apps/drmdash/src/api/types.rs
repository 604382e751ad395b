//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use drmdash_core::{
    BenchmarkOption, ChartOutcome, CountryRecord, Observation, PlaceholderKind, RegionCode,
    ResolvedSeries, SeriesKind, SeriesRequest, SnapshotSummary, SourceSummary,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Snapshot status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub countries: usize,
    pub base_year: i32,
    pub sources: Vec<SourceSummary>,
}

impl StatusResponse {
    #[must_use]
    pub fn new(summary: SnapshotSummary, base_year: i32) -> Self {
        Self {
            countries: summary.countries,
            base_year,
            sources: summary.sources,
        }
    }
}

// =============================================================================
// REFERENCE DATA
// =============================================================================

/// One entry of the country selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryJson {
    pub code: String,
    pub display_name: String,
    pub region_code: RegionCode,
}

impl From<&CountryRecord> for CountryJson {
    fn from(record: &CountryRecord) -> Self {
        Self {
            code: record.code.clone(),
            display_name: record.display_name.clone(),
            region_code: record.region_code,
        }
    }
}

/// Benchmark options for one scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarksResponse {
    pub scope: String,
    pub options: Vec<BenchmarkOption>,
}

// =============================================================================
// SERIES REQUEST
// =============================================================================

/// Series request body for `/series` and `/export`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesRequestJson {
    /// Configured source id, e.g. `wup_urban_share`.
    pub source: String,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub regional_codes: BTreeSet<String>,
    #[serde(default)]
    pub global_codes: BTreeSet<String>,
    #[serde(default)]
    pub peer_countries: Vec<String>,
}

impl SeriesRequestJson {
    /// The core request with normalized codes. An empty `country_code`
    /// means "none selected".
    #[must_use]
    pub fn to_request(&self) -> SeriesRequest {
        SeriesRequest {
            country_code: self.country_code.clone(),
            regional_codes: self.regional_codes.clone(),
            global_codes: self.global_codes.clone(),
            peer_countries: self.peer_countries.clone(),
        }
        .normalized()
    }
}

// =============================================================================
// CHART RESPONSE
// =============================================================================

/// One chart line, split at the base year.
///
/// The base-year row appears in both halves so the two line styles join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesJson {
    pub code: String,
    pub display_name: String,
    pub color: String,
    pub kind: SeriesKind,
    pub historical: Vec<Observation>,
    pub projection: Vec<Observation>,
}

impl SeriesJson {
    #[must_use]
    pub fn from_series(series: &ResolvedSeries, base_year: i32) -> Self {
        let (historical, projection) = series.split_at(base_year);
        Self {
            code: series.code.clone(),
            display_name: series.display_name.clone(),
            color: series.color.clone(),
            kind: series.kind,
            historical,
            projection,
        }
    }
}

/// Message shown in place of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderJson {
    pub kind: PlaceholderKind,
    pub message: String,
}

/// Everything a chart needs: series to draw, or a placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartResponse {
    pub source: String,
    pub base_year: i32,
    pub series: Vec<SeriesJson>,
    pub placeholder: Option<PlaceholderJson>,
}

impl ChartResponse {
    #[must_use]
    pub fn from_outcome(source: &str, base_year: i32, outcome: &ChartOutcome) -> Self {
        let placeholder = match outcome {
            ChartOutcome::Series { .. } => None,
            ChartOutcome::Placeholder { kind, message } => Some(PlaceholderJson {
                kind: *kind,
                message: message.clone(),
            }),
        };
        Self {
            source: source.to_string(),
            base_year,
            series: outcome
                .series()
                .iter()
                .map(|s| SeriesJson::from_series(s, base_year))
                .collect(),
            placeholder,
        }
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Error body for non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
