//! # Chart Outcome
//!
//! The boundary between resolution and rendering. Every resolver result,
//! success or failure, becomes something a chart can display: either the
//! series, or a placeholder message.

use crate::types::{DashError, ResolvedSeries, SeriesRequest};
use serde::{Deserialize, Serialize};

/// Why a placeholder is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    /// Valid request, nothing to draw.
    NoData,
    /// The request could not be served.
    Error,
}

/// What the rendering layer receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartOutcome {
    Series { series: Vec<ResolvedSeries> },
    Placeholder { kind: PlaceholderKind, message: String },
}

impl ChartOutcome {
    #[must_use]
    pub fn no_data(message: impl Into<String>) -> Self {
        Self::Placeholder {
            kind: PlaceholderKind::NoData,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Placeholder {
            kind: PlaceholderKind::Error,
            message: message.into(),
        }
    }

    /// Convert a resolver result for `request`.
    ///
    /// - Non-empty series pass through
    /// - An empty request becomes "No country selected"
    /// - An empty result or `EmptyResult` becomes "No data available"
    /// - Any other error becomes an error placeholder with its message
    #[must_use]
    pub fn from_result(
        request: &SeriesRequest,
        result: Result<Vec<ResolvedSeries>, DashError>,
    ) -> Self {
        match result {
            Ok(series) if !series.is_empty() => Self::Series { series },
            Ok(_) if request.is_empty() => Self::no_data("No country selected"),
            Ok(_) => Self::no_data("No data available"),
            Err(e) if e.is_no_data() => Self::no_data("No data available"),
            Err(e) => Self::error(e.to_string()),
        }
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }

    /// The series, or an empty slice for a placeholder.
    #[must_use]
    pub fn series(&self) -> &[ResolvedSeries] {
        match self {
            Self::Series { series } => series,
            Self::Placeholder { .. } => &[],
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Observation, SeriesKind};
    use std::path::PathBuf;

    fn one_series() -> Vec<ResolvedSeries> {
        vec![ResolvedSeries {
            code: "KEN".to_string(),
            display_name: "Kenya".to_string(),
            color: "#295e84".to_string(),
            kind: SeriesKind::SelectedCountry,
            rows: vec![Observation::new(2020, Some(1.0))],
        }]
    }

    #[test]
    fn series_pass_through() {
        let out = ChartOutcome::from_result(&SeriesRequest::for_country("KEN"), Ok(one_series()));
        assert!(!out.is_placeholder());
        assert_eq!(out.series().len(), 1);
    }

    #[test]
    fn empty_request_says_no_country() {
        let out = ChartOutcome::from_result(&SeriesRequest::new(), Ok(vec![]));
        assert_eq!(out, ChartOutcome::no_data("No country selected"));
    }

    #[test]
    fn empty_result_is_no_data() {
        let request = SeriesRequest::for_country("TCD");
        assert_eq!(
            ChartOutcome::from_result(&request, Ok(vec![])),
            ChartOutcome::no_data("No data available")
        );
        let err = DashError::EmptyResult {
            source_id: "wup".to_string(),
        };
        assert_eq!(
            ChartOutcome::from_result(&request, Err(err)),
            ChartOutcome::no_data("No data available")
        );
    }

    #[test]
    fn data_not_found_is_error_placeholder() {
        let err = DashError::DataNotFound {
            source_id: "flood".to_string(),
            path: Some(PathBuf::from("/data/flood.csv")),
        };
        let out = ChartOutcome::from_result(&SeriesRequest::for_country("KEN"), Err(err));
        match out {
            ChartOutcome::Placeholder { kind, message } => {
                assert_eq!(kind, PlaceholderKind::Error);
                assert!(message.contains("flood"));
            }
            ChartOutcome::Series { .. } => unreachable!("expected placeholder"),
        }
    }
}
