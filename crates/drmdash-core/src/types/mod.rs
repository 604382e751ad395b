//! # Core Type Definitions
//!
//! This module contains the value types shared by every drmdash component:
//! - Reference data (`RegionCode`, `CountryRecord`, `BenchmarkEntry`)
//! - Query input (`SeriesRequest`)
//! - Query output (`Observation`, `ResolvedSeries`, `SeriesKind`)
//! - Error types (`DashError`)
//!
//! ## Ordering Guarantees
//!
//! Request code sets are `BTreeSet`s so that two requests naming the same
//! codes compare equal regardless of how the caller listed them. Output
//! order is never taken from these sets; the resolver imposes registry
//! declaration order instead.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// REGION CODES
// =============================================================================

/// World Bank regional aggregate codes used by the dashboard.
///
/// `SSA`, `AFE` and `AFW` are the African aggregates; the remaining five
/// only appear in the global benchmark set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum RegionCode {
    /// Sub-Saharan Africa
    SSA,
    /// Africa Eastern and Southern
    AFE,
    /// Africa Western and Central
    AFW,
    /// East Asia & Pacific
    EAP,
    /// Europe & Central Asia
    ECA,
    /// Latin America & Caribbean
    LCR,
    /// Middle East & North Africa
    MNA,
    /// South Asia
    SAR,
}

impl RegionCode {
    /// Every region code, in registry declaration order.
    pub const ALL: [RegionCode; 8] = [
        Self::SSA,
        Self::AFE,
        Self::AFW,
        Self::EAP,
        Self::ECA,
        Self::LCR,
        Self::MNA,
        Self::SAR,
    ];

    /// The code as it appears in source files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SSA => "SSA",
            Self::AFE => "AFE",
            Self::AFW => "AFW",
            Self::EAP => "EAP",
            Self::ECA => "ECA",
            Self::LCR => "LCR",
            Self::MNA => "MNA",
            Self::SAR => "SAR",
        }
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegionCode {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|code| code.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DashError::InvalidRequest(format!("Unknown region code: {}", s)))
    }
}

// =============================================================================
// REFERENCE DATA
// =============================================================================

/// A country known to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRecord {
    /// ISO3 country code.
    pub code: String,
    /// Region (or subregion) the country belongs to.
    pub region_code: RegionCode,
    /// Name shown in legends and titles.
    pub display_name: String,
}

impl CountryRecord {
    /// Create a new country record.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        region_code: RegionCode,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            region_code,
            display_name: display_name.into(),
        }
    }
}

/// Display metadata for one benchmark aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    pub code: String,
    pub display_name: String,
    /// Hex color, e.g. `#2e86c1`.
    pub color: String,
}

impl BenchmarkEntry {
    /// Create a new benchmark entry.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        display_name: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            display_name: display_name.into(),
            color: color.into(),
        }
    }
}

/// Option pair used to populate a selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkOption {
    pub code: String,
    pub display_name: String,
}

// =============================================================================
// SERIES REQUEST
// =============================================================================

/// A query for the series one chart should draw.
///
/// `regional_codes` and `global_codes` are mutually exclusive by convention
/// (the UI shows one benchmark mode at a time). When both are filled the
/// regional set wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesRequest {
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub regional_codes: BTreeSet<String>,
    #[serde(default)]
    pub global_codes: BTreeSet<String>,
    /// Comparison countries, drawn after the benchmarks in this order.
    #[serde(default)]
    pub peer_countries: Vec<String>,
}

/// Canonical form of a country or benchmark code: trimmed, upper case.
#[must_use]
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

impl SeriesRequest {
    /// Create an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request for a single selected country.
    #[must_use]
    pub fn for_country(code: impl Into<String>) -> Self {
        Self {
            country_code: Some(code.into()),
            ..Self::default()
        }
    }

    /// Add regional benchmark codes.
    #[must_use]
    pub fn with_regional<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regional_codes.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Add global benchmark codes.
    #[must_use]
    pub fn with_global<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.global_codes.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Add peer comparison countries.
    #[must_use]
    pub fn with_peers<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.peer_countries.extend(codes.into_iter().map(Into::into));
        self
    }

    /// Trim and upper-case every code, matching the registries and the
    /// country table. A blank country code becomes `None`.
    #[must_use]
    pub fn normalized(self) -> Self {
        let normalize = |codes: BTreeSet<String>| -> BTreeSet<String> {
            codes.iter().map(|c| normalize_code(c)).collect()
        };
        Self {
            country_code: self
                .country_code
                .as_deref()
                .map(normalize_code)
                .filter(|c| !c.is_empty()),
            regional_codes: normalize(self.regional_codes),
            global_codes: normalize(self.global_codes),
            peer_countries: self.peer_countries.iter().map(|c| normalize_code(c)).collect(),
        }
    }

    /// Check if the request names nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.country_code.as_deref().is_none_or(str::is_empty)
            && self.regional_codes.is_empty()
            && self.global_codes.is_empty()
            && self.peer_countries.is_empty()
    }

    /// Total number of codes named by the request.
    #[must_use]
    pub fn code_count(&self) -> usize {
        usize::from(self.country_code.is_some())
            + self.regional_codes.len()
            + self.global_codes.len()
            + self.peer_countries.len()
    }
}

// =============================================================================
// OBSERVATIONS & RESOLVED SERIES
// =============================================================================

/// One `(year, value)` point. A missing cell in the source is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub year: i32,
    pub value: Option<f64>,
}

impl Observation {
    #[must_use]
    pub const fn new(year: i32, value: Option<f64>) -> Self {
        Self { year, value }
    }
}

/// What role a series plays in the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    SelectedCountry,
    Benchmark,
    PeerCountry,
}

impl SeriesKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SelectedCountry => "selected_country",
            Self::Benchmark => "benchmark",
            Self::PeerCountry => "peer_country",
        }
    }
}

/// A series ready for rendering: metadata plus ordered rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSeries {
    pub code: String,
    pub display_name: String,
    pub color: String,
    pub kind: SeriesKind,
    /// Rows sorted by year.
    pub rows: Vec<Observation>,
}

impl ResolvedSeries {
    /// Number of rows in the series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the series has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Split into historical (`year <= base_year`) and projected
    /// (`year >= base_year`) halves.
    ///
    /// The base-year row belongs to both halves so a solid and a dashed
    /// line drawn from them meet without a gap.
    #[must_use]
    pub fn split_at(&self, base_year: i32) -> (Vec<Observation>, Vec<Observation>) {
        let historical = self
            .rows
            .iter()
            .filter(|o| o.year <= base_year)
            .copied()
            .collect();
        let projection = self
            .rows
            .iter()
            .filter(|o| o.year >= base_year)
            .copied()
            .collect();
        (historical, projection)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while loading or resolving data.
///
/// Unknown country or benchmark codes are not errors; the resolver drops
/// them silently.
#[derive(Debug, Error)]
pub enum DashError {
    /// The source has no backing data: either its file does not exist or
    /// the id is not configured at all (`path` is `None`).
    #[error("Data not found for source '{source_id}'{}", describe_path(path.as_deref()))]
    DataNotFound {
        source_id: String,
        path: Option<PathBuf>,
    },

    /// A valid query matched zero rows.
    #[error("No rows in source '{source_id}' match the requested codes")]
    EmptyResult { source_id: String },

    /// A required column is absent from the CSV header.
    #[error("Source '{source_id}' is missing column '{column}'")]
    MissingColumn { source_id: String, column: String },

    /// A data row could not be parsed.
    #[error("Source '{source_id}' line {line}: {reason}")]
    InvalidRow {
        source_id: String,
        line: u64,
        reason: String,
    },

    /// The source file exceeds the configured size limit.
    #[error("File {} is {size} bytes, maximum is {max} bytes", path.display())]
    FileTooLarge { path: PathBuf, size: u64, max: u64 },

    /// A CSV reader or writer error.
    #[error("CSV error: {0}")]
    Csv(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration could not be read or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request itself is malformed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

fn describe_path(path: Option<&Path>) -> String {
    match path {
        Some(path) => format!(": {}", path.display()),
        None => " (not configured)".to_string(),
    }
}

impl DashError {
    /// `DataNotFound` for a source id that is not configured.
    #[must_use]
    pub fn unknown_source(source_id: impl Into<String>) -> Self {
        Self::DataNotFound {
            source_id: source_id.into(),
            path: None,
        }
    }


    /// Whether the error means "valid query, nothing to show" rather than a failure.
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::EmptyResult { .. })
    }
}

impl From<csv::Error> for DashError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================
