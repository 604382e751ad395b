//! # Data Loader
//!
//! Reads CSV sources into normalized `(code, year, value)` tables.
//!
//! - Column names are part of a source's contract (`SourceSpec`)
//! - A missing file is `DataNotFound`, never a panic
//! - A filter that matches nothing is `EmptyResult`
//! - Empty and `NaN` value cells are kept as gaps
//! - Each `(code, year)` appears at most once; a repeat is `InvalidRow`
//! - Long-format files select one indicator with `IndicatorFilter`

use crate::primitives::MAX_SOURCE_FILE_SIZE;
use crate::types::{DashError, Observation};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

fn default_code_column() -> String {
    "ISO3".to_string()
}

fn default_year_column() -> String {
    "Year".to_string()
}

fn default_indicator_column() -> String {
    "indicator".to_string()
}

// =============================================================================
// SOURCE DECLARATION
// =============================================================================

/// Row selector for long-format files that stack several indicators
/// (`ISO3, indicator, year, value`). Only rows whose `column` equals
/// `value` are loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorFilter {
    #[serde(default = "default_indicator_column")]
    pub column: String,
    pub value: String,
}

/// Where a source lives and which columns hold its code, year and value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// CSV path; relative paths are resolved against the catalog data dir.
    pub path: PathBuf,
    #[serde(default = "default_code_column")]
    pub code_column: String,
    #[serde(default = "default_year_column")]
    pub year_column: String,
    pub value_column: String,
    /// Multiplier applied to every value (e.g. 100 for rate → percent).
    #[serde(default)]
    pub scale: Option<f64>,
    /// Indicator to keep from a long-format file.
    #[serde(default)]
    pub indicator: Option<IndicatorFilter>,
}

impl SourceSpec {
    /// Declare a source with the default `ISO3` / `Year` columns.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, value_column: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code_column: default_code_column(),
            year_column: default_year_column(),
            value_column: value_column.into(),
            scale: None,
            indicator: None,
        }
    }

    #[must_use]
    pub fn with_columns(mut self, code: impl Into<String>, year: impl Into<String>) -> Self {
        self.code_column = code.into();
        self.year_column = year.into();
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Keep only rows where `column` equals `value`.
    #[must_use]
    pub fn with_indicator(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.indicator = Some(IndicatorFilter {
            column: column.into(),
            value: value.into(),
        });
        self
    }
}

// =============================================================================
// TABLE
// =============================================================================

/// An in-memory source table, rows grouped by code and ordered by year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    source_id: String,
    rows: BTreeMap<String, Vec<Observation>>,
}

impl Table {
    /// Create an empty table for a source.
    #[must_use]
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            rows: BTreeMap::new(),
        }
    }

    /// Add a row. Rows for a code stay ordered by year; a row for a year
    /// already present replaces it.
    pub fn push(&mut self, code: impl Into<String>, observation: Observation) {
        let rows = self.rows.entry(code.into()).or_default();
        match rows.binary_search_by_key(&observation.year, |o| o.year) {
            Ok(at) => rows[at] = observation,
            Err(at) => rows.insert(at, observation),
        }
    }

    /// Whether a row for `(code, year)` exists.
    #[must_use]
    pub fn contains_year(&self, code: &str, year: i32) -> bool {
        self.rows
            .get(code)
            .is_some_and(|rows| rows.binary_search_by_key(&year, |o| o.year).is_ok())
    }

    #[must_use]
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Total number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct codes.
    #[must_use]
    pub fn code_count(&self) -> usize {
        self.rows.len()
    }

    /// Codes in sorted order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.rows.contains_key(code)
    }

    /// Rows for one code, ordered by year.
    #[must_use]
    pub fn rows_for(&self, code: &str) -> Option<&[Observation]> {
        self.rows.get(code).map(Vec::as_slice)
    }

    /// All rows as `(code, observation)`, ordered by `(code, year)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Observation)> {
        self.rows
            .iter()
            .flat_map(|(code, rows)| rows.iter().map(move |o| (code.as_str(), o)))
    }

    /// Restrict the table to `codes`.
    ///
    /// Returns `EmptyResult` when none of the codes has rows.
    pub fn filter(&self, codes: &BTreeSet<String>) -> Result<Table, DashError> {
        let rows: BTreeMap<String, Vec<Observation>> = self
            .rows
            .iter()
            .filter(|(code, _)| codes.contains(*code))
            .map(|(code, rows)| (code.clone(), rows.clone()))
            .collect();

        if rows.is_empty() {
            return Err(DashError::EmptyResult {
                source_id: self.source_id.clone(),
            });
        }

        Ok(Table {
            source_id: self.source_id.clone(),
            rows,
        })
    }

    /// Restrict to `codes` when a filter is given; otherwise clone.
    pub fn select(&self, filter_codes: Option<&BTreeSet<String>>) -> Result<Table, DashError> {
        match filter_codes {
            Some(codes) => self.filter(codes),
            None => Ok(self.clone()),
        }
    }
}

// =============================================================================
// CSV PARSING
// =============================================================================

/// Locate a header column or fail with `MissingColumn`.
pub(crate) fn column_index(
    headers: &csv::StringRecord,
    source_id: &str,
    column: &str,
) -> Result<usize, DashError> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| DashError::MissingColumn {
            source_id: source_id.to_string(),
            column: column.to_string(),
        })
}

/// Parse a year cell. Accepts `2020` and float renderings such as `2020.0`.
fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if let Ok(year) = raw.parse::<i32>() {
        return Some(year);
    }
    let float = raw.parse::<f64>().ok()?;
    if float.fract() == 0.0 && float >= f64::from(i32::MIN) && float <= f64::from(i32::MAX) {
        Some(float as i32)
    } else {
        None
    }
}

/// Parse a value cell. Empty, `NaN` and `NA` are gaps.
fn parse_value(raw: &str) -> Result<Option<f64>, String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") || raw.eq_ignore_ascii_case("na") {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(|v| if v.is_nan() { None } else { Some(v) })
        .map_err(|_| format!("invalid value '{}'", raw))
}

/// Read a source table from any CSV reader.
pub fn read_table<R: Read>(source_id: &str, spec: &SourceSpec, reader: R) -> Result<Table, DashError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let code_idx = column_index(&headers, source_id, &spec.code_column)?;
    let year_idx = column_index(&headers, source_id, &spec.year_column)?;
    let value_idx = column_index(&headers, source_id, &spec.value_column)?;
    let indicator = spec
        .indicator
        .as_ref()
        .map(|f| column_index(&headers, source_id, &f.column).map(|idx| (idx, f.value.as_str())))
        .transpose()?;

    let mut table = Table::new(source_id);

    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map_or(0, csv::Position::line);
        let invalid = |reason: String| DashError::InvalidRow {
            source_id: source_id.to_string(),
            line,
            reason,
        };

        if let Some((idx, wanted)) = indicator {
            if record.get(idx).map(str::trim) != Some(wanted) {
                continue;
            }
        }

        let code = record.get(code_idx).map(str::trim).unwrap_or_default();
        if code.is_empty() {
            return Err(invalid("empty code".to_string()));
        }

        let raw_year = record.get(year_idx).unwrap_or_default();
        let year = parse_year(raw_year).ok_or_else(|| invalid(format!("invalid year '{}'", raw_year)))?;
        if table.contains_year(code, year) {
            return Err(invalid(format!("duplicate (code, year) ({}, {})", code, year)));
        }

        let value = parse_value(record.get(value_idx).unwrap_or_default()).map_err(invalid)?;
        let value = match (value, spec.scale) {
            (Some(v), Some(scale)) => Some(v * scale),
            (v, _) => v,
        };

        table.push(code, Observation::new(year, value));
    }

    Ok(table)
}

/// Check a file exists and is within the size limit.
pub(crate) fn check_source_file(
    source_id: &str,
    path: &Path,
    max_size: u64,
) -> Result<(), DashError> {
    if !path.is_file() {
        return Err(DashError::DataNotFound {
            source_id: source_id.to_string(),
            path: Some(path.to_path_buf()),
        });
    }

    let size = std::fs::metadata(path)
        .map_err(|e| DashError::Io(format!("Cannot read metadata of {}: {}", path.display(), e)))?
        .len();
    if size > max_size {
        return Err(DashError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max: max_size,
        });
    }
    Ok(())
}

/// Read a source table from a file on disk.
pub fn read_table_file(
    source_id: &str,
    spec: &SourceSpec,
    path: &Path,
    max_size: u64,
) -> Result<Table, DashError> {
    check_source_file(source_id, path, max_size)?;
    let file = File::open(path)
        .map_err(|e| DashError::Io(format!("Open {}: {}", path.display(), e)))?;
    read_table(source_id, spec, file)
}

// =============================================================================
// CATALOG
// =============================================================================

/// The set of configured sources and where to find them.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceCatalog {
    data_dir: PathBuf,
    sources: BTreeMap<String, SourceSpec>,
    max_file_size: u64,
}

impl SourceCatalog {
    /// Create an empty catalog rooted at `data_dir`.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            sources: BTreeMap::new(),
            max_file_size: MAX_SOURCE_FILE_SIZE,
        }
    }

    /// Register a source. A later registration with the same id replaces
    /// the earlier one.
    #[must_use]
    pub fn with_source(mut self, source_id: impl Into<String>, spec: SourceSpec) -> Self {
        self.sources.insert(source_id.into(), spec);
        self
    }

    #[must_use]
    pub fn with_max_file_size(mut self, max: u64) -> Self {
        self.max_file_size = max;
        self
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    #[must_use]
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    #[must_use]
    pub fn get(&self, source_id: &str) -> Option<&SourceSpec> {
        self.sources.get(source_id)
    }

    /// Source ids in sorted order.
    pub fn source_ids(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SourceSpec)> {
        self.sources.iter().map(|(id, spec)| (id.as_str(), spec))
    }

    /// Resolve a path against the data directory.
    #[must_use]
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }
}

// =============================================================================
// LOADER TRAIT
// =============================================================================

/// Anything that can produce a (filtered) source table.
pub trait Loader {
    /// Load `source_id`, restricted to `filter_codes` when given.
    ///
    /// - `DataNotFound` if the id is not configured or its backing file is absent
    /// - `EmptyResult` if the filter matches no rows
    fn load(&self, source_id: &str, filter_codes: Option<&BTreeSet<String>>)
    -> Result<Table, DashError>;
}

/// Loader that reads from disk on every call.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    catalog: SourceCatalog,
}

impl CsvLoader {
    #[must_use]
    pub fn new(catalog: SourceCatalog) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub fn catalog(&self) -> &SourceCatalog {
        &self.catalog
    }
}

impl Loader for CsvLoader {
    fn load(
        &self,
        source_id: &str,
        filter_codes: Option<&BTreeSet<String>>,
    ) -> Result<Table, DashError> {
        let spec = self
            .catalog
            .get(source_id)
            .ok_or_else(|| DashError::unknown_source(source_id))?;
        let path = self.catalog.resolve_path(&spec.path);
        let table = read_table_file(source_id, spec, &path, self.catalog.max_file_size())?;
        match filter_codes {
            Some(codes) => table.filter(codes),
            None => Ok(table),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
