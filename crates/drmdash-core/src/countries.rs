//! # Country/Region Table
//!
//! Immutable ISO3 → (region, display name) reference data.
//! Loaded once at startup from a CSV and only read afterwards.

use crate::loader::{check_source_file, column_index};
use crate::types::{BenchmarkOption, CountryRecord, DashError, RegionCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

const COUNTRY_SOURCE_ID: &str = "countries";

fn default_code_column() -> String {
    "ISO3".to_string()
}

fn default_name_column() -> String {
    "Country".to_string()
}

fn default_region_column() -> String {
    "Region".to_string()
}

/// Location and column layout of the country table CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountrySource {
    pub path: PathBuf,
    #[serde(default = "default_code_column")]
    pub code_column: String,
    #[serde(default = "default_name_column")]
    pub name_column: String,
    #[serde(default = "default_region_column")]
    pub region_column: String,
}

impl CountrySource {
    /// Source with the default `ISO3` / `Country` / `Region` columns.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            code_column: default_code_column(),
            name_column: default_name_column(),
            region_column: default_region_column(),
        }
    }
}

/// The country reference table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryTable {
    records: BTreeMap<String, CountryRecord>,
}

impl CountryTable {
    /// Build a table from records. Later duplicates replace earlier ones.
    pub fn new(records: impl IntoIterator<Item = CountryRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|r| (r.code.clone(), r))
                .collect(),
        }
    }

    /// Parse the table from CSV.
    ///
    /// A duplicate code or an unknown region code is an `InvalidRow`.
    pub fn from_reader<R: Read>(source: &CountrySource, reader: R) -> Result<Self, DashError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers = csv_reader.headers()?.clone();

        let code_idx = column_index(&headers, COUNTRY_SOURCE_ID, &source.code_column)?;
        let name_idx = column_index(&headers, COUNTRY_SOURCE_ID, &source.name_column)?;
        let region_idx = column_index(&headers, COUNTRY_SOURCE_ID, &source.region_column)?;

        let mut records = BTreeMap::new();
        for result in csv_reader.records() {
            let record = result?;
            let line = record.position().map_or(0, csv::Position::line);
            let invalid = |reason: String| DashError::InvalidRow {
                source_id: COUNTRY_SOURCE_ID.to_string(),
                line,
                reason,
            };

            let code = record.get(code_idx).map(str::trim).unwrap_or_default();
            if code.is_empty() {
                return Err(invalid("empty code".to_string()));
            }
            let name = record.get(name_idx).map(str::trim).unwrap_or_default();
            let raw_region = record.get(region_idx).unwrap_or_default();
            let region: RegionCode = raw_region
                .parse()
                .map_err(|_| invalid(format!("unknown region '{}'", raw_region.trim())))?;

            // An empty name falls back to the code.
            let display_name = if name.is_empty() { code } else { name };
            let previous = records.insert(
                code.to_string(),
                CountryRecord::new(code, region, display_name),
            );
            if previous.is_some() {
                return Err(invalid(format!("duplicate country code '{}'", code)));
            }
        }

        Ok(Self { records })
    }

    /// Load the table from a file.
    pub fn load(source: &CountrySource, path: &Path, max_size: u64) -> Result<Self, DashError> {
        check_source_file(COUNTRY_SOURCE_ID, path, max_size)?;
        let file = File::open(path)
            .map_err(|e| DashError::Io(format!("Open {}: {}", path.display(), e)))?;
        Self::from_reader(source, file)
    }

    #[must_use]
    pub fn get(&self, code: &str) -> Option<&CountryRecord> {
        self.records.get(code)
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.records.contains_key(code)
    }

    #[must_use]
    pub fn display_name(&self, code: &str) -> Option<&str> {
        self.get(code).map(|r| r.display_name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records ordered by code.
    pub fn iter(&self) -> impl Iterator<Item = &CountryRecord> {
        self.records.values()
    }

    /// Countries of one region, ordered by code.
    #[must_use]
    pub fn in_region(&self, region: RegionCode) -> Vec<&CountryRecord> {
        self.iter().filter(|r| r.region_code == region).collect()
    }

    /// Selector options ordered by display name.
    #[must_use]
    pub fn options(&self) -> Vec<BenchmarkOption> {
        let mut sorted: Vec<&CountryRecord> = self.iter().collect();
        sorted.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        sorted
            .into_iter()
            .map(|r| BenchmarkOption {
                code: r.code.clone(),
                display_name: r.display_name.clone(),
            })
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
