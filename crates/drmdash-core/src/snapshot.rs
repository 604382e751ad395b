//! # Snapshot
//!
//! One-shot initialization of every configured table.
//!
//! A `Snapshot` is built once at process start and is immutable afterwards;
//! share it through `Arc` and read it without locking. New source files are
//! only picked up by restarting the process.
//!
//! A source whose file is absent does not stop the snapshot from loading.
//! It is recorded as unavailable and every `load` of it reports
//! `DataNotFound`, so only the charts that need it show an error.

use crate::countries::{CountrySource, CountryTable};
use crate::loader::{Loader, SourceCatalog, Table, read_table_file};
use crate::types::DashError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Row/code counts for one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub source_id: String,
    pub available: bool,
    pub rows: usize,
    pub codes: usize,
}

/// Counts describing a loaded snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub countries: usize,
    pub sources: Vec<SourceSummary>,
}

/// Immutable in-memory copy of the country table and all sources.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    countries: CountryTable,
    tables: BTreeMap<String, Table>,
    missing: BTreeMap<String, PathBuf>,
}

impl Snapshot {
    /// Build a snapshot from already-loaded tables.
    pub fn new(countries: CountryTable, tables: impl IntoIterator<Item = Table>) -> Self {
        Self {
            countries,
            tables: tables
                .into_iter()
                .map(|t| (t.source_id().to_string(), t))
                .collect(),
            missing: BTreeMap::new(),
        }
    }

    /// Load the country table and every source in `catalog`.
    ///
    /// # Errors
    /// - The country table is missing or malformed
    /// - Any present source file is malformed or too large
    pub fn load(catalog: &SourceCatalog, country_source: &CountrySource) -> Result<Self, DashError> {
        let countries_path = catalog.resolve_path(&country_source.path);
        let countries = CountryTable::load(country_source, &countries_path, catalog.max_file_size())?;

        let mut tables = BTreeMap::new();
        let mut missing = BTreeMap::new();

        for (source_id, spec) in catalog.iter() {
            let path = catalog.resolve_path(&spec.path);
            match read_table_file(source_id, spec, &path, catalog.max_file_size()) {
                Ok(table) => {
                    tables.insert(source_id.to_string(), table);
                }
                Err(DashError::DataNotFound {
                    path: Some(path), ..
                }) => {
                    missing.insert(source_id.to_string(), path);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Self {
            countries,
            tables,
            missing,
        })
    }

    #[must_use]
    pub fn countries(&self) -> &CountryTable {
        &self.countries
    }

    #[must_use]
    pub fn table(&self, source_id: &str) -> Option<&Table> {
        self.tables.get(source_id)
    }

    /// Whether the source is configured (present or not).
    #[must_use]
    pub fn knows_source(&self, source_id: &str) -> bool {
        self.tables.contains_key(source_id) || self.missing.contains_key(source_id)
    }

    /// Configured sources whose files were absent at load time.
    pub fn missing_sources(&self) -> impl Iterator<Item = &str> {
        self.missing.keys().map(String::as_str)
    }

    /// Row and code counts for every configured source, sorted by id.
    #[must_use]
    pub fn summary(&self) -> SnapshotSummary {
        let mut sources: Vec<SourceSummary> = self
            .tables
            .values()
            .map(|t| SourceSummary {
                source_id: t.source_id().to_string(),
                available: true,
                rows: t.len(),
                codes: t.code_count(),
            })
            .chain(self.missing.keys().map(|id| SourceSummary {
                source_id: id.clone(),
                available: false,
                rows: 0,
                codes: 0,
            }))
            .collect();
        sources.sort_by(|a, b| a.source_id.cmp(&b.source_id));

        SnapshotSummary {
            countries: self.countries.len(),
            sources,
        }
    }
}

impl Loader for Snapshot {
    fn load(
        &self,
        source_id: &str,
        filter_codes: Option<&BTreeSet<String>>,
    ) -> Result<Table, DashError> {
        if let Some(table) = self.tables.get(source_id) {
            return table.select(filter_codes);
        }
        Err(DashError::DataNotFound {
            source_id: source_id.to_string(),
            path: self.missing.get(source_id).cloned(),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
