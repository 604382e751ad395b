//! # CSV Export
//!
//! Flattens resolved series (or a whole source table) into CSV bytes for
//! user download.

use crate::loader::Table;
use crate::types::{DashError, Observation, ResolvedSeries};

/// Header written by [`export_csv`].
pub const SERIES_HEADER: [&str; 5] = ["code", "name", "kind", "year", "value"];

/// Header written by [`export_table_csv`].
pub const TABLE_HEADER: [&str; 3] = ["code", "year", "value"];

fn value_cell(o: &Observation) -> String {
    o.value.map(|v| v.to_string()).unwrap_or_default()
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, DashError> {
    writer
        .into_inner()
        .map_err(|e| DashError::Io(format!("Flush CSV: {}", e)))
}

/// One line per observation, series in resolved order. Gaps are empty cells.
pub fn export_csv(series: &[ResolvedSeries]) -> Result<Vec<u8>, DashError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(SERIES_HEADER)?;

    for s in series {
        for o in &s.rows {
            let year = o.year.to_string();
            let value = value_cell(o);
            writer.write_record([
                s.code.as_str(),
                s.display_name.as_str(),
                s.kind.as_str(),
                year.as_str(),
                value.as_str(),
            ])?;
        }
    }

    finish(writer)
}

/// The full table, ordered by `(code, year)`.
pub fn export_table_csv(table: &Table) -> Result<Vec<u8>, DashError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(TABLE_HEADER)?;

    for (code, o) in table.iter() {
        let year = o.year.to_string();
        let value = value_cell(o);
        writer.write_record([code, year.as_str(), value.as_str()])?;
    }

    finish(writer)
}

/// Suggested download file name, e.g. `wup_KEN.csv`.
#[must_use]
pub fn export_file_name(source_id: &str, series: &[ResolvedSeries]) -> String {
    let sanitize = |s: &str| -> String {
        s.chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect()
    };
    match series.first() {
        Some(first) => format!("{}_{}.csv", sanitize(source_id), sanitize(&first.code)),
        None => format!("{}.csv", sanitize(source_id)),
    }
}

// =============================================================================
// TESTS
// =============================================================================
