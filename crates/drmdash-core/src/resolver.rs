//! # Benchmark Resolver
//!
//! Turns a `SeriesRequest` into the ordered list of series a chart draws.
//!
//! Output order is fixed:
//! 1. the selected country
//! 2. benchmarks, in registry declaration order
//! 3. peer countries, in request order
//!
//! Codes that are unknown to the country table or the registry, or that have
//! no rows in the source, are skipped without error.

use crate::countries::CountryTable;
use crate::loader::{Loader, Table};
use crate::primitives::{
    FALLBACK_COLOR, MAX_CODE_LENGTH, MAX_REQUEST_CODES, SELECTED_COUNTRY_COLOR, peer_color,
};
use crate::registry::BenchmarkRegistry;
use crate::types::{BenchmarkEntry, DashError, ResolvedSeries, SeriesKind, SeriesRequest};
use std::collections::BTreeSet;

/// Reject requests that name too many codes or absurdly long ones.
pub fn validate_request(request: &SeriesRequest) -> Result<(), DashError> {
    if request.code_count() > MAX_REQUEST_CODES {
        return Err(DashError::InvalidRequest(format!(
            "Request names {} codes, maximum is {}",
            request.code_count(),
            MAX_REQUEST_CODES
        )));
    }

    let all_codes = request
        .country_code
        .iter()
        .chain(&request.regional_codes)
        .chain(&request.global_codes)
        .chain(&request.peer_countries);
    for code in all_codes {
        if code.len() > MAX_CODE_LENGTH {
            return Err(DashError::InvalidRequest(format!(
                "Code length {} exceeds maximum {}",
                code.len(),
                MAX_CODE_LENGTH
            )));
        }
    }
    Ok(())
}

/// Resolves requests against a country table, the two benchmark registries
/// and a loader.
pub struct Resolver<'a, L: Loader + ?Sized> {
    countries: &'a CountryTable,
    loader: &'a L,
    regional: BenchmarkRegistry,
    global: BenchmarkRegistry,
}

impl<'a, L: Loader + ?Sized> Resolver<'a, L> {
    /// Create a resolver using the built-in registries.
    #[must_use]
    pub fn new(countries: &'a CountryTable, loader: &'a L) -> Self {
        Self {
            countries,
            loader,
            regional: BenchmarkRegistry::regional(),
            global: BenchmarkRegistry::global(),
        }
    }

    #[must_use]
    pub fn regional(&self) -> &BenchmarkRegistry {
        &self.regional
    }

    #[must_use]
    pub fn global(&self) -> &BenchmarkRegistry {
        &self.global
    }

    /// Resolve `request` against `source_id`.
    ///
    /// # Errors
    /// - `InvalidRequest` if the request exceeds the code limits
    /// - `DataNotFound` from the loader
    ///
    /// A request whose codes all miss the data returns `Ok(vec![])`.
    pub fn resolve(
        &self,
        source_id: &str,
        request: &SeriesRequest,
    ) -> Result<Vec<ResolvedSeries>, DashError> {
        validate_request(request)?;

        let selected = request
            .country_code
            .as_deref()
            .map(str::trim)
            .filter(|c| self.countries.contains(c));
        let benchmarks = self.benchmark_entries(request);
        let peers = self.peer_codes(request, selected);

        let wanted: BTreeSet<String> = selected
            .into_iter()
            .chain(benchmarks.iter().map(|e| e.code.as_str()))
            .chain(peers.iter().map(|(_, code)| *code))
            .map(str::to_string)
            .collect();
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        let table = match self.loader.load(source_id, Some(&wanted)) {
            Ok(table) => table,
            Err(e) if e.is_no_data() => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut resolved = Vec::with_capacity(wanted.len());

        if let Some(code) = selected {
            let name = self.countries.display_name(code).unwrap_or(code);
            push_series(
                &mut resolved,
                &table,
                code,
                name,
                SELECTED_COUNTRY_COLOR,
                SeriesKind::SelectedCountry,
            );
        }

        for entry in &benchmarks {
            let color = if entry.color.is_empty() {
                FALLBACK_COLOR
            } else {
                entry.color.as_str()
            };
            push_series(
                &mut resolved,
                &table,
                &entry.code,
                &entry.display_name,
                color,
                SeriesKind::Benchmark,
            );
        }

        for (position, code) in &peers {
            let name = self.countries.display_name(code).unwrap_or(code);
            push_series(
                &mut resolved,
                &table,
                code,
                name,
                peer_color(*position),
                SeriesKind::PeerCountry,
            );
        }

        Ok(resolved)
    }

    /// Benchmark entries for the request. Regional codes take precedence
    /// over global ones when both are present.
    fn benchmark_entries(&self, request: &SeriesRequest) -> Vec<&BenchmarkEntry> {
        if !request.regional_codes.is_empty() {
            self.regional.select(&request.regional_codes)
        } else if !request.global_codes.is_empty() {
            self.global.select(&request.global_codes)
        } else {
            Vec::new()
        }
    }

    /// Known peer countries in request order, without duplicates or the
    /// selected country, each paired with its position in the request.
    ///
    /// The position picks the palette color, so a peer keeps its color
    /// when an earlier entry is dropped.
    fn peer_codes<'r>(
        &self,
        request: &'r SeriesRequest,
        selected: Option<&str>,
    ) -> Vec<(usize, &'r str)> {
        let mut seen = BTreeSet::new();
        request
            .peer_countries
            .iter()
            .map(|c| c.trim())
            .enumerate()
            .filter(|(_, c)| Some(*c) != selected)
            .filter(|(_, c)| self.countries.contains(c))
            .filter(|(_, c)| seen.insert(*c))
            .collect()
    }
}

fn push_series(
    out: &mut Vec<ResolvedSeries>,
    table: &Table,
    code: &str,
    name: &str,
    color: &str,
    kind: SeriesKind,
) {
    if let Some(rows) = table.rows_for(code) {
        out.push(ResolvedSeries {
            code: code.to_string(),
            display_name: name.to_string(),
            color: color.to_string(),
            kind,
            rows: rows.to_vec(),
        });
    }
}

/// Resolve with a fresh [`Resolver`].
pub fn resolve<L: Loader + ?Sized>(
    source_id: &str,
    request: &SeriesRequest,
    countries: &CountryTable,
    loader: &L,
) -> Result<Vec<ResolvedSeries>, DashError> {
    Resolver::new(countries, loader).resolve(source_id, request)
}

// =============================================================================
// TESTS
// =============================================================================
