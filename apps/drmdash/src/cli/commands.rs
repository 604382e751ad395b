//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::SelectionArgs;
use crate::api::{self, AppState};
use crate::config::DashboardConfig;
use drmdash_core::{
    BenchmarkRegistry, BenchmarkScope, ChartOutcome, CitySize, DashError, Loader, RegionCode,
    Snapshot, export_csv, export_table_csv, resolve,
};
use std::path::{Path, PathBuf};

// =============================================================================
// HELPERS
// =============================================================================

/// Load the config and the snapshot it describes.
fn load_snapshot(config_path: Option<&Path>) -> Result<(DashboardConfig, Snapshot), DashError> {
    let config = DashboardConfig::load(config_path)?;
    let snapshot = Snapshot::load(&config.catalog(), &config.countries)?;

    for missing in snapshot.missing_sources() {
        tracing::warn!(source = missing, "Source file not found; charts using it will show an error");
    }
    Ok((config, snapshot))
}

/// Print a value as pretty JSON.
fn print_json<T: serde::Serialize>(value: &T) -> Result<(), DashError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| DashError::Io(format!("JSON serialization failed: {}", e)))?;
    println!("{}", json);
    Ok(())
}

/// Validate an output path: the parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, DashError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        DashError::Io(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(DashError::Io(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| DashError::Io("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(
    config_path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), DashError> {
    let (mut config, snapshot) = load_snapshot(config_path)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let summary = snapshot.summary();

    println!("drmdash Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:      {}", config.server.host);
    println!("  Port:      {}", config.server.port);
    println!("  Data dir:  {}", config.data_dir.display());
    println!("  Base year: {}", config.base_year);
    println!("  Countries: {}", summary.countries);
    println!("  Sources:   {}", summary.sources.len());
    println!();
    println!("Endpoints:");
    println!("  GET  /health              - Health check");
    println!("  GET  /status              - Snapshot summary");
    println!("  GET  /countries           - Country options");
    println!("  GET  /benchmarks/{{scope}}  - Benchmark options");
    println!("  POST /series              - Resolve chart series");
    println!("  POST /export              - Download series as CSV");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let state = AppState::new(snapshot, config.base_year);
    api::run_server(state, &config.server).await
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show loaded countries and sources.
pub fn cmd_status(config_path: Option<&Path>, json_mode: bool) -> Result<(), DashError> {
    let (config, snapshot) = load_snapshot(config_path)?;
    let summary = snapshot.summary();

    if json_mode {
        let output = serde_json::json!({
            "data_dir": config.data_dir.to_string_lossy(),
            "base_year": config.base_year,
            "countries": summary.countries,
            "sources": summary.sources,
        });
        print_json(&output)?;
        return Ok(());
    }

    println!("drmdash Status");
    println!("==============");
    println!("Data dir:  {}", config.data_dir.display());
    println!("Base year: {}", config.base_year);
    println!("Countries: {}", summary.countries);
    println!();
    println!("Sources:");
    if summary.sources.is_empty() {
        println!("  (none configured)");
    }
    for source in &summary.sources {
        if source.available {
            println!(
                "  {:<28} {:>8} rows  {:>4} codes",
                source.source_id, source.rows, source.codes
            );
        } else {
            println!("  {:<28} missing", source.source_id);
        }
    }

    Ok(())
}

// =============================================================================
// RESOLVE COMMAND
// =============================================================================

/// Resolve the series for one chart and print them.
pub fn cmd_resolve(
    config_path: Option<&Path>,
    json_mode: bool,
    selection: &SelectionArgs,
) -> Result<(), DashError> {
    let (config, snapshot) = load_snapshot(config_path)?;
    let request = selection.to_request();
    let result = resolve(&selection.source, &request, snapshot.countries(), &snapshot);
    let outcome = ChartOutcome::from_result(&request, result);

    if json_mode {
        let response = api::ChartResponse::from_outcome(&selection.source, config.base_year, &outcome);
        print_json(&response)?;
        return Ok(());
    }

    match &outcome {
        ChartOutcome::Placeholder { kind, message } => {
            println!("[{:?}] {}", kind, message);
        }
        ChartOutcome::Series { series } => {
            println!("Source: {} (base year {})", selection.source, config.base_year);
            for s in series {
                let (historical, projection) = s.split_at(config.base_year);
                let span = match (s.rows.first(), s.rows.last()) {
                    (Some(first), Some(last)) => format!("{}-{}", first.year, last.year),
                    _ => "-".to_string(),
                };
                println!(
                    "  {:<4} {:<32} {} {:<16} {:>3} rows ({} historical, {} projected)  {}",
                    s.code,
                    s.display_name,
                    s.color,
                    s.kind.as_str(),
                    s.len(),
                    historical.len(),
                    projection.len(),
                    span
                );
            }
        }
    }

    Ok(())
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Write resolved series, or the whole source table, as CSV.
pub fn cmd_export(
    config_path: Option<&Path>,
    selection: &SelectionArgs,
    output: Option<&Path>,
    table: bool,
) -> Result<(), DashError> {
    let (_, snapshot) = load_snapshot(config_path)?;

    let data = if table {
        let table = snapshot.load(&selection.source, None)?;
        export_table_csv(&table)?
    } else {
        let request = selection.to_request();
        let series = resolve(&selection.source, &request, snapshot.countries(), &snapshot)?;
        if series.is_empty() {
            return Err(DashError::EmptyResult {
                source_id: selection.source.clone(),
            });
        }
        export_csv(&series)?
    };

    match output {
        Some(path) => {
            let validated = validate_output_path(path)?;
            std::fs::write(&validated, &data)
                .map_err(|e| DashError::Io(format!("Write {}: {}", validated.display(), e)))?;
            println!("Exported {} bytes to {}", data.len(), validated.display());
        }
        None => {
            print!("{}", String::from_utf8_lossy(&data));
        }
    }

    Ok(())
}

// =============================================================================
// REFERENCE DATA COMMANDS
// =============================================================================

/// List benchmark options for a scope.
pub fn cmd_benchmarks(json_mode: bool, scope: &str) -> Result<(), DashError> {
    let scope: BenchmarkScope = scope.parse()?;
    let registry = BenchmarkRegistry::for_scope(scope);

    if json_mode {
        print_json(&registry.entries())?;
        return Ok(());
    }

    println!("{} benchmarks", scope);
    for entry in registry.entries() {
        println!("  {:<4} {} {}", entry.code, entry.color, entry.display_name);
    }
    Ok(())
}

/// List known countries, optionally for one region.
pub fn cmd_countries(
    config_path: Option<&Path>,
    json_mode: bool,
    region: Option<&str>,
) -> Result<(), DashError> {
    let (_, snapshot) = load_snapshot(config_path)?;
    let countries = snapshot.countries();

    let records = match region {
        Some(region) => countries.in_region(region.parse::<RegionCode>()?),
        None => countries.iter().collect(),
    };

    if json_mode {
        print_json(&records)?;
        return Ok(());
    }

    for record in &records {
        println!(
            "  {:<4} {:<4} {}",
            record.code, record.region_code, record.display_name
        );
    }
    println!("{} countries", records.len());
    Ok(())
}

/// Classify a city population.
pub fn cmd_classify(json_mode: bool, population: f64, thousands: bool) -> Result<(), DashError> {
    let size = if thousands {
        CitySize::from_thousands(population)
    } else {
        CitySize::from_population(Some(population))
    };

    if json_mode {
        let output = serde_json::json!({
            "population": population,
            "thousands": thousands,
            "size_class": size,
            "label": size.label(),
        });
        print_json(&output)?;
        return Ok(());
    }

    println!("{}", size);
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
