//! # drmdash CLI Module
//!
//! This module implements the CLI interface for drmdash.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `status` - Show loaded countries and sources
//! - `resolve` - Resolve the series for one chart
//! - `export` - Write resolved series (or a whole source) as CSV
//! - `benchmarks` - List benchmark options for a scope
//! - `countries` - List known countries
//! - `classify` - Classify a city population into a size band

mod commands;

use clap::{Args, Parser, Subcommand};
use drmdash_core::{DashError, SeriesRequest};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// drmdash - regional benchmark comparison service
///
/// Resolves country and benchmark series from CSV sources for
/// urbanization and disaster-risk charts.
#[derive(Parser, Debug)]
#[command(name = "drmdash")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to drmdash.toml (defaults to DRMDASH_CONFIG, then ./drmdash.toml)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// What to draw: a country, benchmarks and peers.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Configured source id
    #[arg(short, long)]
    pub source: String,

    /// Selected country (ISO3)
    #[arg(short = 'C', long)]
    pub country: Option<String>,

    /// Regional benchmark codes (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub regional: Vec<String>,

    /// Global benchmark codes (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub global: Vec<String>,

    /// Peer comparison countries (comma-separated, in draw order)
    #[arg(short, long, value_delimiter = ',')]
    pub peers: Vec<String>,
}

impl SelectionArgs {
    /// The core request for this selection.
    #[must_use]
    pub fn to_request(&self) -> SeriesRequest {
        let request = SeriesRequest::new()
            .with_regional(self.regional.iter().cloned())
            .with_global(self.global.iter().cloned())
            .with_peers(self.peers.iter().cloned());
        SeriesRequest {
            country_code: self.country.clone(),
            ..request
        }
        .normalized()
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides config)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show loaded countries and sources
    Status,

    /// Resolve the series for one chart
    Resolve {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Export resolved series as CSV
    Export {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export the whole source table instead of a selection
        #[arg(long)]
        table: bool,
    },

    /// List benchmark options
    Benchmarks {
        /// Benchmark scope (regional, global)
        #[arg(default_value = "regional")]
        scope: String,
    },

    /// List known countries
    Countries {
        /// Only countries of this region (e.g. AFW)
        #[arg(short, long)]
        region: Option<String>,
    },

    /// Classify a city population into a size band
    Classify {
        /// Population (head count)
        population: f64,

        /// Population is given in thousands
        #[arg(long)]
        thousands: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), DashError> {
    let config_path = cli.config.as_deref();
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(config_path, host, port).await,
        Some(Commands::Status) => cmd_status(config_path, json_mode),
        Some(Commands::Resolve { selection }) => cmd_resolve(config_path, json_mode, &selection),
        Some(Commands::Export {
            selection,
            output,
            table,
        }) => cmd_export(config_path, &selection, output.as_deref(), table),
        Some(Commands::Benchmarks { scope }) => cmd_benchmarks(json_mode, &scope),
        Some(Commands::Countries { region }) => {
            cmd_countries(config_path, json_mode, region.as_deref())
        }
        Some(Commands::Classify {
            population,
            thousands,
        }) => cmd_classify(json_mode, population, thousands),
        None => {
            // No subcommand - show status by default
            cmd_status(config_path, json_mode)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_resolve_selection() {
        let cli = Cli::try_parse_from([
            "drmdash",
            "resolve",
            "--source",
            "wup",
            "-C",
            "KEN",
            "--regional",
            "AFW,SSA",
            "--peers",
            "NGA,GHA",
        ])
        .expect("parse");

        let Some(Commands::Resolve { selection }) = cli.command else {
            unreachable!("expected resolve command");
        };
        let request = selection.to_request();
        assert_eq!(request.country_code.as_deref(), Some("KEN"));
        assert_eq!(request.regional_codes.len(), 2);
        assert_eq!(request.peer_countries, vec!["NGA", "GHA"]);
    }

    #[test]
    fn selection_codes_are_upper_cased() {
        let cli = Cli::try_parse_from([
            "drmdash", "resolve", "-s", "wup", "-C", "ken", "-r", "ssa, afw", "-p", "nga",
        ])
        .expect("parse");

        let Some(Commands::Resolve { selection }) = cli.command else {
            unreachable!("expected resolve command");
        };
        let request = selection.to_request();
        assert_eq!(request.country_code.as_deref(), Some("KEN"));
        assert!(request.regional_codes.contains("SSA"));
        assert!(request.regional_codes.contains("AFW"));
        assert_eq!(request.peer_countries, vec!["NGA"]);
    }

    #[test]
    fn global_flags_anywhere() {
        let cli = Cli::try_parse_from(["drmdash", "status", "--json-mode", "-c", "x.toml"])
            .expect("parse");
        assert!(cli.json_mode);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn classify_takes_population() {
        let cli = Cli::try_parse_from(["drmdash", "classify", "1500", "--thousands"]).expect("parse");
        assert!(matches!(
            cli.command,
            Some(Commands::Classify { thousands: true, .. })
        ));
    }
}
