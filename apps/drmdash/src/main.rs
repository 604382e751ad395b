//! # drmdash - Regional Benchmark Service
//!
//! The main binary for the drmdash comparison dashboard back-end.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for inspection and CSV export
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              apps/drmdash (THE BINARY)              │
//! │                                                     │
//! │   ┌─────────────┐           ┌─────────────┐         │
//! │   │   CLI       │           │   HTTP API  │         │
//! │   │  (clap)     │           │   (axum)    │         │
//! │   └──────┬──────┘           └──────┬──────┘         │
//! │          └────────────┬────────────┘                │
//! │                       ▼                             │
//! │             ┌───────────────────┐                   │
//! │             │   drmdash-core    │                   │
//! │             │ (snapshot + rules)│                   │
//! │             └───────────────────┘                   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! drmdash server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! drmdash status
//! drmdash resolve -s wup_urban_share -C KEN --regional SSA,AFE
//! drmdash export -s wup_urban_share -C KEN -o kenya.csv
//! ```

use clap::Parser;
use drmdash::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // DRMDASH_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("DRMDASH_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    let default_filter = if cli.verbose {
        "drmdash=debug,drmdash_core=debug,tower_http=debug"
    } else {
        "drmdash=info,tower_http=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Banner only for the server; other commands may write CSV or JSON to stdout
    if !cli.quiet && matches!(cli.command, Some(cli::Commands::Server { .. })) {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the drmdash startup banner.
fn print_banner() {
    println!(
        r#"
  drmdash v{}
  Regional benchmarks for urbanization and disaster-risk indicators
"#,
        env!("CARGO_PKG_VERSION")
    );
}
