//! # drmdash-core
//!
//! Reference data and series resolution for the drmdash dashboard service.
//!
//! Given a selected country and a set of regional or global benchmark
//! codes, this crate resolves the rows a comparison chart should draw from
//! a CSV-backed source, tagged with display names and colors.
//!
//! ## Components
//!
//! - `countries` → ISO3 → region / display name table
//! - `registry` → regional and global benchmark registries
//! - `loader` → CSV sources, column contracts, the `Loader` trait
//! - `snapshot` → one-shot, immutable in-memory copy of all sources
//! - `resolver` → request → ordered `ResolvedSeries`
//! - `outcome` → errors and empty results → chart placeholders
//! - `export` → CSV download of resolved series
//!
//! ## Architectural Constraints
//!
//! - No async, no network, no logging: the app crate owns those
//! - Everything is read-only after load; no interior mutability
//! - Output order is deterministic and never depends on set iteration

// =============================================================================
// MODULES
// =============================================================================

pub mod cities;
pub mod countries;
pub mod export;
pub mod loader;
pub mod outcome;
pub mod primitives;
pub mod registry;
pub mod resolver;
pub mod snapshot;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    BenchmarkEntry, BenchmarkOption, CountryRecord, DashError, Observation, RegionCode,
    ResolvedSeries, SeriesKind, SeriesRequest, normalize_code,
};

// =============================================================================
// RE-EXPORTS: Components
// =============================================================================

pub use cities::CitySize;
pub use countries::{CountrySource, CountryTable};
pub use export::{export_csv, export_file_name, export_table_csv};
pub use loader::{CsvLoader, IndicatorFilter, Loader, SourceCatalog, SourceSpec, Table};
pub use outcome::{ChartOutcome, PlaceholderKind};
pub use registry::{BenchmarkRegistry, BenchmarkScope};
pub use resolver::{Resolver, resolve, validate_request};
pub use snapshot::{Snapshot, SnapshotSummary, SourceSummary};
