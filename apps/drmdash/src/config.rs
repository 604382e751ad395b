//! # Configuration
//!
//! Deployment settings read from `drmdash.toml`.
//!
//! ## Lookup order
//!
//! 1. `--config <path>` on the command line
//! 2. `DRMDASH_CONFIG` environment variable
//! 3. `drmdash.toml` in the working directory, if present
//! 4. Built-in defaults
//!
//! ## Environment overrides (applied last)
//!
//! - `DRMDASH_DATA_DIR`: data directory
//! - `DRMDASH_RATE_LIMIT`: requests per second, 0 disables
//! - `DRMDASH_CORS_ORIGINS`: comma-separated origins, or `*`

use drmdash_core::primitives::{DEFAULT_BASE_YEAR, MAX_SOURCE_FILE_SIZE};
use drmdash_core::{CountrySource, DashError, SourceCatalog, SourceSpec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File read when neither `--config` nor `DRMDASH_CONFIG` is given.
pub const DEFAULT_CONFIG_FILE: &str = "drmdash.toml";

/// Default rate limit: 100 requests per second.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

/// Maximum size of a config file (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_countries() -> CountrySource {
    CountrySource::new("countries.csv")
}

fn default_base_year() -> i32 {
    DEFAULT_BASE_YEAR
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_rate_limit() -> u32 {
    DEFAULT_RATE_LIMIT
}

fn default_max_file_size() -> u64 {
    MAX_SOURCE_FILE_SIZE
}

// =============================================================================
// SERVER SETTINGS
// =============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Requests per second; 0 disables rate limiting.
    #[serde(default = "default_rate_limit")]
    pub rate_limit: u32,
    /// Allowed CORS origins. Empty means localhost only; `["*"]` allows all.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            rate_limit: default_rate_limit(),
            cors_origins: Vec::new(),
        }
    }
}

// =============================================================================
// DASHBOARD CONFIG
// =============================================================================

/// Everything needed to build a snapshot and serve it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Directory that relative source paths are resolved against.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Year splitting historical rows from projections.
    #[serde(default = "default_base_year")]
    pub base_year: i32,
    /// Per-file size limit in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    #[serde(default = "default_countries")]
    pub countries: CountrySource,
    /// Source id → file and column contract.
    #[serde(default)]
    pub sources: BTreeMap<String, SourceSpec>,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            base_year: default_base_year(),
            max_file_size: default_max_file_size(),
            countries: default_countries(),
            sources: BTreeMap::new(),
            server: ServerConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, DashError> {
        let config: Self =
            toml::from_str(text).map_err(|e| DashError::Config(format!("Invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, DashError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            DashError::Config(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(DashError::FileTooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                max: MAX_CONFIG_FILE_SIZE,
            });
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            DashError::Config(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    /// Resolve the config using the lookup order, then apply environment
    /// overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self, DashError> {
        let env_path = std::env::var_os("DRMDASH_CONFIG").map(PathBuf::from);
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        let mut config = match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::from_file(&path)?,
            None if default_path.is_file() => Self::from_file(default_path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply `DRMDASH_*` environment overrides.
    pub fn apply_env(&mut self) {
        if let Some(dir) = std::env::var_os("DRMDASH_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(rate) = std::env::var("DRMDASH_RATE_LIMIT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
        {
            self.server.rate_limit = rate;
        }
        if let Ok(origins) = std::env::var("DRMDASH_CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    /// Reject values no deployment could mean.
    pub fn validate(&self) -> Result<(), DashError> {
        if self.max_file_size == 0 {
            return Err(DashError::Config("max_file_size must be positive".to_string()));
        }
        for (id, spec) in &self.sources {
            if id.trim().is_empty() {
                return Err(DashError::Config("Source id must not be empty".to_string()));
            }
            if spec.value_column.trim().is_empty() {
                return Err(DashError::Config(format!(
                    "Source '{}' has an empty value_column",
                    id
                )));
            }
            if spec
                .indicator
                .as_ref()
                .is_some_and(|f| f.column.trim().is_empty() || f.value.trim().is_empty())
            {
                return Err(DashError::Config(format!(
                    "Source '{}' has an empty indicator filter",
                    id
                )));
            }
            if spec.scale.is_some_and(|s| !s.is_finite()) {
                return Err(DashError::Config(format!(
                    "Source '{}' has a non-finite scale",
                    id
                )));
            }
        }
        Ok(())
    }

    /// The source catalog described by this config.
    #[must_use]
    pub fn catalog(&self) -> SourceCatalog {
        self.sources
            .iter()
            .fold(SourceCatalog::new(self.data_dir.clone()), |catalog, (id, spec)| {
                catalog.with_source(id.clone(), spec.clone())
            })
            .with_max_file_size(self.max_file_size)
    }
}

// =============================================================================
// TESTS
// =============================================================================
