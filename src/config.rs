//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::store::TtlDialect;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Catalog store adapter configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_address")]
    pub address: String,

    /// How the adapter expresses TTL-on-write, fixed at construction
    #[serde(default)]
    pub ttl_dialect: TtlDialect,

    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

fn default_store_address() -> String {
    "127.0.0.1:6379".to_string()
}

fn default_pool_size() -> usize {
    8
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            address: default_store_address(),
            ttl_dialect: TtlDialect::default(),
            pool_size: default_pool_size(),
        }
    }
}

/// Search index configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_scan_page_limit")]
    pub scan_page_limit: u32,

    #[serde(default = "default_temp_config_ttl")]
    pub temp_config_ttl_secs: u64,

    #[serde(default = "default_serialize_host_updates")]
    pub serialize_host_updates: bool,
}

fn default_scan_page_limit() -> u32 {
    1000
}

fn default_temp_config_ttl() -> u64 {
    crate::search::TEMP_CONFIG_TTL_SECS
}

fn default_serialize_host_updates() -> bool {
    true
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            scan_page_limit: default_scan_page_limit(),
            temp_config_ttl_secs: default_temp_config_ttl(),
            serialize_host_updates: default_serialize_host_updates(),
        }
    }
}

impl From<&SearchConfig> for crate::search::SearchConfig {
    fn from(config: &SearchConfig) -> Self {
        Self {
            scan_page_limit: config.scan_page_limit,
            temp_config_ttl_secs: config.temp_config_ttl_secs,
            serialize_host_updates: config.serialize_host_updates,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(address) = std::env::var("ATLAS_STORE_ADDRESS") {
            config.store.address = address;
        }
        if let Ok(limit) = std::env::var("ATLAS_SCAN_PAGE_LIMIT") {
            if let Ok(limit) = limit.parse() {
                config.search.scan_page_limit = limit;
            }
        }
        if let Ok(level) = std::env::var("ATLAS_LOG_LEVEL") {
            config.logging.level = level;
        }

        config
    }
}

/// Initialize the global tracing subscriber from logging config
pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Errors that can occur loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("failed to parse config file {path}: {error}")]
    Parse { path: PathBuf, error: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.store.address, "127.0.0.1:6379");
        assert_eq!(config.store.ttl_dialect, TtlDialect::TtlOnWrite);
        assert_eq!(config.search.scan_page_limit, 1000);
        assert_eq!(config.search.temp_config_ttl_secs, 14 * 24 * 60 * 60);
        assert!(config.search.serialize_host_updates);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[store]
address = "10.0.0.5:6379"
ttl_dialect = "separate_expire"

[search]
scan_page_limit = 50
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.store.address, "10.0.0.5:6379");
        assert_eq!(config.store.ttl_dialect, TtlDialect::SeparateExpire);
        assert_eq!(config.search.scan_page_limit, 50);
        // Untouched sections fall back to defaults.
        assert!(config.search.serialize_host_updates);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/atlas.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[store\naddress = ").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_search_config_conversion() {
        let mut config = Config::default();
        config.search.scan_page_limit = 7;
        let search: crate::search::SearchConfig = (&config.search).into();
        assert_eq!(search.scan_page_limit, 7);
    }
}
