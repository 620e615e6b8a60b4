//! Configuration loading and storage path resolution
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the database path
pub const ENV_DATABASE: &str = "SQA_DATABASE";
/// Environment variable overriding the listen address
pub const ENV_BIND: &str = "SQA_BIND";

/// Default listen address for the feedback UI
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5740";
/// File name of the SQLite database inside the data folder
pub const DATABASE_FILE_NAME: &str = "sentiment_qa.db";
/// Default log filter when neither TOML nor RUST_LOG set one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Contents of `config.toml`. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub database_path: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
    pub seed_sample_data: Option<bool>,
    pub catalog_file: Option<PathBuf>,
}

impl TomlConfig {
    /// Parse TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }

    /// Load a config file.
    ///
    /// A missing file is not an error: it logs a warning and yields defaults.
    /// A file that exists but does not parse is a `Config` error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config file not found: {} (using defaults)", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))?;
        debug!("Loaded config file: {}", path.display());
        Ok(config)
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub database_path: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub no_seed: bool,
    pub catalog_file: Option<PathBuf>,
}

/// Fully resolved runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub bind_address: String,
    pub log_level: String,
    pub seed_sample_data: bool,
    pub catalog_file: Option<PathBuf>,
}

impl AppConfig {
    /// Merge CLI, environment, TOML and compiled defaults
    pub fn resolve(cli: CliOverrides, toml: TomlConfig) -> Self {
        let database_path = resolve_setting(
            cli.database_path,
            ENV_DATABASE,
            toml.database_path,
        )
        .unwrap_or_else(default_database_path);

        let bind_address = resolve_setting(cli.bind_address, ENV_BIND, toml.bind_address)
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        Self {
            database_path,
            bind_address,
            log_level: toml
                .log_level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            seed_sample_data: !cli.no_seed && toml.seed_sample_data.unwrap_or(true),
            catalog_file: cli.catalog_file.or(toml.catalog_file),
        }
    }
}

/// CLI → ENV → TOML lookup for a single setting
fn resolve_setting<T>(cli: Option<T>, env_var_name: &str, toml: Option<T>) -> Option<T>
where
    T: From<String>,
{
    if cli.is_some() {
        return cli;
    }

    if let Ok(value) = std::env::var(env_var_name) {
        if !value.trim().is_empty() {
            return Some(T::from(value));
        }
    }

    toml
}

/// Default config file location: `<config_dir>/sqa/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("sqa").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("./sqa_config.toml"))
}

/// OS-dependent default database path: `<data_local_dir>/sqa/sentiment_qa.db`
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("sqa"))
        .unwrap_or_else(|| PathBuf::from("./sqa_data"))
        .join(DATABASE_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_all_fields() {
        let config = TomlConfig::from_toml_str(
            r#"
            database_path = "/srv/sqa/qa.db"
            bind_address = "0.0.0.0:8080"
            log_level = "debug"
            seed_sample_data = false
            "#,
        )
        .unwrap();

        assert_eq!(config.database_path, Some(PathBuf::from("/srv/sqa/qa.db")));
        assert_eq!(config.bind_address.as_deref(), Some("0.0.0.0:8080"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.seed_sample_data, Some(false));
        assert!(config.catalog_file.is_none());
    }

    #[test]
    fn test_toml_empty_is_default() {
        assert_eq!(TomlConfig::from_toml_str("").unwrap(), TomlConfig::default());
    }

    #[test]
    fn test_toml_malformed_is_config_error() {
        let err = TomlConfig::from_toml_str("database_path = [").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_default_database_file_name() {
        assert!(default_database_path().ends_with(DATABASE_FILE_NAME));
    }
}
