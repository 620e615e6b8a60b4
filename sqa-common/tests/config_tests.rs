//! Unit tests for configuration resolution
//!
//! Priority order: CLI → environment → TOML → compiled default.
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate SQA_DATABASE or SQA_BIND are marked with #[serial].

use serial_test::serial;
use sqa_common::config::{
    default_database_path, AppConfig, CliOverrides, TomlConfig, DEFAULT_BIND_ADDRESS,
    DEFAULT_LOG_LEVEL, ENV_BIND, ENV_DATABASE,
};
use sqa_common::Error;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

fn clear_env() {
    env::remove_var(ENV_DATABASE);
    env::remove_var(ENV_BIND);
}

#[test]
#[serial]
fn test_no_overrides_uses_defaults() {
    clear_env();

    let config = AppConfig::resolve(CliOverrides::default(), TomlConfig::default());

    assert_eq!(config.database_path, default_database_path());
    assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
    assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    assert!(config.seed_sample_data);
    assert!(config.catalog_file.is_none());
}

#[test]
#[serial]
fn test_toml_overrides_defaults() {
    clear_env();

    let toml = TomlConfig {
        database_path: Some(PathBuf::from("/toml/qa.db")),
        bind_address: Some("0.0.0.0:9000".to_string()),
        log_level: Some("debug".to_string()),
        seed_sample_data: Some(false),
        catalog_file: Some(PathBuf::from("/toml/catalog.json")),
    };
    let config = AppConfig::resolve(CliOverrides::default(), toml);

    assert_eq!(config.database_path, PathBuf::from("/toml/qa.db"));
    assert_eq!(config.bind_address, "0.0.0.0:9000");
    assert_eq!(config.log_level, "debug");
    assert!(!config.seed_sample_data);
    assert_eq!(config.catalog_file, Some(PathBuf::from("/toml/catalog.json")));
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    clear_env();
    env::set_var(ENV_DATABASE, "/env/qa.db");
    env::set_var(ENV_BIND, "127.0.0.1:7000");

    let toml = TomlConfig {
        database_path: Some(PathBuf::from("/toml/qa.db")),
        bind_address: Some("0.0.0.0:9000".to_string()),
        ..Default::default()
    };
    let config = AppConfig::resolve(CliOverrides::default(), toml);

    assert_eq!(config.database_path, PathBuf::from("/env/qa.db"));
    assert_eq!(config.bind_address, "127.0.0.1:7000");

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env();
    env::set_var(ENV_DATABASE, "/env/qa.db");

    let cli = CliOverrides {
        database_path: Some(PathBuf::from("/cli/qa.db")),
        bind_address: Some("127.0.0.1:6000".to_string()),
        no_seed: true,
        catalog_file: None,
    };
    let toml = TomlConfig {
        seed_sample_data: Some(true),
        ..Default::default()
    };
    let config = AppConfig::resolve(cli, toml);

    assert_eq!(config.database_path, PathBuf::from("/cli/qa.db"));
    assert_eq!(config.bind_address, "127.0.0.1:6000");
    assert!(!config.seed_sample_data, "--no-seed wins over TOML");

    clear_env();
}

#[test]
#[serial]
fn test_blank_env_var_is_ignored() {
    clear_env();
    env::set_var(ENV_BIND, "   ");

    let config = AppConfig::resolve(CliOverrides::default(), TomlConfig::default());
    assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);

    clear_env();
}

#[test]
fn test_missing_config_file_does_not_error() {
    let dir = TempDir::new().unwrap();
    let config = TomlConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_config_file_is_read() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "bind_address = \"127.0.0.1:5999\"\n").unwrap();

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.bind_address.as_deref(), Some("127.0.0.1:5999"));
}

#[test]
fn test_malformed_config_file_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "bind_address = 5740 = oops").unwrap();

    assert!(matches!(TomlConfig::load(&path), Err(Error::Config(_))));
}
