//! Integration tests for infamous-config crate.

use infamous_common::test_utils::config_fixtures;
use infamous_common::LoggingConfig;
use infamous_config::{Config, ConfigError, ConfigLoader};
use std::io::Write;

#[test]
fn test_default_config_validation() {
    let mut config = Config::default();

    // Default config should fail validation due to empty token and database url
    assert!(config.validate().is_err());

    config.discord.token = "test_token".to_string();
    assert!(config.validate().is_err());

    config.database.url = "postgres://localhost/infamous".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validation_rejects_empty_prefix_and_pool() {
    let mut config = ConfigLoader::parse(config_fixtures::minimal_config_yaml()).unwrap();
    config.discord.prefix.clear();
    assert!(config.validate().is_err());

    let mut config = ConfigLoader::parse(config_fixtures::minimal_config_yaml()).unwrap();
    config.database.max_connections = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_load_from_explicit_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(config_fixtures::full_config_yaml().as_bytes())
        .unwrap();

    let config = ConfigLoader::read_file(file.path()).unwrap();
    assert_eq!(config.discord.token, "test_token_full");
    assert_eq!(config.discord.owner_ids.len(), 2);
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");

    let err = ConfigLoader::read_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.yaml"));
}

#[test]
fn test_malformed_yaml_is_parse_error() {
    let err = ConfigLoader::parse("discord: [unclosed").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_logging_settings_convert() {
    let config = ConfigLoader::parse(config_fixtures::full_config_yaml()).unwrap();
    let logging = LoggingConfig::from(&config.logging);
    assert_eq!(logging.level, "debug");
    assert!(logging.json_format);
    assert!(logging.file_path.is_none());
}
