//! Configuration loading tests

mod common;

use common::fixtures::CONFIG_TOML;
use minarets_player::{AppConfig, CliError};
use minarets_playback::ShuffleMode;
use std::io::Write;

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_loads_file_values() {
    let file = config_file(CONFIG_TOML);

    let config = AppConfig::load_with_prefix(Some(file.path()), "MINARETS_TEST_FILE").unwrap();

    assert_eq!(config.api.url, "http://localhost:9000/");
    assert_eq!(config.api.token.as_deref(), Some("file-token"));
    assert_eq!(config.playback.volume, 55);
    assert_eq!(config.playback.shuffle, ShuffleMode::Smart);
    assert!(config.playback.skip_on_error);
    // Unset playback keys keep their defaults
    assert_eq!(config.playback.restart_threshold_secs, 3);
    assert!(config.validate().is_ok());
}

#[test]
fn test_environment_overrides_file() {
    let file = config_file(CONFIG_TOML);
    std::env::set_var("MINARETS_TEST_ENV_PLAYBACK__VOLUME", "20");
    std::env::set_var("MINARETS_TEST_ENV_API__URL", "https://staging.example.com");

    let config = AppConfig::load_with_prefix(Some(file.path()), "MINARETS_TEST_ENV").unwrap();

    std::env::remove_var("MINARETS_TEST_ENV_PLAYBACK__VOLUME");
    std::env::remove_var("MINARETS_TEST_ENV_API__URL");

    assert_eq!(config.playback.volume, 20);
    assert_eq!(config.api.url, "https://staging.example.com");
    assert_eq!(config.api.token.as_deref(), Some("file-token"));
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let result = AppConfig::load_with_prefix(Some(&path), "MINARETS_TEST_MISSING");
    assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("not found")));
}

#[test]
fn test_invalid_file_values_fail_validation() {
    let file = config_file("[api]\nurl = \"ftp://example.com\"\n");

    let config = AppConfig::load_with_prefix(Some(file.path()), "MINARETS_TEST_INVALID").unwrap();
    assert!(config.validate().is_err());
}
