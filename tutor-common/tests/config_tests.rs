//! Configuration discovery and loading tests
//!
//! Uses serial_test because several tests manipulate process environment
//! variables.

use serde::Deserialize;
use serial_test::serial;
use std::env;
use std::io::Write;
use tutor_common::config::{
    load_or_default, load_toml_config, resolve_secret, ConfigFileResolver, LoggingConfig,
};
use tutor_common::Error;

#[derive(Debug, Default, Deserialize)]
struct SampleConfig {
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    logging: LoggingConfig,
}

#[test]
fn test_load_toml_config_parses_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = 6000\n[logging]\nlevel = \"debug\"").unwrap();

    let config: SampleConfig = load_toml_config(file.path()).unwrap();
    assert_eq!(config.port, Some(6000));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_load_toml_config_reports_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = [not toml").unwrap();

    let result: Result<SampleConfig, _> = load_toml_config(file.path());
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_explicit_missing_file_is_error() {
    let resolver = ConfigFileResolver::new("tutor-test");
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    let result: Result<SampleConfig, _> = load_or_default(&resolver, Some(&missing));
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_env_var_selects_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = 7001").unwrap();

    let resolver = ConfigFileResolver::new("tutor-test");
    env::set_var(resolver.env_var_name(), file.path());
    let config: SampleConfig = load_or_default(&resolver, None).unwrap();
    env::remove_var(resolver.env_var_name());

    assert_eq!(config.port, Some(7001));
}

#[test]
#[serial]
fn test_resolve_secret_prefers_environment() {
    env::set_var("TUTOR_TEST_SECRET", "from-env");
    let value = resolve_secret("Test secret", "TUTOR_TEST_SECRET", Some("from-toml"));
    env::remove_var("TUTOR_TEST_SECRET");

    assert_eq!(value.as_deref(), Some("from-env"));
}

#[test]
#[serial]
fn test_resolve_secret_falls_back_to_toml() {
    env::set_var("TUTOR_TEST_SECRET", "   ");
    let value = resolve_secret("Test secret", "TUTOR_TEST_SECRET", Some("from-toml"));
    env::remove_var("TUTOR_TEST_SECRET");

    assert_eq!(value.as_deref(), Some("from-toml"));
}

#[test]
#[serial]
fn test_resolve_secret_absent() {
    env::remove_var("TUTOR_TEST_SECRET");
    assert!(resolve_secret("Test secret", "TUTOR_TEST_SECRET", Some("")).is_none());
}
