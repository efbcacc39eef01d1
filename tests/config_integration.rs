//! Integration tests for settings file loading and bootstrap.
//!
//! These tests verify that profiles read from `tether.toml` resolve the same
//! way as profiles built in code.

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tether::config::{CONFIG_FILE_NAME, CONFIG_PATH_VAR, ENVIRONMENT_VAR, MapEnvSource, Profile};
use tether::prelude::*;

const SETTINGS: &str = r#"
test = "development"

[development]
adapter = "sqlite"
database = "db/development.sqlite3"
timeout = 5000

[production]
adapter = "postgresql"
host = "${DB_HOST:-localhost}"
port = 5432
database = "app"
pool = 5
"#;

fn project(settings: &str) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(dir.path().join(CONFIG_FILE_NAME), settings).expect("Failed to write settings");
    dir
}

/// Test profiles keep their file order and shape
#[test]
fn test_settings_file_profiles() {
    let dir = project(SETTINGS);
    let registry = ConfigurationRegistry::from_file_with(dir.path().join(CONFIG_FILE_NAME), &MapEnvSource::new())
        .expect("Failed to load settings");

    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["test", "development", "production"]);
    assert_eq!(registry.get("test"), Some(&Profile::from("development")));

    let development = registry.get("development").and_then(Profile::as_config).unwrap();
    assert_eq!(development.get("timeout"), Some(&Value::Integer(5000)));
}

/// Test `${VAR}` expansion in the settings file
#[test]
fn test_settings_env_expansion() {
    let dir = project(SETTINGS);

    let env = MapEnvSource::new().set("DB_HOST", "db.internal");
    let manager = tether::bootstrap_in(dir.path(), &env).unwrap();
    assert_eq!(manager.resolve("production").unwrap().host(), Some("db.internal"));

    let manager = tether::bootstrap_in(dir.path(), &MapEnvSource::new()).unwrap();
    assert_eq!(manager.resolve("production").unwrap().host(), Some("localhost"));
}

/// Test the current environment comes from `TETHER_ENV`
#[test]
fn test_bootstrap_environment() {
    let dir = project(SETTINGS);
    let env = MapEnvSource::new().set(ENVIRONMENT_VAR, "test");

    let manager = tether::bootstrap_in(dir.path(), &env).unwrap();
    assert_eq!(manager.environment(), Some("test"));

    let config = manager.resolve(Descriptor::Absent).unwrap();
    assert_eq!(config.adapter(), "sqlite");
    assert_eq!(config.database(), Some("db/development.sqlite3"));
}

/// Test `TETHER_CONFIG` overrides the settings file location
#[test]
fn test_bootstrap_config_path() {
    let dir = project(SETTINGS);
    let elsewhere = TempDir::new().unwrap();
    let env = MapEnvSource::new().set(CONFIG_PATH_VAR, dir.path().join(CONFIG_FILE_NAME).display().to_string());

    let manager = tether::bootstrap_in(elsewhere.path(), &env).unwrap();
    assert!(manager.registry().contains("production"));

    let env = MapEnvSource::new().set(CONFIG_PATH_VAR, elsewhere.path().join("missing.toml").display().to_string());
    let err = tether::bootstrap_in(elsewhere.path(), &env).unwrap_err();
    assert!(matches!(err, ConnectionError::Config(_)));
}

/// Test a directory without a settings file starts empty
#[test]
fn test_bootstrap_without_settings() {
    let dir = TempDir::new().unwrap();
    let manager = tether::bootstrap_in(dir.path(), &MapEnvSource::new()).unwrap();

    assert!(manager.registry().is_empty());
    assert!(manager.loader().contains("sqlite"));
}

/// Test invalid settings surface as configuration errors
#[test]
fn test_invalid_settings() {
    let cases = [
        "[development\nadapter = \"sqlite\"",
        "[development.pool]\nmax = 5",
        "development = 5",
        "[development]\nhosts = [\"a\", \"b\"]",
    ];

    for settings in cases {
        let dir = project(settings);
        let err = tether::bootstrap_in(dir.path(), &MapEnvSource::new()).unwrap_err();
        assert!(matches!(err, ConnectionError::Config(_)), "accepted: {settings}");
    }
}
