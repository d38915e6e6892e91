//! Integration-level unit tests for the SettingsEngine public API.
//!
//! These tests exercise the SettingsEngine through its public trait interface,
//! validating default loading, value persistence, and reset behavior.

use std::fs;
use std::path::PathBuf;

use sitebook::platform::DATABASE_FILE;
use sitebook::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use sitebook::types::errors::SettingsError;
use sitebook::types::settings::{StoreSettings, DEFAULT_LOG_FILTER};
use tempfile::TempDir;

/// Helper: create a SettingsEngine backed by a temp directory that lives for the
/// duration of the test (the caller holds the `TempDir` handle).
fn engine_in_temp(dir: &TempDir) -> SettingsEngine {
    let path = dir
        .path()
        .join("settings.json")
        .to_string_lossy()
        .to_string();
    SettingsEngine::new(Some(path))
}

#[test]
fn test_load_defaults_when_no_config_file_exists() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(settings, StoreSettings::default());
    assert_eq!(settings.log_filter, DEFAULT_LOG_FILTER);
    assert!(settings.database_path.is_none());
}

#[test]
fn test_set_value_persists_changes() {
    let dir = TempDir::new().unwrap();

    {
        let mut engine = engine_in_temp(&dir);
        engine.load().unwrap();
        engine
            .set_value("database_path", serde_json::json!("/srv/sites.db"))
            .unwrap();
        engine
            .set_value("log_filter", serde_json::json!("sitebook=debug"))
            .unwrap();
    }

    let mut engine2 = engine_in_temp(&dir);
    let loaded = engine2.load().unwrap();
    assert_eq!(loaded.database_path.as_deref(), Some("/srv/sites.db"));
    assert_eq!(loaded.log_filter, "sitebook=debug");
}

#[test]
fn test_reset_restores_defaults() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();
    engine
        .set_value("log_filter", serde_json::json!("trace"))
        .unwrap();

    engine.reset().unwrap();
    assert_eq!(*engine.get_settings(), StoreSettings::default());

    let mut engine2 = engine_in_temp(&dir);
    assert_eq!(engine2.load().unwrap(), StoreSettings::default());
}

#[test]
fn test_set_value_rejects_bad_keys_and_values() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    assert!(matches!(
        engine.set_value("", serde_json::json!(true)),
        Err(SettingsError::InvalidKey(_))
    ));
    assert!(matches!(
        engine.set_value("theme.accent", serde_json::json!("red")),
        Err(SettingsError::InvalidKey(_))
    ));
    assert!(matches!(
        engine.set_value("log_filter", serde_json::json!(42)),
        Err(SettingsError::InvalidValue(_))
    ));
    assert_eq!(*engine.get_settings(), StoreSettings::default());
}

#[test]
fn test_load_malformed_json_fails() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    fs::write(engine.get_config_path(), "{ invalid json }").unwrap();

    assert!(matches!(
        engine.load(),
        Err(SettingsError::SerializationError(_))
    ));
}

#[test]
fn test_missing_fields_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    fs::write(engine.get_config_path(), "{}").unwrap();

    assert_eq!(engine.load().unwrap(), StoreSettings::default());
}

#[test]
fn test_database_path_resolution_order() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();
    engine
        .set_value("database_path", serde_json::json!("/srv/sites.db"))
        .unwrap();

    assert_eq!(
        engine.resolve_database_path(Some("/data")),
        PathBuf::from("/data").join(DATABASE_FILE)
    );
    assert_eq!(engine.resolve_database_path(None), PathBuf::from("/srv/sites.db"));
}
