// SiteBook Settings Engine
// Loads, saves, updates and resets the settings file, and resolves where the
// website database lives.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::StoreSettings;

/// Environment variable naming a directory that overrides the database location.
pub const DATA_DIR_ENV: &str = "SITEBOOK_DATA_DIR";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<StoreSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &StoreSettings;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine implementation that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: StoreSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses `settings.json` in the platform config directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = path_override.unwrap_or_else(|| {
            platform::get_config_dir()
                .join(platform::SETTINGS_FILE)
                .to_string_lossy()
                .to_string()
        });

        Self {
            config_path,
            settings: StoreSettings::default(),
        }
    }

    /// Where the website database should be opened, honouring `SITEBOOK_DATA_DIR`.
    pub fn database_path(&self) -> PathBuf {
        self.resolve_database_path(std::env::var(DATA_DIR_ENV).ok().as_deref())
    }

    /// Resolution order: data-dir override, then `database_path` from the
    /// settings file, then the platform default.
    pub fn resolve_database_path(&self, data_dir_override: Option<&str>) -> PathBuf {
        if let Some(dir) = data_dir_override.filter(|d| !d.is_empty()) {
            return PathBuf::from(dir).join(platform::DATABASE_FILE);
        }
        match &self.settings.database_path {
            Some(path) => PathBuf::from(path),
            None => platform::default_database_path(),
        }
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file.
    ///
    /// A missing file yields defaults; a malformed one is an error.
    fn load(&mut self) -> Result<StoreSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            debug!(path = %self.config_path, "no settings file, using defaults");
            self.settings = StoreSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        let settings: StoreSettings = serde_json::from_str(&content).map_err(|e| {
            warn!(path = %self.config_path, "malformed settings file: {}", e);
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;

        self.settings = settings;
        Ok(self.settings.clone())
    }

    /// Saves the current settings, creating parent directories as needed.
    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    fn get_settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Updates one setting by dot-notation key (e.g. `"log_filter"`), validates
    /// the result by deserializing it, then saves to disk.
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let mut json_value = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        let pointer = format!("/{}", key.replace('.', "/"));
        let slot = json_value.pointer_mut(&pointer).ok_or_else(|| {
            SettingsError::InvalidKey(format!("Key '{}' not found in settings", key))
        })?;
        *slot = value;

        let new_settings: StoreSettings = serde_json::from_value(json_value).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;

        self.settings = new_settings;
        self.save()
    }

    /// Resets all settings to defaults and saves to disk.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = StoreSettings::default();
        self.save()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
