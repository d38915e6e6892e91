use thiserror::Error;

use super::website::WebsiteId;

// === WebsiteError ===

/// Errors related to saved-website operations.
#[derive(Debug, Error)]
pub enum WebsiteError {
    /// No website with the given ID exists in the store.
    #[error("Website not found: {0}")]
    NotFound(WebsiteId),
    /// The durable store failed to read, write, or commit.
    #[error("Website persistence error: {0}")]
    Persistence(String),
    /// The stored link does not parse as a URL.
    #[error("Invalid website link: {0}")]
    InvalidLink(String),
}

impl From<rusqlite::Error> for WebsiteError {
    fn from(err: rusqlite::Error) -> Self {
        WebsiteError::Persistence(err.to_string())
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === AppError ===

/// Errors raised while bringing the application up or down.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Failed to prepare data directory: {0}")]
    DataDir(String),
}
