//! App Core for SiteBook.
//!
//! Owns the website store and the settings engine, and gives them an explicit
//! lifecycle: opened once at process start, closed at shutdown.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use tracing::info;

use crate::database::connection::Database;
use crate::managers::website_store::WebsiteStore;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::errors::AppError;

/// Central application struct. Layers that need the store borrow it from here
/// rather than reaching for any global.
pub struct App {
    pub store: WebsiteStore,
    pub settings_engine: Mutex<SettingsEngine>,
}

impl App {
    /// Opens the database at `db_path` with default settings.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, AppError> {
        Self::with_settings(db_path, SettingsEngine::new(None))
    }

    /// Opens the database at `db_path`, keeping `settings_engine` as given.
    pub fn with_settings<P: AsRef<Path>>(
        db_path: P,
        settings_engine: SettingsEngine,
    ) -> Result<Self, AppError> {
        Self::open(db_path.as_ref(), settings_engine)
    }

    /// Loads settings from disk and opens the database they point at.
    pub fn from_settings(mut settings_engine: SettingsEngine) -> Result<Self, AppError> {
        settings_engine.load()?;
        let db_path = settings_engine.database_path();
        Self::open(&db_path, settings_engine)
    }

    fn open(db_path: &Path, settings_engine: SettingsEngine) -> Result<Self, AppError> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::DataDir(format!("{}: {}", parent.display(), e)))?;
        }
        let db = Database::open(db_path)?;
        info!(path = %db_path.display(), "website store opened");
        Ok(Self {
            store: WebsiteStore::new(db),
            settings_engine: Mutex::new(settings_engine),
        })
    }

    /// Closes the database. Consumes the app so nothing can use the store afterwards.
    pub fn shutdown(self) -> Result<(), AppError> {
        self.store.into_database().close()?;
        info!("website store closed");
        Ok(())
    }
}
