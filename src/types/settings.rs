use serde::{Deserialize, Serialize};

/// Default tracing filter when neither `RUST_LOG` nor the settings file sets one.
pub const DEFAULT_LOG_FILTER: &str = "sitebook=info";

/// Top-level application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreSettings {
    /// Explicit database file; `None` means the platform data directory.
    #[serde(default)]
    pub database_path: Option<String>,
    /// `tracing_subscriber::EnvFilter` directive used for logging.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_path: None,
            log_filter: default_log_filter(),
        }
    }
}
