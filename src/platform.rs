// SiteBook platform paths
// Linux/BSD: $XDG_CONFIG_HOME/sitebook, $XDG_DATA_HOME/sitebook
// macOS:     ~/Library/Application Support/SiteBook
// Windows:   %APPDATA%/SiteBook

use std::env;
use std::path::PathBuf;

/// File name of the website database inside the data directory.
pub const DATABASE_FILE: &str = "sitebook.db";

/// File name of the settings file inside the config directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Returns the platform-specific configuration directory for SiteBook.
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        application_support()
    }
    #[cfg(target_os = "windows")]
    {
        roaming_app_data()
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        xdg_dir(env::var("XDG_CONFIG_HOME").ok(), &home_dir(), &[".config"])
    }
}

/// Returns the platform-specific data directory for SiteBook.
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        application_support()
    }
    #[cfg(target_os = "windows")]
    {
        roaming_app_data()
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        xdg_dir(env::var("XDG_DATA_HOME").ok(), &home_dir(), &[".local", "share"])
    }
}

/// Default location of the website database.
pub fn default_database_path() -> PathBuf {
    get_data_dir().join(DATABASE_FILE)
}

#[cfg(not(target_os = "windows"))]
fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

#[cfg(target_os = "macos")]
fn application_support() -> PathBuf {
    home_dir()
        .join("Library")
        .join("Application Support")
        .join("SiteBook")
}

#[cfg(target_os = "windows")]
fn roaming_app_data() -> PathBuf {
    let appdata =
        env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("SiteBook")
}

/// `$XDG_*_HOME/sitebook` when the variable is set and non-empty, else
/// `home/<fallback...>/sitebook`.
#[cfg(any(all(unix, not(target_os = "macos")), test))]
fn xdg_dir(xdg: Option<String>, home: &std::path::Path, fallback: &[&str]) -> PathBuf {
    match xdg.filter(|v| !v.is_empty()) {
        Some(base) => PathBuf::from(base).join("sitebook"),
        None => fallback
            .iter()
            .fold(home.to_path_buf(), |dir, part| dir.join(part))
            .join("sitebook"),
    }
}
