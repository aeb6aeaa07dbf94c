//! Configuration and log file locations
//!
//! Uses the directories crate for platform-appropriate locations:
//! - Linux: `~/.config/appcenter-uitest/` and `~/.local/share/appcenter-uitest/`
//! - macOS: `~/Library/Application Support/appcenter-uitest/`
//! - Windows: `%APPDATA%\appcenter-uitest\`

use std::path::PathBuf;

/// Application name used for config and data directories
const APP_NAME: &str = "appcenter-uitest";

/// Get the configuration directory path
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the path to the log directory
pub fn log_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.data_dir().join("logs"))
}
