//! Cross-Platform Path Utilities
//!
//! Functions for resolving application directories across platforms.
//! Handles ~/.config/desktop-notes/ and ~/.local/share/desktop-notes/ on Linux.

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Directory name used under the platform config and data roots
pub const APP_DIR_NAME: &str = "desktop-notes";

/// Get the configuration directory (~/.config/desktop-notes/)
pub fn app_config_dir() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| AppError::config("Could not determine config directory"))
}

/// Get the data directory (~/.local/share/desktop-notes/)
pub fn app_data_dir() -> AppResult<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| AppError::config("Could not determine data directory"))
}

/// Get the config file path (~/.config/desktop-notes/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(app_config_dir()?.join("config.json"))
}

/// Get the default database file path (~/.local/share/desktop-notes/notes.db)
pub fn database_path() -> AppResult<PathBuf> {
    Ok(app_data_dir()?.join("notes.db"))
}

/// Get the directory holding per-instance identity slots
pub fn identity_dir() -> AppResult<PathBuf> {
    Ok(app_config_dir()?.join("instances"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.is_dir() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Ensure the parent directory of a file path exists
pub fn ensure_parent_dir(path: &Path) -> AppResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}
