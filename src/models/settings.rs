//! Settings Models
//!
//! Application configuration and settings data structures.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Placeholder substituted with the note's content path in `editor_command`
pub const FILEPATH_PLACEHOLDER: &str = "{filepath}";

/// Application configuration stored in config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Command used to open a note's file, with `{filepath}` as placeholder
    pub editor_command: String,
    /// Database file override; the platform data directory is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
    /// Horizontal gap between a note and a new note requested from it
    #[serde(default = "default_new_note_spacing")]
    pub new_note_spacing: i32,
    /// Log filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_new_note_spacing() -> i32 {
    15
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            editor_command: "konsole -e nvim {filepath}".to_string(),
            database_path: None,
            new_note_spacing: default_new_note_spacing(),
            log_level: default_log_level(),
        }
    }
}

/// Settings update request (partial update)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SettingsUpdate {
    pub editor_command: Option<String>,
    pub database_path: Option<PathBuf>,
    pub new_note_spacing: Option<i32>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(command) = update.editor_command {
            self.editor_command = command;
        }
        if let Some(path) = update.database_path {
            self.database_path = Some(path);
        }
        if let Some(spacing) = update.new_note_spacing {
            self.new_note_spacing = spacing;
        }
        if let Some(level) = update.log_level {
            self.log_level = level;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.editor_command.contains(FILEPATH_PLACEHOLDER) {
            return Err(format!(
                "editor_command must contain the {} placeholder",
                FILEPATH_PLACEHOLDER
            ));
        }

        if self.new_note_spacing < 0 {
            return Err("new_note_spacing cannot be negative".to_string());
        }

        if !["error", "warn", "info", "debug", "trace"].contains(&self.log_level.as_str()) {
            return Err(format!("Invalid log_level: {}", self.log_level));
        }

        Ok(())
    }

    /// The editor command line for a specific file
    pub fn editor_command_for(&self, filepath: &str) -> String {
        self.editor_command.replace(FILEPATH_PLACEHOLDER, filepath)
    }
}
