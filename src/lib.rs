//! Desktop Notes - Rust Backend Library
//!
//! Backend for sticky-note desktop widgets. Each widget instance owns one
//! note record in a shared SQLite store. It includes:
//! - Command handlers for the host shell
//! - The per-instance lifecycle, interaction and styling services
//! - Storage layer (SQLite record store, identity slots, config)
//! - Data models and utilities

pub mod commands;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

// Re-export commonly used items from commands
pub use commands::{
    delete_note, get_health, get_note, get_settings, list_notes, request_note, reset_settings,
    set_note_status, start_instance, toggle_note_at, update_settings,
};
pub use models::response::*;
pub use models::settings::{AppConfig, SettingsUpdate};
pub use state::AppState;
pub use utils::error::{AppError, AppResult};
