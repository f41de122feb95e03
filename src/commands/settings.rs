//! Settings Commands
//!
//! Commands for reading and updating application settings.

use crate::models::response::CommandResponse;
use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::state::AppState;

/// Get current application settings
pub fn get_settings(state: &AppState) -> CommandResponse<AppConfig> {
    CommandResponse::ok(state.get_config().clone())
}

/// Update application settings with a partial update
///
/// An update that fails validation leaves both the file and the loaded
/// configuration untouched.
pub fn update_settings(state: &mut AppState, update: SettingsUpdate) -> CommandResponse<AppConfig> {
    state.update_config(update).into()
}

/// Restore the default settings
pub fn reset_settings(state: &mut AppState) -> CommandResponse<AppConfig> {
    state.reset_config().into()
}
