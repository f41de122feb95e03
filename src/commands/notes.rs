//! Note Commands
//!
//! Host-facing entry points. Each command takes the application state, runs
//! against its record store and wraps the outcome in a `CommandResponse`.

use std::path::Path;

use desktop_notes_core::{NoteId, NoteRecord, NoteStatus, Point};

use crate::models::response::{CommandResponse, HealthResponse, InstanceResponse};
use crate::services::applet::NoteApplet;
use crate::services::management::NoteListing;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

/// List every note in ascending id order
pub fn list_notes(state: &AppState) -> CommandResponse<Vec<NoteRecord>> {
    state.store().list_all().into()
}

pub fn get_note(state: &AppState, id: NoteId) -> CommandResponse<NoteRecord> {
    state.store().read(id).into()
}

/// Set a note's status from its stored name ("shown", "hidden", ...)
pub fn set_note_status(state: &AppState, id: NoteId, status: &str) -> CommandResponse<NoteRecord> {
    let result = state
        .store()
        .set_status_raw(id, status)
        .and_then(|_| state.store().read(id));
    result.into()
}

/// Toggle shown/hidden for the row at `index` of a fresh listing
pub fn toggle_note_at(state: &AppState, index: usize) -> CommandResponse<NoteStatus> {
    let result = NoteListing::fetch(state.store())
        .and_then(|mut listing| listing.toggle_status_at(index, state.store()));
    result.into()
}

/// Delete a note; deleting an unknown id succeeds with `false`
pub fn delete_note(state: &AppState, id: NoteId) -> CommandResponse<bool> {
    state.store().delete(id).into()
}

/// Deposit a pending note at an explicit position
pub fn request_note(state: &AppState, x: i32, y: i32) -> CommandResponse<NoteId> {
    state.store().create_pending(Point::new(x, y)).into()
}

/// Get the health status of the store
pub fn get_health(state: &AppState) -> CommandResponse<HealthResponse> {
    let mut health = HealthResponse::default();
    health.database = state.is_database_healthy();
    if !health.database {
        health.status = "degraded".to_string();
    }
    CommandResponse::ok(health)
}

fn start_applet(state: &AppState, instance: &str) -> AppResult<NoteApplet> {
    let slot = state.identity_slot(instance)?;
    let applet = NoteApplet::start(
        state.shared_store(),
        Box::new(slot),
        state.get_config().clone(),
    );
    match applet.degraded_reason() {
        Some(reason) => Err(AppError::storage_unavailable(reason)),
        None => Ok(applet),
    }
}

fn instance_response(applet: &NoteApplet) -> AppResult<InstanceResponse> {
    match (applet.note(), applet.resolution()) {
        (Some(note), Some(resolution)) => Ok(InstanceResponse {
            note_id: note.id,
            resolution,
        }),
        _ => Err(AppError::internal("applet has no resolved note")),
    }
}

/// Start a named widget instance and report which note it resolved to
pub fn start_instance(state: &AppState, instance: &str) -> CommandResponse<InstanceResponse> {
    start_applet(state, instance)
        .and_then(|applet| instance_response(&applet))
        .into()
}

/// Bind a content file to a named instance's note
pub fn bind_instance_file(
    state: &AppState,
    instance: &str,
    path: &Path,
) -> CommandResponse<NoteRecord> {
    let result = start_applet(state, instance).and_then(|mut applet| {
        applet.bind_file(path)?;
        applet
            .note()
            .cloned()
            .ok_or_else(|| AppError::internal("applet has no resolved note"))
    });
    result.into()
}

/// Hide a named instance's note
pub fn hide_instance(state: &AppState, instance: &str) -> CommandResponse<NoteRecord> {
    let result = start_applet(state, instance).and_then(|mut applet| {
        applet.hide()?;
        applet
            .note()
            .cloned()
            .ok_or_else(|| AppError::internal("applet has no resolved note"))
    });
    result.into()
}

/// Request a new note beside a named instance's note
pub fn request_note_beside(state: &AppState, instance: &str) -> CommandResponse<NoteId> {
    start_applet(state, instance)
        .and_then(|applet| applet.request_new_note())
        .into()
}
