//! Note Applet and Command Tests
//!
//! Drives whole widget instances and host commands against a database file
//! and file-backed identity slots in a temporary directory.

use std::sync::Arc;

use desktop_notes::commands;
use desktop_notes::services::applet::{NoteApplet, PrimaryAction};
use desktop_notes::services::lifecycle::Resolution;
use desktop_notes::services::styling::StyleEdit;
use desktop_notes::state::AppState;
use desktop_notes::storage::database::Database;
use desktop_notes::storage::identity::{FileIdentitySlot, IdentitySlot};
use desktop_notes::storage::record_store::RecordStore;
use desktop_notes::{AppConfig, SettingsUpdate};
use desktop_notes_core::{NoteStatus, Point};

// ============================================================================
// Helpers
// ============================================================================

struct Workspace {
    dir: tempfile::TempDir,
    store: Arc<Database>,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(Database::new(dir.path().join("notes.db")));
        Self { dir, store }
    }

    fn slot(&self, name: &str) -> FileIdentitySlot {
        FileIdentitySlot::for_instance_in(self.dir.path().join("instances"), name).unwrap()
    }

    fn start(&self, name: &str) -> NoteApplet {
        NoteApplet::start(
            self.store.clone(),
            Box::new(self.slot(name)),
            AppConfig::default(),
        )
    }

    fn state(&self) -> AppState {
        AppState::initialize(
            Some(self.dir.path().join("config.json")),
            Some(self.dir.path().join("notes.db")),
        )
        .unwrap()
    }
}

// ============================================================================
// Applet tests
// ============================================================================

#[test]
fn test_new_note_request_is_adopted_by_next_instance() {
    let ws = Workspace::new();
    let first = ws.start("first");
    assert_eq!(first.resolution(), Some(Resolution::Created));

    let requested = first.request_new_note().unwrap();
    let second = ws.start("second");

    assert_eq!(second.resolution(), Some(Resolution::Adopted));
    let note = second.note().unwrap();
    assert_eq!(note.id, requested);
    assert_eq!(note.position, Point::new(265, 50));
    assert_eq!(ws.store.read(requested).unwrap().status, NoteStatus::Shown);
}

#[test]
fn test_restarted_instance_keeps_bound_file() {
    let ws = Workspace::new();
    let path = ws.dir.path().join("todo.md");

    let mut applet = ws.start("panel");
    applet.bind_file(&path).unwrap();
    let id = applet.note().unwrap().id;
    drop(applet);

    let restarted = ws.start("panel");
    assert_eq!(restarted.resolution(), Some(Resolution::Remembered));
    assert_eq!(restarted.note().unwrap().id, id);
    assert_eq!(
        restarted.primary_action(),
        PrimaryAction::OpenInEditor(format!("konsole -e nvim {}", path.display()))
    );
}

#[test]
fn test_cancelled_style_edit_is_not_persisted() {
    let ws = Workspace::new();
    let mut applet = ws.start("panel");
    let id = applet.note().unwrap().id;
    let original = ws.store.read(id).unwrap().style;

    let mut session = applet.begin_style_edit().unwrap();
    for edit in [
        StyleEdit::Transparency(0.4),
        StyleEdit::BackgroundColor("#202020".to_string()),
        StyleEdit::Margin(2),
    ] {
        let event = session.propose(edit).unwrap();
        applet.handle_style_event(event).unwrap();
    }
    assert_eq!(applet.live_style().unwrap().margin, 2);

    applet.handle_style_event(session.cancel()).unwrap();
    assert_eq!(applet.live_style().unwrap(), &original);
    assert_eq!(ws.store.read(id).unwrap().style, original);
}

#[test]
fn test_confirmed_style_survives_restart() {
    let ws = Workspace::new();
    let mut applet = ws.start("panel");

    let mut session = applet.begin_style_edit().unwrap();
    session
        .propose(StyleEdit::BackgroundColor("#CAFFBF".to_string()))
        .unwrap();
    applet.handle_style_event(session.confirm()).unwrap();
    drop(applet);

    let restarted = ws.start("panel");
    assert_eq!(restarted.live_style().unwrap().background_color, "#CAFFBF");
}

#[test]
fn test_instance_writes_keep_status_set_by_management_view() {
    let ws = Workspace::new();
    let mut applet = ws.start("panel");
    let id = applet.note().unwrap().id;

    // A second process hides the note through its own connection
    let management = Database::new(ws.dir.path().join("notes.db"));
    management.set_status(id, NoteStatus::Hidden).unwrap();

    applet.bind_file(ws.dir.path().join("late.md")).unwrap();
    let mut session = applet.begin_style_edit().unwrap();
    session.propose(StyleEdit::Transparency(0.3)).unwrap();
    applet.handle_style_event(session.confirm()).unwrap();
    applet.toggle_drag_resize_mode().unwrap();
    applet.pointer_press(Point::new(150, 100));
    assert!(applet.pointer_release(Point::new(150, 130)).unwrap().is_persisted());

    let stored = management.read(id).unwrap();
    assert_eq!(stored.status, NoteStatus::Hidden);
    assert_eq!(stored.style.transparency, 0.3);
    assert_eq!(stored.position, Point::new(50, 80));
    assert!(stored.filepath.unwrap().ends_with("late.md"));
}

#[test]
fn test_delete_forgets_identity() {
    let ws = Workspace::new();
    let applet = ws.start("panel");
    let id = applet.note().unwrap().id;

    assert!(applet.delete().unwrap());
    assert!(ws.store.read(id).unwrap_err().is_not_found());
    assert_eq!(ws.slot("panel").load().unwrap(), None);

    let fresh = ws.start("panel");
    assert_eq!(fresh.resolution(), Some(Resolution::Created));
    assert_ne!(fresh.note().unwrap().id, id);
}

#[test]
fn test_degraded_instance_does_not_panic() {
    let ws = Workspace::new();
    let blocker = ws.dir.path().join("blocker");
    std::fs::write(&blocker, "x").unwrap();
    let store = Arc::new(Database::new(blocker.join("notes.db")));

    let mut applet = NoteApplet::start(store, Box::new(ws.slot("panel")), AppConfig::default());
    assert!(applet.is_degraded());
    assert!(applet.request_new_note().is_err());
    assert!(applet.toggle_drag_resize_mode().is_err());
    assert!(applet.pointer_release(Point::new(0, 0)).is_none());
}

// ============================================================================
// Command tests
// ============================================================================

#[test]
fn test_management_commands() {
    let ws = Workspace::new();
    let state = ws.state();

    let first = commands::start_instance(&state, "a").data.unwrap();
    let pending = commands::request_note(&state, 10, 20).data.unwrap();

    let response = commands::set_note_status(&state, first.note_id, "hidden");
    assert!(response.success);

    let notes = commands::list_notes(&state).data.unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].status, NoteStatus::Hidden);
    assert_eq!(notes[1].id, pending);
    assert_eq!(notes[1].status, NoteStatus::PendingPlacement);

    let rejected = commands::set_note_status(&state, pending, "archived");
    assert!(!rejected.success);
    assert_eq!(
        commands::get_note(&state, pending).data.unwrap().status,
        NoteStatus::PendingPlacement
    );

    assert_eq!(commands::delete_note(&state, 404).data, Some(false));
}

#[test]
fn test_instance_commands_share_identity() {
    let ws = Workspace::new();
    let state = ws.state();

    let started = commands::start_instance(&state, "desk").data.unwrap();
    let bound = commands::bind_instance_file(&state, "desk", &ws.dir.path().join("a.md"))
        .data
        .unwrap();
    assert_eq!(bound.id, started.note_id);

    let hidden = commands::hide_instance(&state, "desk").data.unwrap();
    assert_eq!(hidden.status, NoteStatus::Hidden);

    let spawned = commands::request_note_beside(&state, "desk").data.unwrap();
    let adopted = commands::start_instance(&state, "desk-2").data.unwrap();
    assert_eq!(adopted.note_id, spawned);
    assert_eq!(adopted.resolution, Resolution::Adopted);
}

#[test]
fn test_settings_commands() {
    let ws = Workspace::new();
    let mut state = ws.state();

    let updated = commands::update_settings(
        &mut state,
        SettingsUpdate {
            new_note_spacing: Some(30),
            ..Default::default()
        },
    );
    assert_eq!(updated.data.unwrap().new_note_spacing, 30);

    // A fresh process sees the saved spacing
    let state = ws.state();
    assert_eq!(commands::get_settings(&state).data.unwrap().new_note_spacing, 30);
    let first = commands::start_instance(&state, "a").data.unwrap();
    let spawned = commands::request_note_beside(&state, "a").data.unwrap();
    assert_ne!(first.note_id, spawned);
    assert_eq!(
        commands::get_note(&state, spawned).data.unwrap().position,
        Point::new(280, 50)
    );

    let mut state = ws.state();
    let reset = commands::reset_settings(&mut state).data.unwrap();
    assert_eq!(reset, AppConfig::default());
}

#[test]
fn test_health_command() {
    let ws = Workspace::new();
    let health = commands::get_health(&ws.state()).data.unwrap();
    assert!(health.database);
    assert_eq!(health.service, "desktop-notes");
}
