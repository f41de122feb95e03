//! Record Store Integration Tests
//!
//! Exercises the SQLite store through its trait on a temporary database file:
//! - Round trip of every field
//! - Status domain enforcement
//! - Deletion idempotence and id non-reuse
//! - Lazy open and persistence across store instances

use desktop_notes::storage::database::Database;
use desktop_notes::storage::record_store::RecordStore;
use desktop_notes::utils::error::AppError;
use desktop_notes_core::{NoteRecord, NoteStatus, NoteStyle, Point, Size};

// ============================================================================
// Helpers
// ============================================================================

fn temp_db() -> (tempfile::TempDir, Database) {
    let temp_dir = tempfile::tempdir().unwrap();
    let db = Database::new(temp_dir.path().join("notes.db"));
    (temp_dir, db)
}

fn custom_record() -> NoteRecord {
    NoteRecord {
        status: NoteStatus::Hidden,
        filepath: Some("/home/me/notes/groceries.md".to_string()),
        position: Point::new(-40, 1200),
        size: Size::new(320, 90),
        style: NoteStyle {
            transparency: 0.25,
            background_color: "#A0C4FF".to_string(),
            margin: 0,
        },
        ..NoteRecord::default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_create_default_then_read() {
    let (_dir, db) = temp_db();

    let id = db.create(&NoteRecord::default()).unwrap();
    assert_eq!(id, 1);

    let note = db.read(1).unwrap();
    assert_eq!(note.status, NoteStatus::Shown);
    assert_eq!(note.position, Point::new(50, 50));
    assert_eq!(note.size, Size::new(200, 150));
    assert_eq!(note.style, NoteStyle::default());
    assert!(note.filepath.is_none());
}

#[test]
fn test_round_trip_preserves_every_field() {
    let (_dir, db) = temp_db();
    let input = custom_record();

    let id = db.create(&input).unwrap();
    let output = db.read(id).unwrap();
    assert_eq!(output, NoteRecord { id, ..input });
}

#[test]
fn test_update_replaces_row() {
    let (_dir, db) = temp_db();
    let id = db.create(&NoteRecord::default()).unwrap();

    let changed = NoteRecord {
        id,
        ..custom_record()
    };
    db.update(&changed).unwrap();
    assert_eq!(db.read(id).unwrap(), changed);
}

#[test]
fn test_update_missing_row_is_not_found() {
    let (_dir, db) = temp_db();
    let ghost = NoteRecord {
        id: 77,
        ..NoteRecord::default()
    };
    assert!(matches!(db.update(&ghost), Err(AppError::NotFound(_))));
}

#[test]
fn test_invalid_status_is_rejected_and_row_unchanged() {
    let (_dir, db) = temp_db();
    let id = db.create(&NoteRecord::default()).unwrap();

    let err = db.set_status_raw(id, "archived").unwrap_err();
    assert!(matches!(err, AppError::InvalidStatus(_)));
    assert_eq!(db.read(id).unwrap().status, NoteStatus::Shown);
}

#[test]
fn test_set_status_then_list() {
    let (_dir, db) = temp_db();
    for _ in 0..3 {
        db.create(&NoteRecord::default()).unwrap();
    }

    db.set_status_raw(3, "hidden").unwrap();
    let all = db.list_all().unwrap();
    let third = all.iter().find(|n| n.id == 3).unwrap();
    assert_eq!(third.status, NoteStatus::Hidden);
}

#[test]
fn test_delete_is_idempotent() {
    let (_dir, db) = temp_db();
    let id = db.create(&NoteRecord::default()).unwrap();

    assert!(db.delete(id).unwrap());
    assert!(!db.delete(id).unwrap());
    assert!(!db.delete(999).unwrap());
    assert!(db.read(999).unwrap_err().is_not_found());
    assert!(db.read(id).unwrap_err().is_not_found());
}

#[test]
fn test_ids_are_not_reused_after_delete() {
    let (_dir, db) = temp_db();
    let first = db.create(&NoteRecord::default()).unwrap();
    let second = db.create(&NoteRecord::default()).unwrap();
    db.delete(second).unwrap();

    let third = db.create(&NoteRecord::default()).unwrap();
    assert!(third > second);
    assert!(second > first);
}

#[test]
fn test_list_all_is_ascending() {
    let (_dir, db) = temp_db();
    for _ in 0..5 {
        db.create(&NoteRecord::default()).unwrap();
    }
    db.delete(2).unwrap();

    let ids: Vec<_> = db.list_all().unwrap().into_iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![1, 3, 4, 5]);
}

#[test]
fn test_lazy_open_on_first_call() {
    let (dir, db) = temp_db();
    let path = dir.path().join("notes.db");
    assert!(!path.exists());
    assert!(!db.is_open());

    assert!(db.list_all().unwrap().is_empty());
    assert!(db.is_open());
    assert!(path.exists());

    db.open().unwrap();
    db.open().unwrap();
}

#[test]
fn test_data_survives_new_store_instance() {
    let (dir, db) = temp_db();
    let id = db.create(&custom_record()).unwrap();
    drop(db);

    let reopened = Database::new(dir.path().join("notes.db"));
    assert_eq!(reopened.read(id).unwrap().size, Size::new(320, 90));
}

#[test]
fn test_unopenable_location_is_storage_unavailable() {
    let temp_dir = tempfile::tempdir().unwrap();
    let blocker = temp_dir.path().join("not-a-dir");
    std::fs::write(&blocker, "x").unwrap();

    let db = Database::new(blocker.join("notes.db"));
    assert!(db.open().unwrap_err().is_storage_unavailable());
    assert!(db
        .create(&NoteRecord::default())
        .unwrap_err()
        .is_storage_unavailable());
    assert!(!db.is_healthy());
}
