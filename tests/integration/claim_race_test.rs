//! Concurrent Claim Tests
//!
//! Independent store instances on one database file race to claim the same
//! pending note. Each thread owns its own `Database`, standing in for a
//! separate widget process.

use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;

use desktop_notes::storage::database::Database;
use desktop_notes::storage::record_store::RecordStore;
use desktop_notes_core::{NoteStatus, Point};

fn race_claim(path: &Path, id: i64, contenders: usize) -> Vec<bool> {
    let barrier = Arc::new(Barrier::new(contenders));
    let handles: Vec<_> = (0..contenders)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            let db = Database::new(path);
            thread::spawn(move || {
                db.open().unwrap();
                barrier.wait();
                db.claim_pending(id).unwrap()
            })
        })
        .collect();

    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

#[test]
fn test_exactly_one_claimant_wins() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("notes.db");
    let setup = Database::new(&path);
    let id = setup.create_pending(Point::new(300, 100)).unwrap();

    let results = race_claim(&path, id, 8);

    assert_eq!(results.iter().filter(|won| **won).count(), 1);
    assert_eq!(results.iter().filter(|won| !**won).count(), 7);
    assert_eq!(setup.read(id).unwrap().status, NoteStatus::Shown);
}

#[test]
fn test_claim_of_non_pending_note_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("notes.db");
    let setup = Database::new(&path);
    let id = setup.create_pending(Point::new(0, 0)).unwrap();
    setup.set_status(id, NoteStatus::Hidden).unwrap();

    let results = race_claim(&path, id, 4);

    assert!(results.iter().all(|won| !won));
    assert_eq!(setup.read(id).unwrap().status, NoteStatus::Hidden);
}

#[test]
fn test_repeated_races_never_double_claim() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("notes.db");
    let setup = Database::new(&path);

    for round in 0..5 {
        let id = setup.create_pending(Point::new(round, round)).unwrap();
        let results = race_claim(&path, id, 4);
        assert_eq!(results.iter().filter(|won| **won).count(), 1, "round {}", round);
    }
}
