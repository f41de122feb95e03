//! Drag/Resize Interaction Tests
//!
//! Full gestures through the interaction controller, committed to a SQLite
//! database file.

use desktop_notes::services::interaction::{CommitOutcome, InteractionController};
use desktop_notes::storage::database::Database;
use desktop_notes::storage::record_store::RecordStore;
use desktop_notes_core::{
    NoteRecord, Point, Rect, ResizeHandle, HANDLE_MARGIN, MIN_HEIGHT, MIN_WIDTH,
};

const START: Rect = Rect::new(100, 100, 200, 150);

fn stored_note(db: &Database) -> NoteRecord {
    let mut record = NoteRecord::default();
    record.set_bounds(START);
    let id = db.create(&record).unwrap();
    db.read(id).unwrap()
}

/// A pointer inside the region of `handle` for `START`
fn grab_point(handle: ResizeHandle) -> Point {
    let m = HANDLE_MARGIN / 2;
    let (l, t, r, b) = (START.left(), START.top(), START.right() - 1, START.bottom() - 1);
    let (cx, cy) = (START.x + START.width / 2, START.y + START.height / 2);
    match handle {
        ResizeHandle::TopLeft => Point::new(l + m, t + m),
        ResizeHandle::Top => Point::new(cx, t + m),
        ResizeHandle::TopRight => Point::new(r - m, t + m),
        ResizeHandle::Left => Point::new(l + m, cy),
        ResizeHandle::Right => Point::new(r - m, cy),
        ResizeHandle::BottomLeft => Point::new(l + m, b - m),
        ResizeHandle::Bottom => Point::new(cx, b - m),
        ResizeHandle::BottomRight => Point::new(r - m, b - m),
        ResizeHandle::Body | ResizeHandle::None => Point::new(cx, cy),
    }
}

fn gesture(db: &Database, handle: ResizeHandle, delta: Point) -> (NoteRecord, CommitOutcome) {
    let mut record = stored_note(db);
    let mut controller = InteractionController::new(record.bounds());
    controller.set_mode(true);

    let start = grab_point(handle);
    assert_eq!(controller.press(start), handle);
    controller.move_to(Point::new(start.x + delta.x / 2, start.y + delta.y / 2));
    let outcome = controller
        .release(
            Point::new(start.x + delta.x, start.y + delta.y),
            &mut record,
            db,
        )
        .unwrap();
    (record, outcome)
}

#[test]
fn test_top_left_shrink_clamps_against_fixed_corner() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db = Database::new(temp_dir.path().join("notes.db"));

    let (record, outcome) = gesture(&db, ResizeHandle::TopLeft, Point::new(1000, 1000));
    let committed = outcome.geometry();

    assert!(outcome.is_persisted());
    assert_eq!(committed.width, MIN_WIDTH);
    assert_eq!(committed.height, MIN_HEIGHT);
    assert_eq!(committed.right(), START.right());
    assert_eq!(committed.bottom(), START.bottom());
    assert_eq!(db.read(record.id).unwrap().bounds(), committed);
}

#[test]
fn test_top_left_outward_drag_grows() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db = Database::new(temp_dir.path().join("notes.db"));

    let (record, outcome) = gesture(&db, ResizeHandle::TopLeft, Point::new(-1000, -1000));
    assert_eq!(outcome.geometry(), Rect::new(-900, -900, 1200, 1150));
    assert_eq!(db.read(record.id).unwrap().bounds(), Rect::new(-900, -900, 1200, 1150));
}

#[test]
fn test_committed_geometry_never_below_minimum() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db = Database::new(temp_dir.path().join("notes.db"));
    let handles = [
        ResizeHandle::TopLeft,
        ResizeHandle::Top,
        ResizeHandle::TopRight,
        ResizeHandle::Left,
        ResizeHandle::Right,
        ResizeHandle::BottomLeft,
        ResizeHandle::Bottom,
        ResizeHandle::BottomRight,
    ];
    let deltas = [-2000, -180, -1, 0, 1, 180, 2000];

    for handle in handles {
        for dx in deltas {
            for dy in deltas {
                let (record, outcome) = gesture(&db, handle, Point::new(dx, dy));
                let stored = db.read(record.id).unwrap();
                assert!(
                    stored.size.width >= MIN_WIDTH && stored.size.height >= MIN_HEIGHT,
                    "{:?} by ({}, {}) committed {:?}",
                    handle,
                    dx,
                    dy,
                    outcome.geometry()
                );
            }
        }
    }
}

#[test]
fn test_edges_only_move_their_own_axis() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db = Database::new(temp_dir.path().join("notes.db"));

    let (_, outcome) = gesture(&db, ResizeHandle::Right, Point::new(40, 70));
    assert_eq!(outcome.geometry(), Rect::new(100, 100, 240, 150));

    let (_, outcome) = gesture(&db, ResizeHandle::Top, Point::new(40, -20));
    assert_eq!(outcome.geometry(), Rect::new(100, 80, 200, 170));
}

#[test]
fn test_one_write_per_gesture() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db = Database::new(temp_dir.path().join("notes.db"));
    let mut record = stored_note(&db);
    let mut controller = InteractionController::new(record.bounds());
    controller.set_mode(true);

    controller.press(Point::new(150, 150));
    for step in 1..20 {
        controller.move_to(Point::new(150 + step, 150));
        assert_eq!(db.read(record.id).unwrap().bounds(), START);
    }
    controller.release(Point::new(170, 150), &mut record, &db);
    assert_eq!(db.read(record.id).unwrap().position, Point::new(120, 100));
}
