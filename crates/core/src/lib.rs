//! Desktop Notes Core
//!
//! Domain types shared by every part of the Desktop Notes workspace. This crate
//! has no storage, logging, or host dependencies.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `note` - Note records, status values, and the style blob
//! - `geometry` - Rectangles, resize handles, hit-testing, and constrained resize

pub mod error;
pub mod geometry;
pub mod note;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Note Model ─────────────────────────────────────────────────────────
pub use note::{is_hex_rgb, NoteId, NoteRecord, NoteStatus, NoteStyle, UNASSIGNED_NOTE_ID};

// ── Geometry ───────────────────────────────────────────────────────────
pub use geometry::{
    CursorShape, Point, Rect, ResizeHandle, Size, HANDLE_MARGIN, MIN_HEIGHT, MIN_WIDTH,
};
