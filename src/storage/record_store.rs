//! Record Store Contract
//!
//! The single authority for note persistence. Every widget instance talks to
//! the store through this trait; the SQLite implementation is used in
//! production and the in-memory one stands in for it in tests.

use desktop_notes_core::{NoteId, NoteRecord, NoteStatus, NoteStyle, Point, Rect};

use crate::utils::error::AppResult;

/// Durable CRUD over note records.
///
/// Every method opens the store on first use, so callers never have to call
/// [`RecordStore::open`] first. All mutations are durable before they return
/// `Ok`, and no method retries on failure.
pub trait RecordStore: Send + Sync {
    /// Open the backing medium and create the schema if absent. Idempotent.
    fn open(&self) -> AppResult<()>;

    /// Persist a new record and return its freshly assigned id.
    ///
    /// `record.id` is ignored. Ids are never reused, even after deletion.
    fn create(&self, record: &NoteRecord) -> AppResult<NoteId>;

    /// Fetch a record, or `AppError::NotFound`.
    fn read(&self, id: NoteId) -> AppResult<NoteRecord>;

    /// Replace every column of the row keyed by `record.id`.
    ///
    /// Returns `AppError::NotFound` when no row matched.
    fn update(&self, record: &NoteRecord) -> AppResult<()>;

    /// Remove a row. Returns whether a row existed; a missing id is not an error.
    fn delete(&self, id: NoteId) -> AppResult<bool>;

    /// Every record, in ascending id order.
    fn list_all(&self) -> AppResult<Vec<NoteRecord>>;

    /// Update the status column only.
    fn set_status(&self, id: NoteId, status: NoteStatus) -> AppResult<()>;

    /// Atomically move a record from `PendingPlacement` to `Shown`.
    ///
    /// Returns `true` only for the caller whose write performed the transition.
    fn claim_pending(&self, id: NoteId) -> AppResult<bool>;

    /// Whether the store can currently serve requests
    fn is_healthy(&self) -> bool;

    /// Update the status column from an untyped value.
    ///
    /// Values outside the enumerated set fail with `AppError::InvalidStatus`
    /// and leave the stored row untouched.
    fn set_status_raw(&self, id: NoteId, status: &str) -> AppResult<()> {
        let status = NoteStatus::parse(status)?;
        self.set_status(id, status)
    }

    /// Update the content path only. `None` or an empty path clears it.
    ///
    /// Like the other single-column setters this leaves every other column
    /// as stored, so concurrent writers of other fields are not overwritten.
    fn set_filepath(&self, id: NoteId, filepath: Option<&str>) -> AppResult<()> {
        let mut record = self.read(id)?;
        record.filepath = filepath.filter(|p| !p.is_empty()).map(str::to_string);
        self.update(&record)
    }

    /// Update the style only. An invalid style leaves the row untouched.
    fn set_style(&self, id: NoteId, style: &NoteStyle) -> AppResult<()> {
        style.validate()?;
        let mut record = self.read(id)?;
        record.style = style.clone();
        self.update(&record)
    }

    /// Update position and size only.
    fn set_geometry(&self, id: NoteId, bounds: Rect) -> AppResult<()> {
        let mut record = self.read(id)?;
        record.set_bounds(bounds);
        self.update(&record)
    }

    /// Deposit a default record awaiting adoption at `position`.
    fn create_pending(&self, position: Point) -> AppResult<NoteId> {
        self.create(&NoteRecord::pending_at(position))
    }
}
