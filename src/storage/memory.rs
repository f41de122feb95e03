//! In-Memory Record Store
//!
//! A `RecordStore` over a `BTreeMap`, used by tests and by anything that wants
//! the store contract without a database file. It can be switched into an
//! unavailable state to exercise storage failure paths.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use desktop_notes_core::{NoteId, NoteRecord, NoteStatus, NoteStyle, Rect};

use crate::storage::record_store::RecordStore;
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Default)]
struct MemoryState {
    last_id: NoteId,
    notes: BTreeMap<NoteId, NoteRecord>,
}

#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    state: Mutex<MemoryState>,
    unavailable: AtomicBool,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StorageUnavailable` (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, MemoryState>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::storage_unavailable("in-memory store marked unavailable"));
        }
        self.state
            .lock()
            .map_err(|_| AppError::internal("in-memory store lock poisoned"))
    }

    /// Apply `change` to one stored record under the lock.
    fn modify(&self, id: NoteId, change: impl FnOnce(&mut NoteRecord)) -> AppResult<()> {
        let mut state = self.lock()?;
        match state.notes.get_mut(&id) {
            Some(note) => {
                change(note);
                Ok(())
            }
            None => Err(AppError::not_found(format!("note {}", id))),
        }
    }
}

impl RecordStore for InMemoryRecordStore {
    fn open(&self) -> AppResult<()> {
        self.lock().map(|_| ())
    }

    fn create(&self, record: &NoteRecord) -> AppResult<NoteId> {
        record.style.validate()?;
        let mut state = self.lock()?;
        state.last_id += 1;
        let id = state.last_id;
        state.notes.insert(
            id,
            NoteRecord {
                id,
                filepath: record.filepath.clone().filter(|p| !p.is_empty()),
                ..record.clone()
            },
        );
        Ok(id)
    }

    fn read(&self, id: NoteId) -> AppResult<NoteRecord> {
        self.lock()?
            .notes
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("note {}", id)))
    }

    fn update(&self, record: &NoteRecord) -> AppResult<()> {
        if !record.is_assigned() {
            return Err(AppError::validation("cannot update a note without an id"));
        }
        record.style.validate()?;
        let mut state = self.lock()?;
        match state.notes.get_mut(&record.id) {
            Some(stored) => {
                *stored = NoteRecord {
                    filepath: record.filepath.clone().filter(|p| !p.is_empty()),
                    ..record.clone()
                };
                Ok(())
            }
            None => Err(AppError::not_found(format!("note {}", record.id))),
        }
    }

    fn delete(&self, id: NoteId) -> AppResult<bool> {
        Ok(self.lock()?.notes.remove(&id).is_some())
    }

    fn list_all(&self) -> AppResult<Vec<NoteRecord>> {
        Ok(self.lock()?.notes.values().cloned().collect())
    }

    fn set_status(&self, id: NoteId, status: NoteStatus) -> AppResult<()> {
        self.modify(id, |note| note.status = status)
    }

    fn set_filepath(&self, id: NoteId, filepath: Option<&str>) -> AppResult<()> {
        let filepath = filepath.filter(|p| !p.is_empty()).map(str::to_string);
        self.modify(id, |note| note.filepath = filepath)
    }

    fn set_style(&self, id: NoteId, style: &NoteStyle) -> AppResult<()> {
        style.validate()?;
        self.modify(id, |note| note.style = style.clone())
    }

    fn set_geometry(&self, id: NoteId, bounds: Rect) -> AppResult<()> {
        self.modify(id, |note| note.set_bounds(bounds))
    }

    fn claim_pending(&self, id: NoteId) -> AppResult<bool> {
        let mut state = self.lock()?;
        match state.notes.get_mut(&id) {
            Some(note) if note.status == NoteStatus::PendingPlacement => {
                note.status = NoteStatus::Shown;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn is_healthy(&self) -> bool {
        self.lock().is_ok()
    }
}
