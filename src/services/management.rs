//! Management Listing
//!
//! Snapshot of every note for the management view. Rows are addressed by
//! their index in the snapshot, which stays stable until the next fetch.

use tracing::info;

use desktop_notes_core::{NoteRecord, NoteStatus};

use crate::storage::record_store::RecordStore;
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
pub struct NoteListing {
    entries: Vec<NoteRecord>,
}

impl NoteListing {
    /// Fetch a fresh snapshot in ascending id order.
    pub fn fetch(store: &dyn RecordStore) -> AppResult<Self> {
        Ok(Self {
            entries: store.list_all()?,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[NoteRecord] {
        &self.entries
    }

    pub fn get_note_at(&self, index: usize) -> Option<&NoteRecord> {
        self.entries.get(index)
    }

    /// Flip the row at `index` between shown and hidden, persist it and
    /// return the new status.
    pub fn toggle_status_at(
        &mut self,
        index: usize,
        store: &dyn RecordStore,
    ) -> AppResult<NoteStatus> {
        let entry = self
            .entries
            .get_mut(index)
            .ok_or_else(|| AppError::not_found(format!("listing row {}", index)))?;

        let next = entry.status.toggled().ok_or_else(|| {
            AppError::validation(format!(
                "note {} is awaiting placement and cannot be toggled",
                entry.id
            ))
        })?;

        store.set_status(entry.id, next)?;
        entry.status = next;
        info!(note_id = entry.id, status = %next, "Note status toggled");
        Ok(next)
    }
}
