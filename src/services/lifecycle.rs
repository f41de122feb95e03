//! Lifecycle Coordinator
//!
//! Decides which note a freshly started widget instance represents.
//!
//! An instance with a remembered id simply reloads that record. Otherwise it
//! scans for records left in `PendingPlacement` by a "new note" request and
//! tries to claim them oldest first; the store's guarded update is the only
//! mutual exclusion between competing instances. If nothing can be claimed a
//! brand-new default record is created. Whatever the outcome, the resolved id
//! is written to the instance's identity slot exactly once.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use desktop_notes_core::{NoteId, NoteRecord, NoteStatus};

use crate::storage::identity::IdentitySlot;
use crate::storage::record_store::RecordStore;
use crate::utils::error::{AppError, AppResult};

/// How an instance came to own its note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// The identity slot already named an existing record
    Remembered,
    /// A pending record was claimed
    Adopted,
    /// No pending record was available, so a new one was created
    Created,
}

/// The note an instance ended up with
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedNote {
    pub record: NoteRecord,
    pub resolution: Resolution,
}

pub struct LifecycleCoordinator<'a> {
    store: &'a dyn RecordStore,
    slot: &'a dyn IdentitySlot,
}

impl<'a> LifecycleCoordinator<'a> {
    pub fn new(store: &'a dyn RecordStore, slot: &'a dyn IdentitySlot) -> Self {
        Self { store, slot }
    }

    /// Resolve this instance's note.
    ///
    /// Storage failures are returned to the caller and never retried here.
    pub fn resolve(&self) -> AppResult<ResolvedNote> {
        if let Some(record) = self.load_remembered()? {
            info!(note_id = record.id, "Reusing remembered note");
            return Ok(ResolvedNote {
                record,
                resolution: Resolution::Remembered,
            });
        }

        let resolved = match self.adopt_pending()? {
            Some(record) => {
                info!(note_id = record.id, "Adopted pending note");
                ResolvedNote {
                    record,
                    resolution: Resolution::Adopted,
                }
            }
            None => {
                let template = NoteRecord::default();
                let id = self.store.create(&template)?;
                info!(note_id = id, "No pending note available, created a new one");
                ResolvedNote {
                    record: NoteRecord { id, ..template },
                    resolution: Resolution::Created,
                }
            }
        };

        self.slot.store(resolved.record.id)?;
        Ok(resolved)
    }

    fn load_remembered(&self) -> AppResult<Option<NoteRecord>> {
        let id = match self.slot.load() {
            Ok(Some(id)) => id,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!(error = %e, "Unreadable identity slot, treating as unresolved");
                return Ok(None);
            }
        };

        match self.store.read(id) {
            Ok(record) => Ok(Some(record)),
            Err(AppError::NotFound(_)) => {
                warn!(note_id = id, "Remembered note no longer exists");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Claim the oldest pending record that is still claimable.
    fn adopt_pending(&self) -> AppResult<Option<NoteRecord>> {
        let candidates = self
            .store
            .list_all()?
            .into_iter()
            .filter(|note| note.status == NoteStatus::PendingPlacement);

        for candidate in candidates {
            match self.try_claim(candidate.id) {
                Ok(()) => match self.store.read(candidate.id) {
                    Ok(record) => return Ok(Some(record)),
                    Err(AppError::NotFound(_)) => {
                        debug!(note_id = candidate.id, "Claimed note deleted before it was read");
                    }
                    Err(e) => return Err(e),
                },
                Err(AppError::ClaimConflict(id)) => {
                    debug!(note_id = id, "Lost claim, continuing scan");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(None)
    }

    fn try_claim(&self, id: NoteId) -> AppResult<()> {
        if self.store.claim_pending(id)? {
            Ok(())
        } else {
            Err(AppError::ClaimConflict(id))
        }
    }
}
