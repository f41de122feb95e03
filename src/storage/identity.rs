//! Remembered Identity Slots
//!
//! Each widget instance remembers which note it represents across restarts.
//! The host environment owns that storage; these slots stand in for it. A
//! slot holding `-1` or nothing at all means the identity is unresolved.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use desktop_notes_core::{NoteId, UNASSIGNED_NOTE_ID};

use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{ensure_parent_dir, identity_dir};

/// Per-instance storage of the resolved note id.
pub trait IdentitySlot: Send + Sync {
    /// The remembered id, or `None` when unresolved.
    fn load(&self) -> AppResult<Option<NoteId>>;

    /// Remember `id` durably.
    fn store(&self, id: NoteId) -> AppResult<()>;

    /// Forget the remembered id.
    fn clear(&self) -> AppResult<()>;
}

fn resolved(id: NoteId) -> Option<NoteId> {
    (id != UNASSIGNED_NOTE_ID).then_some(id)
}

#[derive(Debug, Serialize, Deserialize)]
struct SlotFile {
    #[serde(rename = "noteId")]
    note_id: NoteId,
}

/// Identity slot persisted as a small JSON file.
#[derive(Debug, Clone)]
pub struct FileIdentitySlot {
    path: PathBuf,
}

impl FileIdentitySlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Slot for a named instance under the default identity directory
    pub fn for_instance(instance: &str) -> AppResult<Self> {
        Self::for_instance_in(identity_dir()?, instance)
    }

    /// Slot for a named instance under `dir`
    pub fn for_instance_in(dir: impl AsRef<Path>, instance: &str) -> AppResult<Self> {
        let valid = !instance.is_empty()
            && instance
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AppError::validation(format!(
                "Invalid instance name: '{}'",
                instance
            )));
        }
        Ok(Self::new(dir.as_ref().join(format!("{}.json", instance))))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentitySlot for FileIdentitySlot {
    fn load(&self) -> AppResult<Option<NoteId>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let slot: SlotFile = serde_json::from_str(&content)?;
        Ok(resolved(slot.note_id))
    }

    fn store(&self, id: NoteId) -> AppResult<()> {
        ensure_parent_dir(&self.path)?;
        let content = serde_json::to_string_pretty(&SlotFile { note_id: id })?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Identity slot held in memory; counts writes so tests can check the
/// coordinator stores exactly once per resolution.
#[derive(Debug, Default)]
pub struct MemoryIdentitySlot {
    id: Mutex<Option<NoteId>>,
    stores: AtomicUsize,
}

impl MemoryIdentitySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: NoteId) -> Self {
        Self {
            id: Mutex::new(resolved(id)),
            stores: AtomicUsize::new(0),
        }
    }

    /// Number of `store` calls so far
    pub fn store_count(&self) -> usize {
        self.stores.load(Ordering::SeqCst)
    }
}

impl IdentitySlot for MemoryIdentitySlot {
    fn load(&self) -> AppResult<Option<NoteId>> {
        self.id
            .lock()
            .map(|id| *id)
            .map_err(|_| AppError::internal("identity slot lock poisoned"))
    }

    fn store(&self, id: NoteId) -> AppResult<()> {
        let mut slot = self
            .id
            .lock()
            .map_err(|_| AppError::internal("identity slot lock poisoned"))?;
        *slot = resolved(id);
        self.stores.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        let mut slot = self
            .id
            .lock()
            .map_err(|_| AppError::internal("identity slot lock poisoned"))?;
        *slot = None;
        Ok(())
    }
}
