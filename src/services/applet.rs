//! Note Applet
//!
//! The per-instance owner of one note. It resolves its identity through the
//! lifecycle coordinator at start, then holds the record, the live style
//! preview and the interaction controller for the rest of the instance's
//! life. Every change to the content path or status is announced to
//! subscribers as a [`ContentChanged`] notification.
//!
//! A failure to resolve the note never aborts the instance; the applet starts
//! in a degraded state instead and refuses note operations.

use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use desktop_notes_core::{
    CursorShape, NoteId, NoteRecord, NoteStatus, NoteStyle, Point, Rect, ResizeHandle,
};

use crate::models::settings::AppConfig;
use crate::services::interaction::{CommitOutcome, InteractionController};
use crate::services::lifecycle::{LifecycleCoordinator, Resolution};
use crate::services::styling::{StyleEditSession, StyleEvent};
use crate::storage::identity::IdentitySlot;
use crate::storage::record_store::RecordStore;
use crate::utils::error::{AppError, AppResult};

/// Sent whenever the note's content path or status changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentChanged {
    pub note_id: NoteId,
    pub filepath: Option<String>,
    pub status: NoteStatus,
}

/// What a primary click on the widget should do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "command", rename_all = "snake_case")]
pub enum PrimaryAction {
    SelectFile,
    OpenInEditor(String),
    /// Clicks belong to the drag/resize gesture
    None,
}

#[derive(Debug)]
struct ActiveNote {
    record: NoteRecord,
    resolution: Resolution,
    live_style: NoteStyle,
    interaction: InteractionController,
}

impl ActiveNote {
    fn new(record: NoteRecord, resolution: Resolution) -> Self {
        Self {
            live_style: record.style.clone(),
            interaction: InteractionController::new(record.bounds()),
            record,
            resolution,
        }
    }

    fn content(&self) -> ContentChanged {
        ContentChanged {
            note_id: self.record.id,
            filepath: self.record.filepath.clone(),
            status: self.record.status,
        }
    }
}

#[derive(Debug)]
enum AppletState {
    Ready(Box<ActiveNote>),
    Degraded { reason: String },
}

pub struct NoteApplet {
    store: Arc<dyn RecordStore>,
    slot: Box<dyn IdentitySlot>,
    config: AppConfig,
    state: AppletState,
    subscribers: Vec<Sender<ContentChanged>>,
}

impl NoteApplet {
    /// Resolve this instance's note and start the applet.
    pub fn start(
        store: Arc<dyn RecordStore>,
        slot: Box<dyn IdentitySlot>,
        config: AppConfig,
    ) -> Self {
        let state = match LifecycleCoordinator::new(store.as_ref(), slot.as_ref()).resolve() {
            Ok(resolved) => {
                info!(
                    note_id = resolved.record.id,
                    resolution = ?resolved.resolution,
                    "Note applet started"
                );
                AppletState::Ready(Box::new(ActiveNote::new(resolved.record, resolved.resolution)))
            }
            Err(e) => {
                error!(error = %e, "Could not resolve note, starting degraded");
                AppletState::Degraded {
                    reason: e.to_string(),
                }
            }
        };

        Self {
            store,
            slot,
            config,
            state,
            subscribers: Vec::new(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.state, AppletState::Degraded { .. })
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        match &self.state {
            AppletState::Degraded { reason } => Some(reason),
            AppletState::Ready(_) => None,
        }
    }

    pub fn note(&self) -> Option<&NoteRecord> {
        self.active().ok().map(|active| &active.record)
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.active().ok().map(|active| active.resolution)
    }

    fn active(&self) -> AppResult<&ActiveNote> {
        match &self.state {
            AppletState::Ready(active) => Ok(&**active),
            AppletState::Degraded { reason } => Err(AppError::storage_unavailable(format!(
                "note unavailable: {}",
                reason
            ))),
        }
    }

    fn active_mut(&mut self) -> AppResult<&mut ActiveNote> {
        match &mut self.state {
            AppletState::Ready(active) => Ok(&mut **active),
            AppletState::Degraded { reason } => Err(AppError::storage_unavailable(format!(
                "note unavailable: {}",
                reason
            ))),
        }
    }

    // ========================================================================
    // Content notifications
    // ========================================================================

    /// Receive a `ContentChanged` for every later path or status change.
    pub fn subscribe(&mut self) -> Receiver<ContentChanged> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self, change: ContentChanged) {
        self.subscribers.retain(|tx| tx.send(change.clone()).is_ok());
    }

    /// Persist a new content path, adopt it, then notify.
    ///
    /// Only the filepath column is written, so a status set from the
    /// management view in the meantime is kept.
    fn commit_filepath(&mut self, filepath: Option<String>) -> AppResult<()> {
        let id = self.active()?.record.id;
        self.store.set_filepath(id, filepath.as_deref())?;
        let change = {
            let active = self.active_mut()?;
            active.record.filepath = filepath;
            active.content()
        };
        self.notify(change);
        Ok(())
    }

    // ========================================================================
    // Note actions
    // ========================================================================

    /// Bind an absolute content path.
    pub fn bind_file(&mut self, path: impl AsRef<Path>) -> AppResult<()> {
        let path = path.as_ref();
        if !path.is_absolute() {
            return Err(AppError::validation(format!(
                "content path must be absolute: {}",
                path.display()
            )));
        }
        let path = path
            .to_str()
            .ok_or_else(|| AppError::validation("content path is not valid UTF-8"))?
            .to_string();

        self.commit_filepath(Some(path))?;
        info!(note_id = self.active()?.record.id, "Content path bound");
        Ok(())
    }

    pub fn clear_file(&mut self) -> AppResult<()> {
        self.commit_filepath(None)
    }

    pub fn hide(&mut self) -> AppResult<()> {
        self.set_status(NoteStatus::Hidden)
    }

    pub fn show(&mut self) -> AppResult<()> {
        self.set_status(NoteStatus::Shown)
    }

    fn set_status(&mut self, status: NoteStatus) -> AppResult<()> {
        let id = self.active()?.record.id;
        self.store.set_status(id, status)?;
        let change = {
            let active = self.active_mut()?;
            active.record.status = status;
            active.content()
        };
        self.notify(change);
        Ok(())
    }

    /// Re-read the record from the store, discarding unsaved live state.
    pub fn reload(&mut self) -> AppResult<()> {
        let id = self.active()?.record.id;
        let record = self.store.read(id)?;

        let changed = {
            let active = self.active_mut()?;
            let changed = active.record.filepath != record.filepath
                || active.record.status != record.status;
            active.interaction.set_geometry(record.bounds());
            active.live_style = record.style.clone();
            active.record = record;
            changed.then(|| active.content())
        };
        if let Some(change) = changed {
            self.notify(change);
        }
        Ok(())
    }

    /// Delete the note and forget this instance's identity.
    pub fn delete(self) -> AppResult<bool> {
        let id = self.active()?.record.id;
        let existed = self.store.delete(id)?;
        self.slot.clear()?;
        info!(note_id = id, existed, "Note deleted");
        Ok(existed)
    }

    /// Deposit a pending note to the right of this one for a new instance to adopt.
    pub fn request_new_note(&self) -> AppResult<NoteId> {
        let bounds = self.active()?.interaction.geometry();
        let position = Point::new(bounds.right() + self.config.new_note_spacing, bounds.top());
        let id = self.store.create_pending(position)?;
        info!(note_id = id, x = position.x, y = position.y, "Requested new note");
        Ok(id)
    }

    // ========================================================================
    // Styling
    // ========================================================================

    pub fn begin_style_edit(&self) -> AppResult<StyleEditSession> {
        Ok(StyleEditSession::begin(self.active()?.record.style.clone()))
    }

    /// Style currently presented, including an unconfirmed preview
    pub fn live_style(&self) -> Option<&NoteStyle> {
        self.active().ok().map(|active| &active.live_style)
    }

    /// Apply an event from a style edit session.
    ///
    /// Only `Confirmed` writes to the store. If that write fails the stored
    /// style is unchanged and the preview stays as proposed.
    pub fn handle_style_event(&mut self, event: StyleEvent) -> AppResult<()> {
        match event {
            StyleEvent::Proposed { style } => {
                self.active_mut()?.live_style = style;
            }
            StyleEvent::Confirmed { style } => {
                let id = self.active()?.record.id;
                self.store.set_style(id, &style)?;
                let active = self.active_mut()?;
                active.record.style = style.clone();
                active.live_style = style;
                info!(note_id = active.record.id, "Style saved");
            }
            StyleEvent::Cancelled { original } => {
                self.active_mut()?.live_style = original;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Interaction
    // ========================================================================

    pub fn toggle_drag_resize_mode(&mut self) -> AppResult<bool> {
        Ok(self.active_mut()?.interaction.toggle_mode())
    }

    pub fn is_drag_resize_mode(&self) -> bool {
        self.active()
            .map(|active| active.interaction.is_mode_active())
            .unwrap_or(false)
    }

    /// Live bounds of the widget
    pub fn geometry(&self) -> Option<Rect> {
        self.active().ok().map(|active| active.interaction.geometry())
    }

    pub fn pointer_hover(&mut self, pointer: Point) -> CursorShape {
        match self.active_mut() {
            Ok(active) => active.interaction.hover(pointer),
            Err(_) => CursorShape::Default,
        }
    }

    pub fn pointer_press(&mut self, pointer: Point) -> ResizeHandle {
        match self.active_mut() {
            Ok(active) => active.interaction.press(pointer),
            Err(_) => ResizeHandle::None,
        }
    }

    pub fn pointer_move(&mut self, pointer: Point) -> Option<Rect> {
        self.active_mut()
            .ok()
            .and_then(|active| active.interaction.move_to(pointer))
    }

    pub fn pointer_release(&mut self, pointer: Point) -> Option<CommitOutcome> {
        let store = Arc::clone(&self.store);
        let active = self.active_mut().ok()?;
        let outcome = active
            .interaction
            .release(pointer, &mut active.record, store.as_ref());
        if let Some(CommitOutcome::PersistFailed { error, .. }) = &outcome {
            warn!(error = %error, "Geometry kept in memory only");
        }
        outcome
    }

    pub fn primary_action(&self) -> PrimaryAction {
        let Ok(active) = self.active() else {
            return PrimaryAction::None;
        };
        if active.interaction.is_mode_active() {
            return PrimaryAction::None;
        }
        match active.record.filepath.as_deref() {
            Some(path) if !path.is_empty() => {
                PrimaryAction::OpenInEditor(self.config.editor_command_for(path))
            }
            _ => PrimaryAction::SelectFile,
        }
    }
}

impl std::fmt::Debug for NoteApplet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteApplet")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
