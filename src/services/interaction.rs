//! Interaction Controller
//!
//! Per-instance drag/resize state machine. While the mode is on, pointer
//! positions are hit-tested against the widget's handles; a press on a handle
//! starts a gesture, moves recompute the live bounds from the geometry
//! captured at press time, and the release commits the final bounds through
//! the record store with a single `update`.

use tracing::{debug, warn};

use desktop_notes_core::{CursorShape, NoteRecord, Point, Rect, ResizeHandle};

use crate::storage::record_store::RecordStore;
use crate::utils::error::AppError;

/// A gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragGesture {
    pub handle: ResizeHandle,
    pub start_pointer: Point,
    pub start_geometry: Rect,
}

impl DragGesture {
    /// Bounds for the pointer at `pointer`, always derived from the start geometry
    pub fn geometry_at(&self, pointer: Point) -> Rect {
        self.handle
            .apply(self.start_geometry, pointer.delta_from(self.start_pointer))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    /// Mode off; pointer events are ignored
    Idle,
    /// Mode on with no gesture; `hovered` is the handle under the pointer
    Active { hovered: ResizeHandle },
    Dragging(DragGesture),
}

/// Result of committing a finished gesture
#[derive(Debug)]
pub enum CommitOutcome {
    Persisted(Rect),
    /// The write failed; the in-memory geometry was kept regardless
    PersistFailed { geometry: Rect, error: AppError },
}

impl CommitOutcome {
    pub fn geometry(&self) -> Rect {
        match self {
            CommitOutcome::Persisted(geometry) => *geometry,
            CommitOutcome::PersistFailed { geometry, .. } => *geometry,
        }
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, CommitOutcome::Persisted(_))
    }
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    state: InteractionState,
    geometry: Rect,
}

impl InteractionController {
    pub fn new(geometry: Rect) -> Self {
        Self {
            state: InteractionState::Idle,
            geometry,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Live bounds, including any uncommitted gesture
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// Replace the live bounds, abandoning any gesture in progress.
    pub fn set_geometry(&mut self, geometry: Rect) {
        self.abandon_drag();
        self.geometry = geometry;
    }

    pub fn is_mode_active(&self) -> bool {
        !matches!(self.state, InteractionState::Idle)
    }

    /// Flip drag/resize mode and return whether it is now on.
    pub fn toggle_mode(&mut self) -> bool {
        let active = !self.is_mode_active();
        self.set_mode(active);
        active
    }

    /// Turn the mode on or off. Either way an in-progress drag is discarded
    /// and the live bounds return to where the gesture started.
    pub fn set_mode(&mut self, active: bool) {
        self.abandon_drag();
        self.state = if active {
            InteractionState::Active {
                hovered: ResizeHandle::None,
            }
        } else {
            InteractionState::Idle
        };
        debug!(active, "Drag/resize mode changed");
    }

    fn abandon_drag(&mut self) {
        if let InteractionState::Dragging(gesture) = self.state {
            debug!(handle = ?gesture.handle, "Discarding drag in progress");
            self.geometry = gesture.start_geometry;
            self.state = InteractionState::Active {
                hovered: ResizeHandle::None,
            };
        }
    }

    /// Track the pointer and return the cursor the renderer should show.
    pub fn hover(&mut self, pointer: Point) -> CursorShape {
        if let InteractionState::Active { hovered } = &mut self.state {
            *hovered = ResizeHandle::hit_test(self.geometry, pointer);
        }
        self.cursor()
    }

    pub fn cursor(&self) -> CursorShape {
        self.current_handle().cursor()
    }

    /// The handle under the pointer, or the one being dragged
    pub fn current_handle(&self) -> ResizeHandle {
        match self.state {
            InteractionState::Idle => ResizeHandle::None,
            InteractionState::Active { hovered } => hovered,
            InteractionState::Dragging(gesture) => gesture.handle,
        }
    }

    /// Start a gesture if the pointer is over a handle.
    ///
    /// Returns the handle that was grabbed, `ResizeHandle::None` otherwise.
    pub fn press(&mut self, pointer: Point) -> ResizeHandle {
        if !matches!(self.state, InteractionState::Active { .. }) {
            return ResizeHandle::None;
        }

        let handle = ResizeHandle::hit_test(self.geometry, pointer);
        self.state = match handle {
            ResizeHandle::None => InteractionState::Active { hovered: handle },
            _ => InteractionState::Dragging(DragGesture {
                handle,
                start_pointer: pointer,
                start_geometry: self.geometry,
            }),
        };
        handle
    }

    /// Update the live bounds for a pointer move during a gesture.
    pub fn move_to(&mut self, pointer: Point) -> Option<Rect> {
        match self.state {
            InteractionState::Dragging(gesture) => {
                self.geometry = gesture.geometry_at(pointer);
                Some(self.geometry)
            }
            _ => None,
        }
    }

    /// Finish a gesture: write the final bounds into `record` and persist
    /// only its position and size.
    ///
    /// Returns `None` when no gesture was in progress. A failed write is
    /// reported in the outcome and logged; it does not roll back the bounds.
    pub fn release(
        &mut self,
        pointer: Point,
        record: &mut NoteRecord,
        store: &dyn RecordStore,
    ) -> Option<CommitOutcome> {
        let InteractionState::Dragging(gesture) = self.state else {
            return None;
        };

        let geometry = gesture.geometry_at(pointer);
        self.geometry = geometry;
        self.state = InteractionState::Active {
            hovered: ResizeHandle::None,
        };
        record.set_bounds(geometry);

        match store.set_geometry(record.id, geometry) {
            Ok(()) => {
                debug!(note_id = record.id, ?geometry, "Committed geometry");
                Some(CommitOutcome::Persisted(geometry))
            }
            Err(error) => {
                warn!(note_id = record.id, error = %error, "Failed to persist geometry");
                Some(CommitOutcome::PersistFailed { geometry, error })
            }
        }
    }
}
