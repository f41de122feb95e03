//! Services
//!
//! Business logic for a single note instance and for the management view.
//! Services are handed a record store explicitly and are called by commands.

pub mod applet;
pub mod interaction;
pub mod lifecycle;
pub mod management;
pub mod styling;

pub use applet::{ContentChanged, NoteApplet, PrimaryAction};
pub use interaction::{CommitOutcome, DragGesture, InteractionController, InteractionState};
pub use lifecycle::{LifecycleCoordinator, Resolution, ResolvedNote};
pub use management::NoteListing;
pub use styling::{StyleEdit, StyleEditSession, StyleEvent};
