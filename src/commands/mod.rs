//! Commands
//!
//! Host-facing command handlers. These are the entry points the shell (or the
//! CLI in `main.rs`) calls.

pub mod notes;
pub mod settings;

pub use notes::*;
pub use settings::*;
