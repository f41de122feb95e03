//! Storage Layer
//!
//! Handles all data persistence: the note record store (SQLite and in-memory),
//! per-instance identity slots, and the JSON config.

pub mod config;
pub mod database;
pub mod identity;
pub mod memory;
pub mod record_store;

pub use config::*;
pub use database::*;
pub use identity::*;
pub use memory::*;
pub use record_store::*;
