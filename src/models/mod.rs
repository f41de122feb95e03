//! Data Models
//!
//! Contains the data structures exchanged with the host.

pub mod response;
pub mod settings;

pub use response::*;
pub use settings::*;
