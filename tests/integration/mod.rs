//! Integration Tests Module
//!
//! End-to-end tests of the note backend against real SQLite files:
//! record store contract, concurrent claiming across independent store
//! instances, instance startup resolution, drag/resize commits, and the
//! applet's styling and note actions.

// Record store contract tests
mod store_test;

// Concurrent claim tests (one store instance per thread)
mod claim_race_test;


// Drag/resize interaction tests
mod interaction_test;

// Note applet and command tests
mod applet_test;
