//! Domain logic for BIOME project tracking.
//!
//! Change tracking, the activity presenter and the export writers. No I/O
//! beyond in-memory buffers; the db and api crates build on it.

pub mod activity;
pub mod activity_format;
pub mod change_tracking;
pub mod error;
pub mod export;
pub mod types;
pub mod validation;
