//! BIOME API server library.
//!
//! Exposes config, state, error handling, the activity writer and the
//! router so integration tests and the binary entrypoint share them.

pub mod activity;
pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod routes;
pub mod state;
