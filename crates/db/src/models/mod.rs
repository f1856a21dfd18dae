//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO for edits

pub mod activity;
pub mod group;
pub mod journal;
pub mod project;
pub mod user;
