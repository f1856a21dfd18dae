//! Group entity model and DTOs.

use biome_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `groups` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Group {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating or replacing a group. `name` is validated by the handler.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupInput {
    pub name: Option<String>,
    pub description: Option<String>,
}
