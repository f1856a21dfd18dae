//! User entity model and DTOs.

use biome_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table joined with its group's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: Option<String>,
    pub group_id: Option<DbId>,
    pub group_name: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating or replacing a user. `name` is validated by the handler.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub group_id: Option<DbId>,
}
