//! Journal entry model and DTOs.

use biome_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `journal_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JournalEntry {
    pub id: DbId,
    pub project_id: DbId,
    pub entry_text: String,
    pub entry_date: Timestamp,
    pub edited_at: Option<Timestamp>,
    pub edited_by: Option<String>,
}

/// DTO for adding a journal entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJournalEntry {
    pub entry_text: Option<String>,
}

/// DTO for editing a journal entry.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateJournalEntry {
    pub entry_text: Option<String>,
    pub edited_by: Option<String>,
}
