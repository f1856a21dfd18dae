//! Repository for the `journal_entries` table.

use biome_core::types::DbId;
use sqlx::{SqliteExecutor, SqlitePool};

use crate::models::journal::JournalEntry;

const COLUMNS: &str = "id, project_id, entry_text, entry_date, edited_at, edited_by";

/// Provides CRUD operations for project journal entries.
pub struct JournalRepo;

impl JournalRepo {
    /// All entries of a project, newest first.
    pub async fn list_for_project(
        pool: &SqlitePool,
        project_id: DbId,
    ) -> Result<Vec<JournalEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM journal_entries
             WHERE project_id = ?
             ORDER BY entry_date DESC, id DESC"
        );
        sqlx::query_as::<_, JournalEntry>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Find an entry scoped to its project.
    pub async fn find<'e>(
        executor: impl SqliteExecutor<'e>,
        project_id: DbId,
        entry_id: DbId,
    ) -> Result<Option<JournalEntry>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM journal_entries WHERE id = ? AND project_id = ?");
        sqlx::query_as::<_, JournalEntry>(&query)
            .bind(entry_id)
            .bind(project_id)
            .fetch_optional(executor)
            .await
    }

    pub async fn create<'e>(
        executor: impl SqliteExecutor<'e>,
        project_id: DbId,
        entry_text: &str,
    ) -> Result<JournalEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO journal_entries (project_id, entry_text) VALUES (?, ?) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JournalEntry>(&query)
            .bind(project_id)
            .bind(entry_text)
            .fetch_one(executor)
            .await
    }

    /// Replace an entry's text and stamp `edited_at` / `edited_by`.
    pub async fn update_text<'e>(
        executor: impl SqliteExecutor<'e>,
        project_id: DbId,
        entry_id: DbId,
        entry_text: &str,
        edited_by: Option<&str>,
    ) -> Result<Option<JournalEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE journal_entries
             SET entry_text = ?, edited_at = datetime('now'), edited_by = ?
             WHERE id = ? AND project_id = ?
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JournalEntry>(&query)
            .bind(entry_text)
            .bind(edited_by)
            .bind(entry_id)
            .bind(project_id)
            .fetch_optional(executor)
            .await
    }

    pub async fn delete<'e>(
        executor: impl SqliteExecutor<'e>,
        project_id: DbId,
        entry_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM journal_entries WHERE id = ? AND project_id = ?")
            .bind(entry_id)
            .bind(project_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
