//! Repository for the `groups` table.

use biome_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::group::Group;

const COLUMNS: &str = "id, name, description, created_at";

/// Provides CRUD operations for groups.
pub struct GroupRepo;

impl GroupRepo {
    /// List all groups ordered by name.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM groups ORDER BY name ASC");
        sqlx::query_as::<_, Group>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM groups WHERE id = ?");
        sqlx::query_as::<_, Group>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new group. A duplicate name surfaces as a unique violation.
    pub async fn create(
        pool: &SqlitePool,
        name: &str,
        description: Option<&str>,
    ) -> Result<Group, sqlx::Error> {
        let query = format!(
            "INSERT INTO groups (name, description) VALUES (?, ?) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(name)
            .bind(description)
            .fetch_one(pool)
            .await
    }

    /// Replace a group's name and description.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        name: &str,
        description: Option<&str>,
    ) -> Result<Option<Group>, sqlx::Error> {
        let query = format!(
            "UPDATE groups SET name = ?, description = ? WHERE id = ? RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Group>(&query)
            .bind(name)
            .bind(description)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a group. Members keep their rows with `group_id` cleared.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM groups WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
