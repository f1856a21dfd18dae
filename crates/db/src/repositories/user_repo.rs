//! Repository for the `users` table.

use biome_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::user::User;

/// Select list joining each user's group name.
const SELECT: &str = "SELECT u.id, u.name, u.email, u.group_id, g.name AS group_name, u.created_at
     FROM users u
     LEFT JOIN groups g ON g.id = u.group_id";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// List all users ordered by name.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("{SELECT} ORDER BY u.name ASC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// List the members of a group ordered by name.
    pub async fn list_by_group(pool: &SqlitePool, group_id: DbId) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("{SELECT} WHERE u.group_id = ? ORDER BY u.name ASC");
        sqlx::query_as::<_, User>(&query)
            .bind(group_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("{SELECT} WHERE u.id = ?");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a user and return it with its group name resolved.
    pub async fn create(
        pool: &SqlitePool,
        name: &str,
        email: Option<&str>,
        group_id: Option<DbId>,
    ) -> Result<User, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO users (name, email, group_id) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(name)
        .bind(email)
        .bind(group_id)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Replace a user's name, email and group.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        name: &str,
        email: Option<&str>,
        group_id: Option<DbId>,
    ) -> Result<Option<User>, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET name = ?, email = ?, group_id = ? WHERE id = ?")
            .bind(name)
            .bind(email)
            .bind(group_id)
            .bind(id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    /// Delete a user. Owned projects keep their rows with `user_id` cleared.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
