//! Repository for the `projects` table and its `project_users` assignments.

use biome_core::types::DbId;
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

use crate::models::project::{ColumnValue, NewProject, Project, ProjectDetail, ProjectPatch};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, status, software, time_spent_minutes, \
     creation_date, last_updated, start_date, project_path, folder_created, \
     readme_last_updated, user_id, image_types, sample_type, \
     objective_magnification, analysis_goal";

/// Detail select: project columns plus the owner and the owner's group.
const DETAIL_SELECT: &str = "SELECT p.id, p.name, p.description, p.status, p.software, \
     p.time_spent_minutes, p.creation_date, p.last_updated, p.start_date, p.project_path, \
     p.folder_created, p.readme_last_updated, p.user_id, p.image_types, p.sample_type, \
     p.objective_magnification, p.analysis_goal, \
     u.name AS user_name, u.email AS user_email, g.name AS group_name, g.id AS group_id \
     FROM projects p \
     LEFT JOIN users u ON u.id = p.user_id \
     LEFT JOIN groups g ON g.id = u.group_id";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create<'e>(
        executor: impl SqliteExecutor<'e>,
        input: &NewProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (
                name, description, status, software, time_spent_minutes, project_path,
                folder_created, readme_last_updated, start_date, user_id, image_types,
                sample_type, objective_magnification, analysis_goal
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.status)
            .bind(&input.software)
            .bind(input.time_spent_minutes)
            .bind(&input.project_path)
            .bind(input.folder_created)
            .bind(&input.readme_last_updated)
            .bind(&input.start_date)
            .bind(input.user_id)
            .bind(&input.image_types)
            .bind(&input.sample_type)
            .bind(&input.objective_magnification)
            .bind(&input.analysis_goal)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = ?");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a project with its owner and group names.
    pub async fn find_detail<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
    ) -> Result<Option<ProjectDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE p.id = ?");
        sqlx::query_as::<_, ProjectDetail>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List all projects, most recently touched first.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<ProjectDetail>, sqlx::Error> {
        let query =
            format!("{DETAIL_SELECT} ORDER BY p.last_updated DESC, p.creation_date DESC, p.id DESC");
        sqlx::query_as::<_, ProjectDetail>(&query)
            .fetch_all(pool)
            .await
    }

    /// Projects owned by a user.
    pub async fn list_by_user(pool: &SqlitePool, user_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE user_id = ? ORDER BY last_updated DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Write the patched columns and bump `last_updated`.
    ///
    /// The caller skips empty patches; an empty patch here only bumps the
    /// timestamp. Returns `None` if no row with the given `id` exists.
    pub async fn apply_patch<'e>(
        executor: impl SqliteExecutor<'e>,
        id: DbId,
        patch: &ProjectPatch,
    ) -> Result<Option<Project>, sqlx::Error> {
        let mut sets: Vec<String> = patch
            .columns()
            .iter()
            .map(|(column, _)| format!("{column} = ?"))
            .collect();
        sets.push("last_updated = datetime('now')".to_string());

        let query = format!(
            "UPDATE projects SET {} WHERE id = ? RETURNING {COLUMNS}",
            sets.join(", ")
        );

        let mut q = sqlx::query_as::<_, Project>(&query);
        for (_, value) in patch.columns() {
            q = match value {
                ColumnValue::Text(v) => q.bind(v.clone()),
                ColumnValue::Integer(v) => q.bind(*v),
            };
        }
        q.bind(id).fetch_optional(executor).await
    }

    /// Bump `last_updated` after a journal change. Returns `false` if the
    /// project no longer exists.
    pub async fn touch<'e>(executor: impl SqliteExecutor<'e>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE projects SET last_updated = datetime('now') WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete a project. Journal entries, activities and assignments
    /// go with it through `ON DELETE CASCADE`.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace the set of users assigned to a project.
    pub async fn set_users(
        conn: &mut SqliteConnection,
        project_id: DbId,
        user_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM project_users WHERE project_id = ?")
            .bind(project_id)
            .execute(&mut *conn)
            .await?;

        for user_id in user_ids {
            sqlx::query("INSERT OR IGNORE INTO project_users (project_id, user_id) VALUES (?, ?)")
                .bind(project_id)
                .bind(user_id)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }

    /// Ids of the users assigned to a project, ascending.
    pub async fn assigned_user_ids(
        pool: &SqlitePool,
        project_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT user_id FROM project_users WHERE project_id = ? ORDER BY user_id ASC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }
}
