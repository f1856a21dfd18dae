//! Repository for the append-only `project_activities` table.
//!
//! Rows are never updated; they disappear only through the project cascade.

use biome_core::types::DbId;
use sqlx::{SqliteExecutor, SqlitePool};

use crate::models::activity::{
    ActivityExportRecord, ActivityFeedItem, CreateProjectActivity, ProjectActivity,
};

const COLUMNS: &str = "id, project_id, activity_type, details, changed_fields, activity_date";

/// Same columns qualified with the `a` alias for joined queries.
const A_COLUMNS: &str =
    "a.id, a.project_id, a.activity_type, a.details, a.changed_fields, a.activity_date";

/// Default cap on the global activity feed.
pub const RECENT_ACTIVITY_LIMIT: i64 = 50;

pub struct ActivityRepo;

impl ActivityRepo {
    /// Insert one activity row. `activity_date` defaults to now.
    pub async fn create<'e>(
        executor: impl SqliteExecutor<'e>,
        input: &CreateProjectActivity,
    ) -> Result<ProjectActivity, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_activities (project_id, activity_type, details, changed_fields)
             VALUES (?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectActivity>(&query)
            .bind(input.project_id)
            .bind(&input.activity_type)
            .bind(&input.details)
            .bind(&input.changed_fields)
            .fetch_one(executor)
            .await
    }

    /// Every activity of one project, newest first.
    pub async fn list_for_project(
        pool: &SqlitePool,
        project_id: DbId,
    ) -> Result<Vec<ProjectActivity>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_activities
             WHERE project_id = ?
             ORDER BY activity_date DESC, id DESC"
        );
        sqlx::query_as::<_, ProjectActivity>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Most recent activities across all projects, with project names.
    pub async fn list_recent(
        pool: &SqlitePool,
        limit: i64,
    ) -> Result<Vec<ActivityFeedItem>, sqlx::Error> {
        let query = format!(
            "SELECT {A_COLUMNS}, p.name AS project_name
             FROM project_activities a
             JOIN projects p ON p.id = a.project_id
             ORDER BY a.activity_date DESC, a.id DESC
             LIMIT ?"
        );
        sqlx::query_as::<_, ActivityFeedItem>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// All activities joined with project, owner and group names, newest
    /// first. Feeds the CSV/XLSX export.
    pub async fn list_for_export(
        pool: &SqlitePool,
    ) -> Result<Vec<ActivityExportRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {A_COLUMNS}, p.name AS project_name, u.name AS user_name, g.name AS group_name
             FROM project_activities a
             JOIN projects p ON p.id = a.project_id
             LEFT JOIN users u ON u.id = p.user_id
             LEFT JOIN groups g ON g.id = u.group_id
             ORDER BY a.activity_date DESC, a.id DESC"
        );
        sqlx::query_as::<_, ActivityExportRecord>(&query)
            .fetch_all(pool)
            .await
    }
}
