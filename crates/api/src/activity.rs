//! Best-effort activity log writer.
//!
//! Activity rows are audit data: a failure to write one is logged and
//! swallowed. Handlers call this after committing the primary write, so
//! even a failure that aborts a whole SQLite transaction cannot take the
//! primary write with it.

use biome_core::change_tracking::{serialize_changed_fields, ChangedFields};
use biome_core::types::DbId;
use biome_db::models::activity::{CreateProjectActivity, ProjectActivity};
use biome_db::repositories::ActivityRepo;
use sqlx::SqliteExecutor;

/// Append one activity row for `project_id`.
///
/// `changed_fields` is stored as its JSON encoding, or `NULL` when absent.
/// Returns `None` (after logging) if the change map cannot be serialized
/// or the insert fails. Never touches `projects.last_updated`.
pub async fn record_activity<'e>(
    executor: impl SqliteExecutor<'e>,
    project_id: DbId,
    activity_type: &str,
    details: &str,
    changed_fields: Option<&ChangedFields>,
) -> Option<ProjectActivity> {
    let changed_fields = match changed_fields.map(serialize_changed_fields).transpose() {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!(
                project_id,
                activity_type,
                error = %e,
                "Failed to serialize activity changes"
            );
            return None;
        }
    };

    let input = CreateProjectActivity {
        project_id,
        activity_type: activity_type.to_string(),
        details: Some(details.to_string()),
        changed_fields,
    };

    match ActivityRepo::create(executor, &input).await {
        Ok(activity) => {
            tracing::debug!(
                project_id,
                activity_type,
                activity_id = activity.id,
                "Recorded project activity"
            );
            Some(activity)
        }
        Err(e) => {
            tracing::error!(
                project_id,
                activity_type,
                error = %e,
                "Failed to record project activity"
            );
            None
        }
    }
}
