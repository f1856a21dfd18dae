//! Project activity log model and its read-side projections.

use biome_core::activity_format::{format_activity_date, format_changed_fields, join_lines};
use biome_core::export::ExportRow;
use biome_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `project_activities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectActivity {
    pub id: DbId,
    pub project_id: DbId,
    pub activity_type: String,
    pub details: Option<String>,
    pub changed_fields: Option<String>,
    pub activity_date: Timestamp,
}

/// Insert values for a new activity row.
#[derive(Debug, Clone)]
pub struct CreateProjectActivity {
    pub project_id: DbId,
    pub activity_type: String,
    pub details: Option<String>,
    pub changed_fields: Option<String>,
}

/// An activity joined with its project's name (global feed).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityFeedItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub activity: ProjectActivity,
    pub project_name: String,
}

/// An activity joined with project, owner and group names for export.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityExportRecord {
    #[sqlx(flatten)]
    pub activity: ProjectActivity,
    pub project_name: String,
    pub user_name: Option<String>,
    pub group_name: Option<String>,
}

impl ActivityExportRecord {
    /// Flatten into an export row; missing names and details become empty
    /// strings and the change map is rendered to display text.
    pub fn to_export_row(&self) -> ExportRow {
        ExportRow {
            activity_date: self.activity.activity_date,
            project_name: self.project_name.clone(),
            user_name: self.user_name.clone().unwrap_or_default(),
            group_name: self.group_name.clone().unwrap_or_default(),
            activity_type: self.activity.activity_type.clone(),
            details: self.activity.details.clone().unwrap_or_default(),
            changed_fields: join_lines(&format_changed_fields(
                self.activity.changed_fields.as_deref(),
            )),
        }
    }
}

/// Activity as returned by the feed endpoints: the stored row plus the
/// rendered change lines and a display date.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayActivity {
    #[serde(flatten)]
    pub activity: ProjectActivity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    pub changed_fields_display: Vec<String>,
    pub formatted_date: String,
}

impl DisplayActivity {
    fn render(activity: ProjectActivity, project_name: Option<String>) -> Self {
        let changed_fields_display = format_changed_fields(activity.changed_fields.as_deref());
        let formatted_date = format_activity_date(&activity.activity_date);
        Self {
            activity,
            project_name,
            changed_fields_display,
            formatted_date,
        }
    }
}

impl From<ProjectActivity> for DisplayActivity {
    fn from(activity: ProjectActivity) -> Self {
        Self::render(activity, None)
    }
}

impl From<ActivityFeedItem> for DisplayActivity {
    fn from(item: ActivityFeedItem) -> Self {
        Self::render(item.activity, Some(item.project_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn activity(changed_fields: Option<&str>) -> ProjectActivity {
        ProjectActivity {
            id: 1,
            project_id: 7,
            activity_type: "update".into(),
            details: Some("Project updated: status".into()),
            changed_fields: changed_fields.map(String::from),
            activity_date: chrono::Utc.with_ymd_and_hms(2025, 1, 20, 14, 22, 0).unwrap(),
        }
    }

    #[test]
    fn export_row_fills_missing_names_with_empty_strings() {
        let record = ActivityExportRecord {
            activity: activity(Some(r#"{"status":{"from":"Intake","to":"Active"}}"#)),
            project_name: "Spheroids".into(),
            user_name: None,
            group_name: None,
        };
        let row = record.to_export_row();

        assert_eq!(row.user_name, "");
        assert_eq!(row.group_name, "");
        assert_eq!(row.changed_fields, "Status: Intake → Active");
    }

    #[test]
    fn display_activity_renders_lines_and_date() {
        let display = DisplayActivity::from(activity(Some("status,name")));
        assert_eq!(
            display.changed_fields_display,
            vec!["Status: (updated)", "Name: (updated)"]
        );
        assert_eq!(display.formatted_date, "2025-01-20 14:22:00");

        let json = serde_json::to_value(&display).unwrap();
        assert!(json.get("project_name").is_none());
        assert_eq!(json["activity_type"], "update");
    }

    #[test]
    fn feed_item_keeps_project_name() {
        let item = ActivityFeedItem {
            activity: activity(None),
            project_name: "Organoids".into(),
        };
        let json = serde_json::to_value(DisplayActivity::from(item)).unwrap();
        assert_eq!(json["project_name"], "Organoids");
        assert_eq!(json["changed_fields_display"], serde_json::json!([]));
    }
}
