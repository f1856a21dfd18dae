//! Project entity model, DTOs, and the typed column patch used by updates.

use biome_core::change_tracking::{normalize_value, TRACKED_FIELDS};
use biome_core::types::{DbId, Timestamp};
use biome_core::validation::{validate_required, validate_time_spent};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

use crate::models::journal::JournalEntry;

/// Default status of a newly created project.
pub const DEFAULT_STATUS: &str = "Intake";

/// Tracked fields stored in INTEGER columns. Every other tracked field is TEXT.
pub const INTEGER_FIELDS: &[&str] = &["time_spent_minutes", "folder_created", "user_id"];

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A row from the `projects` table.
///
/// `image_types`, `sample_type` and `analysis_goal` hold JSON-encoded string
/// arrays; they are stored and diffed as opaque text.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub software: Option<String>,
    pub time_spent_minutes: Option<i64>,
    pub creation_date: Timestamp,
    pub last_updated: Timestamp,
    pub start_date: Option<String>,
    pub project_path: Option<String>,
    pub folder_created: Option<i64>,
    pub readme_last_updated: Option<String>,
    pub user_id: Option<DbId>,
    pub image_types: Option<String>,
    pub sample_type: Option<String>,
    pub objective_magnification: Option<String>,
    pub analysis_goal: Option<String>,
}

/// A project joined with its owner and the owner's group.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub project: Project,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub group_name: Option<String>,
    pub group_id: Option<DbId>,
}

/// Project detail view with its journal, newest entry first.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithJournal {
    #[serde(flatten)]
    pub detail: ProjectDetail,
    pub journal_entries: Vec<JournalEntry>,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Body of `POST /projects`.
///
/// Loosely typed fields accept whatever the dashboard sends (numbers as
/// strings, booleans for flags, arrays for tags) and are coerced in
/// [`CreateProject::into_new_project`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub software: Option<String>,
    pub time_spent_minutes: Option<Value>,
    pub project_path: Option<String>,
    pub folder_created: Option<Value>,
    pub readme_last_updated: Option<String>,
    pub start_date: Option<String>,
    pub user_id: Option<Value>,
    pub image_types: Option<Value>,
    pub sample_type: Option<Value>,
    pub objective_magnification: Option<String>,
    pub analysis_goal: Option<Value>,
}

/// Fully resolved insert values for a new project.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub status: String,
    pub software: Option<String>,
    pub time_spent_minutes: i64,
    pub project_path: Option<String>,
    pub folder_created: i64,
    pub readme_last_updated: Option<String>,
    pub start_date: String,
    pub user_id: Option<DbId>,
    pub image_types: Option<String>,
    pub sample_type: Option<String>,
    pub objective_magnification: Option<String>,
    pub analysis_goal: Option<String>,
}

impl CreateProject {
    /// Validate and apply creation defaults.
    ///
    /// `today` (`YYYY-MM-DD`) is used when no start date is given. Empty
    /// strings and zero ids are stored as `NULL`; unparseable minute counts
    /// fall back to `0`.
    pub fn into_new_project(self, today: &str) -> Result<NewProject, String> {
        validate_required("Project name", self.name.as_deref())?;

        let time_spent_minutes = self
            .time_spent_minutes
            .as_ref()
            .and_then(|v| coerce_integer("time_spent_minutes", v).ok().flatten())
            .unwrap_or(0);
        validate_time_spent(Some(time_spent_minutes))?;

        let folder_created = self
            .folder_created
            .as_ref()
            .and_then(|v| coerce_integer("folder_created", v).ok().flatten())
            .unwrap_or(0);

        let user_id = match &self.user_id {
            Some(v) => coerce_integer("user_id", v)?.filter(|id| *id != 0),
            None => None,
        };

        Ok(NewProject {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            status: non_empty(self.status).unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            software: non_empty(self.software),
            time_spent_minutes,
            project_path: non_empty(self.project_path),
            folder_created,
            readme_last_updated: non_empty(self.readme_last_updated),
            start_date: non_empty(self.start_date).unwrap_or_else(|| today.to_string()),
            user_id,
            image_types: self.image_types.as_ref().and_then(coerce_text),
            sample_type: self.sample_type.as_ref().and_then(coerce_text),
            objective_magnification: non_empty(self.objective_magnification),
            analysis_goal: self.analysis_goal.as_ref().and_then(coerce_text),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Update patch
// ---------------------------------------------------------------------------

/// Typed value bound for one column of a project update.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Text(Option<String>),
    Integer(Option<i64>),
}

/// The tracked columns present in a `PUT /projects/{id}` body, in request
/// order, with their values coerced to the column type.
///
/// Keys outside the tracked allow-list are dropped; `null` clears a column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    columns: Vec<(&'static str, ColumnValue)>,
}

impl ProjectPatch {
    pub fn from_json(proposed: &Map<String, Value>) -> Result<Self, String> {
        let mut columns = Vec::new();

        for (key, value) in proposed {
            let Some(field) = TRACKED_FIELDS.iter().find(|f| key == *f).copied() else {
                continue;
            };
            let column = if INTEGER_FIELDS.contains(&field) {
                let parsed = coerce_integer(field, value)?;
                if field == "time_spent_minutes" {
                    validate_time_spent(parsed)?;
                }
                ColumnValue::Integer(parsed)
            } else {
                ColumnValue::Text(coerce_text(value))
            };
            columns.push((field, column));
        }

        Ok(Self { columns })
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[(&'static str, ColumnValue)] {
        &self.columns
    }
}

/// Coerce a JSON value for a TEXT column. Arrays and objects (tag lists) are
/// stored as their JSON encoding.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        other => normalize_value(other),
    }
}

/// Coerce a JSON value for an INTEGER column.
///
/// Accepts integers, integral floats, booleans (`0`/`1`) and numeric
/// strings; a blank string clears the column.
pub fn coerce_integer(field: &str, value: &Value) -> Result<Option<i64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(i64::from(*b))),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .map(Some)
            .ok_or_else(|| format!("{field} must be an integer")),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| format!("{field} must be an integer, got '{s}'")),
        _ => Err(format!("{field} must be an integer")),
    }
}
