//! Field-level change tracking for project updates.
//!
//! A project update is diffed against the stored row before it is written.
//! Only fields on the [`TRACKED_FIELDS`] allow-list are compared, and the
//! comparison is done on the *display string* of each value rather than on
//! the typed value: `60`, `60.0` and `"60"` are the same change-log value,
//! while `0` and `null` are not. Existing audit history depends on exactly
//! these equalities.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Allow-lists
// ---------------------------------------------------------------------------

/// Project fields eligible for diffing. Anything else in an update payload
/// is ignored by the change log.
pub const TRACKED_FIELDS: &[&str] = &[
    "name",
    "description",
    "status",
    "software",
    "time_spent_minutes",
    "project_path",
    "folder_created",
    "readme_last_updated",
    "start_date",
    "user_id",
    "image_types",
    "sample_type",
    "objective_magnification",
    "analysis_goal",
];

/// Field whose empty-ish values (`null`, `""`, `0`, `false`) all mean
/// "no path set".
pub const PROJECT_PATH_FIELD: &str = "project_path";

/// Fields recorded (with `from: null`) in the change log of a new project.
pub const CREATION_FIELDS: &[&str] = &[
    "name",
    "description",
    "status",
    "software",
    "start_date",
    "user_id",
    "time_spent_minutes",
];

/// Whether `field` is on the tracked allow-list.
pub fn is_tracked_field(field: &str) -> bool {
    TRACKED_FIELDS.contains(&field)
}

// ---------------------------------------------------------------------------
// Change map types
// ---------------------------------------------------------------------------

/// Old and new value of a single changed field, stored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub from: Value,
    pub to: Value,
}

impl FieldChange {
    pub fn new(from: Value, to: Value) -> Self {
        Self { from, to }
    }
}

/// Sparse, insertion-ordered map of field name to [`FieldChange`].
///
/// Serializes to `{"<field>": {"from": .., "to": ..}}`, which is the exact
/// shape persisted in `project_activities.changed_fields`.
pub type ChangedFields = IndexMap<String, FieldChange>;

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Coerce a JSON value to the string the change log compares and displays.
///
/// `null` stays `None` so it never equals any string (including `"null"`).
/// Numbers print without a trailing `.0`, arrays print as their elements
/// joined by `,` (with `null` elements empty) and objects print as compact
/// JSON.
pub fn normalize_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(display_number(n)),
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| normalize_value(item).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(value.to_string()),
    }
}

/// Render a JSON number the way the dashboard prints it (`60.0` -> `60`).
pub fn display_number(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) => display_f64(f),
        None => n.to_string(),
    }
}

pub(crate) fn display_f64(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

/// Collapse every empty-ish path value to `null`.
fn path_or_null(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::String(s) if s.is_empty() => Value::Null,
        Value::Bool(false) => Value::Null,
        Value::Number(n) if n.as_f64().is_some_and(|f| f == 0.0 || f.is_nan()) => Value::Null,
        other => other.clone(),
    }
}

// ---------------------------------------------------------------------------
// Diffing
// ---------------------------------------------------------------------------

/// Compute the sparse change map between a stored project snapshot and a
/// partial update.
///
/// Keys are visited in the order they appear in `proposed`; keys missing
/// from `original` compare as `null`. An empty result means the update is a
/// no-op for the change log and no activity must be written.
pub fn diff_project_fields(original: &Map<String, Value>, proposed: &Map<String, Value>) -> ChangedFields {
    let mut changes = ChangedFields::new();

    for (field, new_value) in proposed {
        if !is_tracked_field(field) {
            continue;
        }
        let old_value = original.get(field).unwrap_or(&Value::Null);

        if field == PROJECT_PATH_FIELD {
            let from = path_or_null(old_value);
            let to = path_or_null(new_value);
            if from != to {
                changes.insert(field.clone(), FieldChange::new(from, to));
            }
        } else if normalize_value(old_value) != normalize_value(new_value) {
            changes.insert(
                field.clone(),
                FieldChange::new(old_value.clone(), new_value.clone()),
            );
        }
    }

    changes
}

/// Change map recorded when a project is created: every
/// [`CREATION_FIELDS`] entry goes from `null` to its stored value.
pub fn creation_changes(created: &Map<String, Value>) -> ChangedFields {
    CREATION_FIELDS
        .iter()
        .map(|field| {
            let to = created.get(*field).cloned().unwrap_or(Value::Null);
            (field.to_string(), FieldChange::new(Value::Null, to))
        })
        .collect()
}

/// Human-readable details line for an update activity, e.g.
/// `"Project updated: status, time_spent_minutes"`.
pub fn update_summary(changes: &ChangedFields) -> String {
    let fields: Vec<String> = changes.keys().map(|f| spaced_lowercase(f)).collect();
    format!("Project updated: {}", fields.join(", "))
}

/// `camelCase` -> `camel case`; snake_case keys pass through unchanged.
fn spaced_lowercase(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 4);
    for c in field.chars() {
        if c.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

// ---------------------------------------------------------------------------
// Persistence helpers
// ---------------------------------------------------------------------------

/// Serialize a change map to the JSON string stored in the database.
pub fn serialize_changed_fields(changes: &ChangedFields) -> Result<String, serde_json::Error> {
    serde_json::to_string(changes)
}

/// Parse a stored change map. Strict: legacy or malformed data is handled by
/// [`crate::activity_format::format_changed_fields`] instead.
pub fn parse_changed_fields(raw: &str) -> Result<ChangedFields, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Turn any serializable record into the field snapshot used for diffing.
pub fn to_snapshot<T: Serialize>(record: &T) -> Result<Map<String, Value>, CoreError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CoreError::Internal(
            "Snapshot source did not serialize to an object".to_string(),
        )),
        Err(e) => Err(CoreError::Internal(format!("Failed to build snapshot: {e}"))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
