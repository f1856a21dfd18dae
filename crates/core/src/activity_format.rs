//! Rendering of stored change maps into display lines.
//!
//! This is the single implementation used by the activity feed, the CSV
//! export and the XLSX export. It must never fail: historical rows hold
//! JSON change maps, bare comma-separated field lists, or garbage, and all
//! of them render to *something*.

use serde_json::Value;

use crate::change_tracking::{display_f64, normalize_value, ChangedFields};
use crate::types::Timestamp;

/// Line shown when a stored value is valid JSON but not a change map.
pub const FIELD_CHANGES_UNAVAILABLE: &str = "Field changes unavailable";

/// Placeholder for a missing `from`/`to` value.
pub const NONE_PLACEHOLDER: &str = "(none)";

/// Separator used when the display lines are flattened into one cell.
pub const LINE_SEPARATOR: &str = "; ";

const TIME_FIELD: &str = "time_spent_minutes";

/// Render the raw `changed_fields` column into display lines.
///
/// - `None` or empty: no lines.
/// - JSON object: one line per field, in stored order.
/// - Invalid JSON: treated as a comma-separated list of field names, each
///   rendered as `"{Field}: (updated)"`.
/// - Any other JSON value: a single [`FIELD_CHANGES_UNAVAILABLE`] line.
pub fn format_changed_fields(raw: Option<&str>) -> Vec<String> {
    let raw = match raw {
        Some(r) if !r.is_empty() => r,
        _ => return Vec::new(),
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map
            .iter()
            .map(|(field, change)| format_field_change(field, change.get("from"), change.get("to")))
            .collect(),
        Ok(_) => vec![FIELD_CHANGES_UNAVAILABLE.to_string()],
        Err(_) => raw
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(|f| format!("{}: (updated)", title_case_field(f)))
            .collect(),
    }
}

/// Render an in-memory change map (same rules as [`format_changed_fields`]).
pub fn format_change_map(changes: &ChangedFields) -> Vec<String> {
    changes
        .iter()
        .map(|(field, change)| format_field_change(field, Some(&change.from), Some(&change.to)))
        .collect()
}

/// Render one field change, e.g. `"Status: Active → Completed"` or
/// `"Time: 1h 0m → 2h 5m"`.
pub fn format_field_change(field: &str, from: Option<&Value>, to: Option<&Value>) -> String {
    if field == TIME_FIELD {
        return format!(
            "Time: {} → {}",
            format_minutes(from),
            format_minutes(to)
        );
    }

    format!(
        "{}: {} → {}",
        title_case_field(field),
        display_or_none(from),
        display_or_none(to)
    )
}

/// Join display lines into the single export cell.
pub fn join_lines(lines: &[String]) -> String {
    lines.join(LINE_SEPARATOR)
}

/// `"time_spent_minutes"` -> `"Time Spent Minutes"`.
///
/// Underscores become spaces and every character that starts a word is
/// upper-cased; everything else is left as stored.
pub fn title_case_field(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut prev_is_word = false;
    for c in field.chars() {
        let c = if c == '_' { ' ' } else { c };
        let is_word = c.is_alphanumeric();
        if is_word && !prev_is_word {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_is_word = is_word;
    }
    out
}

/// `125` -> `"2h 5m"`, `60` -> `"1h 0m"`; absent, `null`, `false`, `0`,
/// `""` and non-numeric values render as `"0h"`. A non-empty string is
/// present even when it reads as zero, so `"0"` renders as `"0h 0m"`.
pub fn format_minutes(value: Option<&Value>) -> String {
    match value.and_then(minutes_value) {
        Some(minutes) if !minutes.is_nan() => {
            let hours = (minutes / 60.0).floor();
            let rest = minutes % 60.0;
            format!("{}h {}m", display_f64(hours), display_f64(rest))
        }
        _ => "0h".to_string(),
    }
}

/// Minutes of a present value, or `None` when the value counts as absent.
fn minutes_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|m| *m != 0.0),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(true) => Some(1.0),
        _ => None,
    }
}

fn display_or_none(value: Option<&Value>) -> String {
    value
        .and_then(normalize_value)
        .unwrap_or_else(|| NONE_PLACEHOLDER.to_string())
}

/// Timestamp as shown in the feed and in exports (`2025-01-20 14:22:00`).
pub fn format_activity_date(ts: &Timestamp) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Date-only rendering used for export period summaries.
pub fn format_activity_day(ts: &Timestamp) -> String {
    ts.format("%Y-%m-%d").to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
