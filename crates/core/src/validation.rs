//! Input validation for create/update payloads.

/// Ensure a required text value is present and not blank.
///
/// `label` is the human-readable name used in the error message, e.g.
/// `"Project name"` produces `"Project name is required"`.
pub fn validate_required(label: &str, value: Option<&str>) -> Result<(), String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(format!("{label} is required")),
    }
}

/// Journal entry text must be non-blank.
pub fn validate_entry_text(text: Option<&str>) -> Result<(), String> {
    validate_required("Entry text", text)
}

/// Minutes logged on a project can't be negative.
pub fn validate_time_spent(minutes: Option<i64>) -> Result<(), String> {
    match minutes {
        Some(m) if m < 0 => Err(format!("time_spent_minutes must be >= 0, got {m}")),
        _ => Ok(()),
    }
}
