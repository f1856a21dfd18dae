//! Project activity constants and detail-text helpers.

// ---------------------------------------------------------------------------
// Activity type constants
// ---------------------------------------------------------------------------

/// Known activity types stored in `project_activities.activity_type`.
pub mod activity_types {
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const JOURNAL_ENTRY: &str = "journal_entry";
    pub const JOURNAL_ENTRY_EDITED: &str = "journal_entry_edited";
    pub const JOURNAL_ENTRY_DELETED: &str = "journal_entry_deleted";
    pub const UPDATE_USERS: &str = "update_users";
}

/// All activity types, in the order the dashboard legend lists them.
pub const ALL_ACTIVITY_TYPES: &[&str] = &[
    activity_types::CREATE,
    activity_types::UPDATE,
    activity_types::JOURNAL_ENTRY,
    activity_types::JOURNAL_ENTRY_EDITED,
    activity_types::JOURNAL_ENTRY_DELETED,
    activity_types::UPDATE_USERS,
];

/// Details text of the activity written when a project is created.
pub const PROJECT_CREATED_DETAILS: &str = "Project created";

/// Key used in the change map of a journal edit.
pub const JOURNAL_ENTRY_FIELD: &str = "journal_entry";

// ---------------------------------------------------------------------------
// Detail text
// ---------------------------------------------------------------------------

/// Maximum number of characters of journal text copied into an activity.
pub const PREVIEW_LENGTH: usize = 100;

/// Marker appended to a preview that was cut short.
pub const ELLIPSIS: &str = "...";

/// First `limit` characters of `text`, without any marker.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Journal preview: the first [`PREVIEW_LENGTH`] characters, followed by
/// [`ELLIPSIS`] when the text was longer.
pub fn preview_text(text: &str) -> String {
    let mut preview = truncate_chars(text, PREVIEW_LENGTH);
    if text.chars().count() > PREVIEW_LENGTH {
        preview.push_str(ELLIPSIS);
    }
    preview
}

/// Details line for a user-assignment change.
pub fn users_updated_details(count: usize) -> String {
    format!("Project users updated: {count} users assigned")
}
