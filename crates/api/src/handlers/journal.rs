//! Handlers for `/projects/{id}/journal`.
//!
//! Every journal change bumps the project's `last_updated` in the same
//! transaction, then records a correlated activity once committed.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use biome_core::activity::{
    activity_types, preview_text, truncate_chars, JOURNAL_ENTRY_FIELD, PREVIEW_LENGTH,
};
use biome_core::change_tracking::{ChangedFields, FieldChange};
use biome_core::types::DbId;
use biome_core::validation::validate_entry_text;
use biome_db::models::journal::{CreateJournalEntry, JournalEntry, UpdateJournalEntry};
use biome_db::repositories::{JournalRepo, ProjectRepo};
use serde_json::Value;

use crate::activity::record_activity;
use crate::error::{AppError, AppResult};
use crate::handlers::projects::ensure_project;
use crate::state::AppState;

/// GET /api/projects/{id}/journal
pub async fn list(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<JournalEntry>>> {
    ensure_project(&state.pool, project_id).await?;
    let entries = JournalRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(entries))
}

/// POST /api/projects/{id}/journal
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateJournalEntry>,
) -> AppResult<(StatusCode, Json<JournalEntry>)> {
    validate_entry_text(input.entry_text.as_deref()).map_err(AppError::validation)?;
    let entry_text = input.entry_text.unwrap_or_default();

    let mut tx = state.pool.begin().await?;

    ProjectRepo::find_by_id(&mut *tx, project_id)
        .await?
        .ok_or(AppError::not_found("Project", project_id))?;

    let entry = JournalRepo::create(&mut *tx, project_id, &entry_text).await?;
    ProjectRepo::touch(&mut *tx, project_id).await?;
    tx.commit().await?;

    record_activity(
        &state.pool,
        project_id,
        activity_types::JOURNAL_ENTRY,
        &preview_text(&entry_text),
        None,
    )
    .await;

    tracing::info!(project_id, entry_id = entry.id, "Journal entry added");
    Ok((StatusCode::CREATED, Json(entry)))
}

/// PATCH /api/projects/{id}/journal/{entry_id}
pub async fn update(
    State(state): State<AppState>,
    Path((project_id, entry_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateJournalEntry>,
) -> AppResult<Json<JournalEntry>> {
    validate_entry_text(input.entry_text.as_deref()).map_err(AppError::validation)?;
    let entry_text = input.entry_text.unwrap_or_default();
    let edited_by = input.edited_by.filter(|s| !s.trim().is_empty());

    let mut tx = state.pool.begin().await?;

    let existing = JournalRepo::find(&mut *tx, project_id, entry_id)
        .await?
        .ok_or(AppError::not_found("Journal entry", entry_id))?;

    let updated =
        JournalRepo::update_text(&mut *tx, project_id, entry_id, &entry_text, edited_by.as_deref())
            .await?
            .ok_or(AppError::not_found("Journal entry", entry_id))?;

    ProjectRepo::touch(&mut *tx, project_id).await?;
    tx.commit().await?;

    let mut changes = ChangedFields::new();
    changes.insert(
        JOURNAL_ENTRY_FIELD.to_string(),
        FieldChange::new(
            Value::String(truncate_chars(&existing.entry_text, PREVIEW_LENGTH)),
            Value::String(truncate_chars(&entry_text, PREVIEW_LENGTH)),
        ),
    );
    record_activity(
        &state.pool,
        project_id,
        activity_types::JOURNAL_ENTRY_EDITED,
        &preview_text(&entry_text),
        Some(&changes),
    )
    .await;

    tracing::info!(project_id, entry_id, "Journal entry edited");
    Ok(Json(updated))
}

/// DELETE /api/projects/{id}/journal/{entry_id}
pub async fn delete(
    State(state): State<AppState>,
    Path((project_id, entry_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let mut tx = state.pool.begin().await?;

    let existing = JournalRepo::find(&mut *tx, project_id, entry_id)
        .await?
        .ok_or(AppError::not_found("Journal entry", entry_id))?;

    JournalRepo::delete(&mut *tx, project_id, entry_id).await?;
    ProjectRepo::touch(&mut *tx, project_id).await?;
    tx.commit().await?;

    record_activity(
        &state.pool,
        project_id,
        activity_types::JOURNAL_ENTRY_DELETED,
        &truncate_chars(&existing.entry_text, PREVIEW_LENGTH),
        None,
    )
    .await;

    tracing::info!(project_id, entry_id, "Journal entry deleted");
    Ok(StatusCode::NO_CONTENT)
}
