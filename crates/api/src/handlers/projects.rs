//! Handlers for the `/projects` resource.
//!
//! Primary writes run inside a transaction. The activity row is written
//! after the commit, on its own, so an audit failure of any kind leaves the
//! committed project data in place.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use biome_core::activity::{activity_types, users_updated_details, PROJECT_CREATED_DETAILS};
use biome_core::change_tracking::{
    creation_changes, diff_project_fields, to_snapshot, update_summary,
};
use biome_core::types::DbId;
use biome_db::models::project::{
    CreateProject, Project, ProjectDetail, ProjectPatch, ProjectWithJournal,
};
use biome_db::repositories::{JournalRepo, ProjectRepo};
use biome_db::DbPool;
use serde::Deserialize;
use serde_json::Value;

use crate::activity::record_activity;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Body of `POST /projects/{id}/users`.
#[derive(Debug, Deserialize)]
pub struct AssignUsers {
    pub users: Vec<DbId>,
}

/// GET /api/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<ProjectDetail>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(projects))
}

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<ProjectDetail>)> {
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let new_project = input.into_new_project(&today).map_err(AppError::validation)?;

    let mut tx = state.pool.begin().await?;

    let project = ProjectRepo::create(&mut *tx, &new_project).await?;
    let changes = creation_changes(&to_snapshot(&project)?);
    let detail = ProjectRepo::find_detail(&mut *tx, project.id)
        .await?
        .ok_or_else(|| AppError::InternalError("Failed to retrieve created project".into()))?;

    tx.commit().await?;

    record_activity(
        &state.pool,
        project.id,
        activity_types::CREATE,
        PROJECT_CREATED_DETAILS,
        Some(&changes),
    )
    .await;

    tracing::info!(project_id = project.id, name = %project.name, "Project created");
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectWithJournal>> {
    Ok(Json(load_with_journal(&state.pool, id).await?))
}

/// PUT /api/projects/{id}
///
/// Accepts a partial JSON object. Tracked fields are diffed against the
/// stored row before the write; an `update` activity is recorded only when
/// at least one of them actually changes.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<Value>,
) -> AppResult<Json<ProjectWithJournal>> {
    let Value::Object(proposed) = body else {
        return Err(AppError::validation("Request body must be a JSON object"));
    };
    let patch = ProjectPatch::from_json(&proposed).map_err(AppError::validation)?;

    let mut tx = state.pool.begin().await?;

    let original = ProjectRepo::find_by_id(&mut *tx, id)
        .await?
        .ok_or(AppError::not_found("Project", id))?;

    let changes = if patch.is_empty() {
        None
    } else {
        let changes = diff_project_fields(&to_snapshot(&original)?, &proposed);
        ProjectRepo::apply_patch(&mut *tx, id, &patch)
            .await?
            .ok_or(AppError::not_found("Project", id))?;
        Some(changes)
    };

    tx.commit().await?;

    match changes {
        Some(changes) if !changes.is_empty() => {
            tracing::info!(project_id = id, changed = changes.len(), "Project updated");
            record_activity(
                &state.pool,
                id,
                activity_types::UPDATE,
                &update_summary(&changes),
                Some(&changes),
            )
            .await;
        }
        _ => tracing::debug!(project_id = id, "No tracked changes, skipping activity"),
    }

    Ok(Json(load_with_journal(&state.pool, id).await?))
}

/// DELETE /api/projects/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if ProjectRepo::delete(&state.pool, id).await? {
        tracing::info!(project_id = id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Project", id))
    }
}

/// POST /api/projects/{id}/users
///
/// Replaces the assigned users. Duplicate ids in the request are ignored.
pub async fn set_users(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssignUsers>,
) -> AppResult<Json<Project>> {
    let mut user_ids = input.users;
    user_ids.sort_unstable();
    user_ids.dedup();

    let mut tx = state.pool.begin().await?;

    let project = ProjectRepo::find_by_id(&mut *tx, id)
        .await?
        .ok_or(AppError::not_found("Project", id))?;

    ProjectRepo::set_users(&mut *tx, id, &user_ids).await?;
    tx.commit().await?;

    record_activity(
        &state.pool,
        id,
        activity_types::UPDATE_USERS,
        &users_updated_details(user_ids.len()),
        None,
    )
    .await;
    Ok(Json(project))
}

/// Project detail with owner names and journal, or 404.
pub(crate) async fn load_with_journal(
    pool: &DbPool,
    id: DbId,
) -> AppResult<ProjectWithJournal> {
    let detail = ProjectRepo::find_detail(pool, id)
        .await?
        .ok_or(AppError::not_found("Project", id))?;
    let journal_entries = JournalRepo::list_for_project(pool, id).await?;
    Ok(ProjectWithJournal {
        detail,
        journal_entries,
    })
}

/// 404 unless the project exists.
pub(crate) async fn ensure_project(pool: &DbPool, id: DbId) -> AppResult<()> {
    ProjectRepo::find_by_id(pool, id)
        .await?
        .map(|_| ())
        .ok_or(AppError::not_found("Project", id))
}
