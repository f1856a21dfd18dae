//! Handlers for the `/groups` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use biome_core::error::CoreError;
use biome_core::types::DbId;
use biome_core::validation::validate_required;
use biome_db::models::group::{Group, GroupInput};
use biome_db::models::user::User;
use biome_db::repositories::{GroupRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

const DUPLICATE_GROUP_NAME: &str = "A group with this name already exists";

/// GET /api/groups
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Group>>> {
    Ok(Json(GroupRepo::list(&state.pool).await?))
}

/// POST /api/groups
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<GroupInput>,
) -> AppResult<(StatusCode, Json<Group>)> {
    validate_required("Group name", input.name.as_deref()).map_err(AppError::validation)?;
    let group = GroupRepo::create(
        &state.pool,
        input.name.as_deref().unwrap_or_default(),
        input.description.as_deref(),
    )
    .await
    .map_err(map_duplicate_name)?;
    tracing::info!(group_id = group.id, "Group created");
    Ok((StatusCode::CREATED, Json(group)))
}

/// GET /api/groups/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Group>> {
    let group = GroupRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Group", id))?;
    Ok(Json(group))
}

/// PUT /api/groups/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<GroupInput>,
) -> AppResult<Json<Group>> {
    validate_required("Group name", input.name.as_deref()).map_err(AppError::validation)?;
    let group = GroupRepo::update(
        &state.pool,
        id,
        input.name.as_deref().unwrap_or_default(),
        input.description.as_deref(),
    )
    .await
    .map_err(map_duplicate_name)?
    .ok_or(AppError::not_found("Group", id))?;
    Ok(Json(group))
}

/// DELETE /api/groups/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if GroupRepo::delete(&state.pool, id).await? {
        tracing::info!(group_id = id, "Group deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Group", id))
    }
}

/// GET /api/groups/{id}/users
pub async fn users(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<User>>> {
    GroupRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Group", id))?;
    Ok(Json(UserRepo::list_by_group(&state.pool, id).await?))
}

fn map_duplicate_name(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Core(CoreError::Conflict(DUPLICATE_GROUP_NAME.to_string()))
        }
        _ => AppError::Database(err),
    }
}
