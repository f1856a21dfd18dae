//! Handlers for the `/users` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use biome_core::types::DbId;
use biome_core::validation::validate_required;
use biome_db::models::project::Project;
use biome_db::models::user::{User, UserInput};
use biome_db::repositories::{ProjectRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/users
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(UserRepo::list(&state.pool).await?))
}

/// POST /api/users
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<UserInput>,
) -> AppResult<(StatusCode, Json<User>)> {
    validate_required("User name", input.name.as_deref()).map_err(AppError::validation)?;
    let user = UserRepo::create(
        &state.pool,
        input.name.as_deref().unwrap_or_default(),
        email(&input),
        input.group_id,
    )
    .await?;
    tracing::info!(user_id = user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<User>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("User", id))?;
    Ok(Json(user))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UserInput>,
) -> AppResult<Json<User>> {
    validate_required("User name", input.name.as_deref()).map_err(AppError::validation)?;
    let user = UserRepo::update(
        &state.pool,
        id,
        input.name.as_deref().unwrap_or_default(),
        email(&input),
        input.group_id,
    )
    .await?
    .ok_or(AppError::not_found("User", id))?;
    Ok(Json(user))
}

/// DELETE /api/users/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if UserRepo::delete(&state.pool, id).await? {
        tracing::info!(user_id = id, "User deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("User", id))
    }
}

/// GET /api/users/{id}/projects
pub async fn projects(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Project>>> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("User", id))?;
    Ok(Json(ProjectRepo::list_by_user(&state.pool, id).await?))
}

fn email(input: &UserInput) -> Option<&str> {
    input.email.as_deref().filter(|e| !e.trim().is_empty())
}
