//! Handlers for the activity feed and the activity export.

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::Json;
use biome_core::export::{write_csv, write_xlsx, ExportFormat, ExportRow};
use biome_core::types::DbId;
use biome_db::models::activity::DisplayActivity;
use biome_db::repositories::activity_repo::RECENT_ACTIVITY_LIMIT;
use biome_db::repositories::ActivityRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::projects::ensure_project;
use crate::state::AppState;

/// Query parameters for the export endpoint.
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    pub format: Option<String>,
}

/// GET /api/projects/activities
///
/// Latest activities across all projects, newest first.
pub async fn recent(State(state): State<AppState>) -> AppResult<Json<Vec<DisplayActivity>>> {
    let items = ActivityRepo::list_recent(&state.pool, RECENT_ACTIVITY_LIMIT).await?;
    Ok(Json(items.into_iter().map(DisplayActivity::from).collect()))
}

/// GET /api/projects/{id}/activities
pub async fn for_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<DisplayActivity>>> {
    ensure_project(&state.pool, project_id).await?;
    let activities = ActivityRepo::list_for_project(&state.pool, project_id).await?;
    Ok(Json(
        activities.into_iter().map(DisplayActivity::from).collect(),
    ))
}

/// GET /api/projects/activities/export?format=csv|xlsx
///
/// Full activity log as a file download.
pub async fn export(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> AppResult<Response> {
    let format = ExportFormat::parse(params.format.as_deref())?;

    let records = ActivityRepo::list_for_export(&state.pool).await?;
    let rows: Vec<ExportRow> = records.iter().map(|r| r.to_export_row()).collect();

    let bytes = match format {
        ExportFormat::Csv => write_csv(&rows)?,
        ExportFormat::Xlsx => write_xlsx(&rows, &chrono::Utc::now())?,
    };

    tracing::info!(rows = rows.len(), ?format, "Exported activity log");

    let disposition = format!("attachment; filename={}", format.file_name());
    Ok((
        [
            (CONTENT_TYPE, format.content_type().to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
