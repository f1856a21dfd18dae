//! Tests for `AppError` → HTTP response mapping.
//!
//! Most call `IntoResponse` directly on `AppError` values; the last one goes
//! through the router to check a real constraint failure.

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use biome_api::error::AppError;
use biome_core::error::CoreError;
use http_body_util::BodyExt;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let (status, json) = error_to_response(AppError::not_found("Project", 42)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Project with id 42 not found");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let (status, json) = error_to_response(AppError::validation("Project name is required")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Project name is required");
}

#[tokio::test]
async fn conflict_error_returns_409() {
    let err = AppError::Core(CoreError::Conflict("duplicate name".into()));
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "duplicate name");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn internal_error_is_sanitized() {
    let (status, json) =
        error_to_response(AppError::InternalError("disk path /secret leaked".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}

#[test]
fn core_errors_convert_into_app_errors() {
    let err: AppError = CoreError::Validation("bad".into()).into();
    assert_matches!(err, AppError::Core(CoreError::Validation(msg)) if msg == "bad");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn constraint_failure_returns_500_with_database_message(pool: sqlx::SqlitePool) {
    let id = common::create_project(&pool, serde_json::json!({"name": "Foo"})).await;

    let response = common::put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/projects/{id}"),
        serde_json::json!({"name": null}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = common::body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_matches!(json["error"].as_str(), Some(msg) if msg.contains("NOT NULL constraint failed"));

    let stored: String = sqlx::query_scalar("SELECT name FROM projects WHERE id = ?")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, "Foo");
}
