//! HTTP-level tests for project journal entries and their activities.

mod common;

use axum::http::StatusCode;
use biome_core::activity::activity_types;
use common::{body_json, create_project, delete, get, patch_json, post_json, project_activities};
use serde_json::json;
use sqlx::SqlitePool;

async fn add_entry(pool: &SqlitePool, project_id: i64, text: &str) -> serde_json::Value {
    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/projects/{project_id}/journal"),
        json!({"entry_text": text}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[sqlx::test(migrations = "../db/migrations")]
async fn add_entry_records_preview_activity(pool: SqlitePool) {
    let id = create_project(&pool, json!({"name": "Foo"})).await;
    let entry = add_entry(&pool, id, "Imaged 12 wells").await;
    assert_eq!(entry["entry_text"], "Imaged 12 wells");
    assert!(entry["edited_at"].is_null());

    let activities = project_activities(&pool, id).await;
    assert_eq!(activities[0]["activity_type"], activity_types::JOURNAL_ENTRY);
    assert_eq!(activities[0]["details"], "Imaged 12 wells");
    assert!(activities[0]["changed_fields"].is_null());
    assert_eq!(activities[0]["changed_fields_display"], json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn long_entry_preview_is_truncated_with_ellipsis(pool: SqlitePool) {
    let id = create_project(&pool, json!({"name": "Foo"})).await;
    let text = "x".repeat(150);
    add_entry(&pool, id, &text).await;

    let activities = project_activities(&pool, id).await;
    let details = activities[0]["details"].as_str().unwrap();
    assert_eq!(details.chars().count(), 103);
    assert!(details.ends_with("..."));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn blank_entry_returns_400(pool: SqlitePool) {
    let id = create_project(&pool, json!({"name": "Foo"})).await;
    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/projects/{id}/journal"),
        json!({"entry_text": "   "}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Entry text is required");
    assert_eq!(project_activities(&pool, id).await.len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn entry_for_unknown_project_returns_404(pool: SqlitePool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/projects/777/journal",
        json!({"entry_text": "hello"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn adding_entry_touches_project(pool: SqlitePool) {
    let id = create_project(&pool, json!({"name": "Foo"})).await;
    sqlx::query("UPDATE projects SET last_updated = '2020-01-01 00:00:00' WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();

    add_entry(&pool, id, "touch").await;

    let last_updated: String = sqlx::query_scalar("SELECT last_updated FROM projects WHERE id = ?")
        .bind(id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_ne!(last_updated, "2020-01-01 00:00:00");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn edit_entry_records_from_to_change(pool: SqlitePool) {
    let id = create_project(&pool, json!({"name": "Foo"})).await;
    let entry = add_entry(&pool, id, "first draft").await;
    let entry_id = entry["id"].as_i64().unwrap();

    let response = patch_json(
        common::build_test_app(pool.clone()),
        &format!("/api/projects/{id}/journal/{entry_id}"),
        json!({"entry_text": "final text", "edited_by": "jane"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["entry_text"], "final text");
    assert_eq!(updated["edited_by"], "jane");
    assert!(updated["edited_at"].is_string());

    let activities = project_activities(&pool, id).await;
    let edit = &activities[0];
    assert_eq!(edit["activity_type"], activity_types::JOURNAL_ENTRY_EDITED);
    assert_eq!(edit["details"], "final text");
    assert_eq!(
        edit["changed_fields"],
        r#"{"journal_entry":{"from":"first draft","to":"final text"}}"#
    );
    assert_eq!(
        edit["changed_fields_display"],
        json!(["Journal Entry: first draft → final text"])
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn edit_entry_of_other_project_returns_404(pool: SqlitePool) {
    let a = create_project(&pool, json!({"name": "A"})).await;
    let b = create_project(&pool, json!({"name": "B"})).await;
    let entry_id = add_entry(&pool, a, "belongs to A").await["id"].as_i64().unwrap();

    let response = patch_json(
        common::build_test_app(pool.clone()),
        &format!("/api/projects/{b}/journal/{entry_id}"),
        json!({"entry_text": "hijack"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(project_activities(&pool, b).await.len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_entry_records_truncated_details(pool: SqlitePool) {
    let id = create_project(&pool, json!({"name": "Foo"})).await;
    let text = "y".repeat(120);
    let entry_id = add_entry(&pool, id, &text).await["id"].as_i64().unwrap();

    let response = delete(
        common::build_test_app(pool.clone()),
        &format!("/api/projects/{id}/journal/{entry_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let activities = project_activities(&pool, id).await;
    assert_eq!(activities[0]["activity_type"], activity_types::JOURNAL_ENTRY_DELETED);
    assert_eq!(activities[0]["details"], "y".repeat(100));

    let entries = body_json(
        get(common::build_test_app(pool), &format!("/api/projects/{id}/journal")).await,
    )
    .await;
    assert_eq!(entries, json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn project_detail_embeds_journal_newest_first(pool: SqlitePool) {
    let id = create_project(&pool, json!({"name": "Foo"})).await;
    add_entry(&pool, id, "one").await;
    add_entry(&pool, id, "two").await;

    let json = body_json(get(common::build_test_app(pool), &format!("/api/projects/{id}")).await).await;
    let entries = json["journal_entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["entry_text"], "two");
    assert_eq!(entries[1]["entry_text"], "one");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn journal_entry_survives_activity_insert_that_rolls_back(pool: SqlitePool) {
    let id = create_project(&pool, json!({"name": "Foo"})).await;
    common::fail_activity_inserts(&pool, "ROLLBACK").await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/projects/{id}/journal"),
        json!({"entry_text": "Segmented batch 3"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let entries = body_json(
        get(common::build_test_app(pool.clone()), &format!("/api/projects/{id}/journal")).await,
    )
    .await;
    assert_eq!(entries[0]["entry_text"], "Segmented batch 3");
    assert_eq!(project_activities(&pool, id).await.len(), 1);
}
