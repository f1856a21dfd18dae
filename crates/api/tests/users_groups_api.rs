//! HTTP-level tests for the users and groups resources.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_project, delete, get, post_json, put_json};
use serde_json::json;
use sqlx::SqlitePool;

async fn create_group(pool: &SqlitePool, name: &str) -> i64 {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/groups",
        json!({"name": name, "description": "imaging core"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

async fn create_user(pool: &SqlitePool, name: &str, group_id: Option<i64>) -> i64 {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/users",
        json!({"name": name, "email": format!("{name}@lab.org"), "group_id": group_id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_group_name_returns_409(pool: SqlitePool) {
    create_group(&pool, "Lab").await;

    let response = post_json(
        common::build_test_app(pool),
        "/api/groups",
        json!({"name": "Lab"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["error"], "A group with this name already exists");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn group_without_name_returns_400(pool: SqlitePool) {
    let response = post_json(common::build_test_app(pool), "/api/groups", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Group name is required");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_and_list_groups(pool: SqlitePool) {
    let id = create_group(&pool, "Zeta").await;
    create_group(&pool, "Alpha").await;

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/groups/{id}"),
        json!({"name": "Beta", "description": null}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Beta");
    assert!(json["description"].is_null());

    let list = body_json(get(common::build_test_app(pool), "/api/groups").await).await;
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deleting_group_keeps_members(pool: SqlitePool) {
    let group = create_group(&pool, "Lab").await;
    let user = create_user(&pool, "jane", Some(group)).await;

    let members = body_json(
        get(common::build_test_app(pool.clone()), &format!("/api/groups/{group}/users")).await,
    )
    .await;
    assert_eq!(members.as_array().unwrap().len(), 1);
    assert_eq!(members[0]["group_name"], "Lab");

    let response = delete(common::build_test_app(pool.clone()), &format!("/api/groups/{group}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get(common::build_test_app(pool), &format!("/api/users/{user}")).await).await;
    assert!(json["group_id"].is_null());
    assert!(json["group_name"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_group_returns_404(pool: SqlitePool) {
    let response = get(common::build_test_app(pool.clone()), "/api/groups/55").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = delete(common::build_test_app(pool), "/api/groups/55").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn user_with_unknown_group_returns_400(pool: SqlitePool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/users",
        json!({"name": "ghost", "group_id": 404}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_user_changes_group(pool: SqlitePool) {
    let lab = create_group(&pool, "Lab").await;
    let core = create_group(&pool, "Core").await;
    let user = create_user(&pool, "jane", Some(lab)).await;

    let response = put_json(
        common::build_test_app(pool),
        &format!("/api/users/{user}"),
        json!({"name": "Jane", "email": "", "group_id": core}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Jane");
    assert!(json["email"].is_null());
    assert_eq!(json["group_name"], "Core");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn project_views_join_owner_and_group(pool: SqlitePool) {
    let group = create_group(&pool, "Lab").await;
    let user = create_user(&pool, "jane", Some(group)).await;
    let project = create_project(&pool, json!({"name": "Foo", "user_id": user})).await;

    let detail = body_json(
        get(common::build_test_app(pool.clone()), &format!("/api/projects/{project}")).await,
    )
    .await;
    assert_eq!(detail["user_name"], "jane");
    assert_eq!(detail["user_email"], "jane@lab.org");
    assert_eq!(detail["group_name"], "Lab");
    assert_eq!(detail["group_id"], group);

    let owned = body_json(
        get(common::build_test_app(pool), &format!("/api/users/{user}/projects")).await,
    )
    .await;
    assert_eq!(owned.as_array().unwrap().len(), 1);
    assert_eq!(owned[0]["name"], "Foo");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deleting_user_clears_project_owner(pool: SqlitePool) {
    let user = create_user(&pool, "jane", None).await;
    let project = create_project(&pool, json!({"name": "Foo", "user_id": user})).await;

    let response = delete(common::build_test_app(pool.clone()), &format!("/api/users/{user}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let detail = body_json(
        get(common::build_test_app(pool), &format!("/api/projects/{project}")).await,
    )
    .await;
    assert!(detail["user_id"].is_null());
    assert!(detail["user_name"].is_null());
}
