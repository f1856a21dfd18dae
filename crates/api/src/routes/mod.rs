pub mod groups;
pub mod health;
pub mod projects;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                        list, create
/// /projects/activities                             recent activity feed
/// /projects/activities/export                      csv / xlsx download
/// /projects/{id}                                   get, update, delete
/// /projects/{id}/activities                        project activity log
/// /projects/{id}/users                             replace assigned users (POST)
/// /projects/{id}/journal                           list, add
/// /projects/{id}/journal/{entry_id}                edit (PATCH), delete
///
/// /users                                           list, create
/// /users/{id}                                      get, update, delete
/// /users/{id}/projects                             projects owned by the user
///
/// /groups                                          list, create
/// /groups/{id}                                     get, update, delete
/// /groups/{id}/users                               group members
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", projects::router())
        .nest("/users", users::router())
        .nest("/groups", groups::router())
}
