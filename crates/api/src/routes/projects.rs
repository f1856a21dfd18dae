//! Route definitions for the `/projects` resource, its journal and its
//! activity log.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{activities, journal, projects};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /activities                        -> recent
/// GET    /activities/export                 -> export
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
/// GET    /{id}/activities                   -> for_project
/// POST   /{id}/users                        -> set_users
///
/// GET    /{id}/journal                      -> list
/// POST   /{id}/journal                      -> create
/// PATCH  /{id}/journal/{entry_id}           -> update
/// DELETE /{id}/journal/{entry_id}           -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route("/activities", get(activities::recent))
        .route("/activities/export", get(activities::export))
        .route(
            "/{id}",
            get(projects::get_by_id)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route("/{id}/activities", get(activities::for_project))
        .route("/{id}/users", post(projects::set_users))
        .route("/{id}/journal", get(journal::list).post(journal::create))
        .route(
            "/{id}/journal/{entry_id}",
            patch(journal::update).delete(journal::delete),
        )
}
