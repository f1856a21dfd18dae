use axum::routing::get;
use axum::Router;

use crate::handlers::groups;
use crate::state::AppState;

/// Routes mounted at `/groups`.
///
/// ```text
/// GET    /                -> list
/// POST   /                -> create
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update
/// DELETE /{id}            -> delete
/// GET    /{id}/users      -> users
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(groups::list).post(groups::create))
        .route(
            "/{id}",
            get(groups::get_by_id)
                .put(groups::update)
                .delete(groups::delete),
        )
        .route("/{id}/users", get(groups::users))
}
