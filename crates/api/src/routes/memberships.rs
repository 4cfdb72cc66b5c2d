use axum::routing::get;
use axum::Router;

use crate::handlers::memberships;
use crate::state::AppState;

/// Routes mounted at `/memberships`.
///
/// ```text
/// GET    /      -> list_memberships
/// POST   /      -> create_membership
/// GET    /{id}  -> get_membership
/// PUT    /{id}  -> update_membership
/// DELETE /{id}  -> delete_membership
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(memberships::list_memberships).post(memberships::create_membership),
        )
        .route(
            "/{id}",
            get(memberships::get_membership)
                .put(memberships::update_membership)
                .delete(memberships::delete_membership),
        )
}
