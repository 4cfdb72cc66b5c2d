use axum::routing::get;
use axum::Router;

use crate::handlers::trees;
use crate::state::AppState;

/// Routes mounted at `/trees`.
///
/// ```text
/// GET    /      -> list_trees
/// POST   /      -> create_tree
/// GET    /{id}  -> get_tree
/// PUT    /{id}  -> update_tree
/// DELETE /{id}  -> delete_tree
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(trees::list_trees).post(trees::create_tree))
        .route(
            "/{id}",
            get(trees::get_tree)
                .put(trees::update_tree)
                .delete(trees::delete_tree),
        )
}
