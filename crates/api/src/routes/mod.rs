pub mod admin;
pub mod auth;
pub mod health;
pub mod memberships;
pub mod records;
pub mod trees;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/signup, /auth/activate, /auth/login,     public
/// /auth/refresh, /auth/password-reset[/confirm]
/// /auth/logout, /auth/me                         authenticated
///
/// /trees[/{id}]                                  tree roles
/// /memberships[/{id}]                            tree admins
/// /{records}[/{id}]                              tree roles, one per record kind:
///                                                addresses citations events families
///                                                media names notes people places
///                                                repositories sources tags urls
///
/// /admin/users[/{id}]                            staff only
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/trees", trees::router())
        .nest("/memberships", memberships::router())
        .nest("/admin", admin::router())
        .merge(records::router())
}
