//! JWT-based authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use figtree_core::error::CoreError;
use figtree_core::roles::account_role;
use figtree_core::types::DbId;
use figtree_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The user behind the `Authorization: Bearer <token>` header.
///
/// Handlers that take an `AuthUser` are unreachable without a valid token,
/// so every access check downstream has an acting user.
///
/// The token only identifies the account. Its `is_active` and `is_staff`
/// flags are read from the database on every request, so deactivation and
/// staff changes take effect before the token expires.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// Current account role (`"staff"` or `"member"`).
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| unauthorized("Account is not active"))?;

        Ok(AuthUser {
            user_id: user.id,
            role: account_role(user.is_staff).to_string(),
        })
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}
