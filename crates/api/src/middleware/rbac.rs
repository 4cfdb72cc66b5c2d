//! Account-role extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use figtree_core::error::CoreError;
use figtree_core::roles::ROLE_STAFF;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires a staff account. Rejects with 403 otherwise.
///
/// Staff status grants account administration only, never tree access.
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_STAFF {
            return Err(AppError::Core(CoreError::Forbidden(
                "Staff account required".into(),
            )));
        }
        Ok(RequireStaff(user))
    }
}
