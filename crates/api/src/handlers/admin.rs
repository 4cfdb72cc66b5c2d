//! Handlers for the `/admin` resource (account management).
//!
//! Every handler requires a staff account via [`RequireStaff`].

use axum::extract::{Path, Query, State};
use axum::Json;
use figtree_core::error::CoreError;
use figtree_core::types::DbId;
use figtree_db::models::user::{UpdateUser, UserResponse};
use figtree_db::repositories::{SessionRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool, params.limit(), params.offset()).await?;
    Ok(Json(DataResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("User", id)))?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// PUT /api/v1/admin/users/{id}
///
/// Toggle `is_active` / `is_staff`. Deactivating an account also revokes its
/// sessions. Staff cannot change their own flags.
pub async fn update_user(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if id == staff.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Staff cannot change their own account flags".into(),
        )));
    }

    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found("User", id)))?;

    if input.is_active == Some(false) {
        SessionRepo::revoke_all(&state.pool, id).await?;
    }

    tracing::info!(
        staff_id = staff.user_id,
        user_id = id,
        is_active = user.is_active,
        is_staff = user.is_staff,
        "User account updated"
    );
    Ok(Json(DataResponse { data: user.into() }))
}
