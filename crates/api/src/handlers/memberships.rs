//! Handlers for the `/memberships` resource.
//!
//! Only tree admins see or change a tree's memberships; to everyone else they
//! do not exist.

use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode};
use axum::Json;
use figtree_core::error::CoreError;
use figtree_core::types::DbId;
use figtree_db::models::membership::{CreateMembership, TreeMembership, UpdateMembership};
use figtree_db::repositories::MembershipRepo;

use crate::error::{AppError, AppResult};
use crate::guard;
use crate::middleware::auth::AuthUser;
use crate::query::TreeListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/memberships
pub async fn list_memberships(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<TreeListParams>,
) -> AppResult<Json<DataResponse<Vec<TreeMembership>>>> {
    let scope = state.access.membership_scope(auth.user_id);
    let page = params.page();
    let memberships =
        MembershipRepo::list_scoped(&state.pool, &scope, params.tree_id, page.limit(), page.offset())
            .await?;
    Ok(Json(DataResponse { data: memberships }))
}

/// POST /api/v1/memberships
///
/// Grant a user a role on a tree the caller administers.
pub async fn create_membership(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateMembership>,
) -> AppResult<(StatusCode, Json<DataResponse<TreeMembership>>)> {
    guard::administer_tree(&state, &auth, input.tree_id).await?;

    let membership = MembershipRepo::create(&state.pool, &input).await?;
    tracing::info!(
        user_id = auth.user_id,
        tree_id = membership.tree_id,
        member_id = membership.user_id,
        role = %membership.role,
        "Membership granted"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: membership })))
}

/// GET /api/v1/memberships/{id}
pub async fn get_membership(
    State(state): State<AppState>,
    auth: AuthUser,
    method: Method,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TreeMembership>>> {
    let membership = guard::membership(&state, &auth, id, guard::mode_of(&method)).await?;
    Ok(Json(DataResponse { data: membership }))
}

/// PUT /api/v1/memberships/{id}
///
/// Change the role. The tree and user of a membership never change.
pub async fn update_membership(
    State(state): State<AppState>,
    auth: AuthUser,
    method: Method,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMembership>,
) -> AppResult<Json<DataResponse<TreeMembership>>> {
    guard::membership(&state, &auth, id, guard::mode_of(&method)).await?;

    let membership = MembershipRepo::update_role(&state.pool, id, input.role)
        .await?
        .ok_or(AppError::Core(CoreError::not_found(guard::MEMBERSHIP_ENTITY, id)))?;
    tracing::info!(
        user_id = auth.user_id,
        membership_id = id,
        role = %membership.role,
        "Membership role changed"
    );
    Ok(Json(DataResponse { data: membership }))
}

/// DELETE /api/v1/memberships/{id}
pub async fn delete_membership(
    State(state): State<AppState>,
    auth: AuthUser,
    method: Method,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    guard::membership(&state, &auth, id, guard::mode_of(&method)).await?;

    if !MembershipRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found(guard::MEMBERSHIP_ENTITY, id)));
    }
    tracing::info!(user_id = auth.user_id, membership_id = id, "Membership removed");
    Ok(StatusCode::NO_CONTENT)
}
