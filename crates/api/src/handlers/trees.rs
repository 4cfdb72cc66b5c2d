//! Handlers for the `/trees` resource.

use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode};
use axum::Json;
use figtree_core::error::CoreError;
use figtree_core::types::DbId;
use figtree_db::models::tree::{CreateTree, FamilyTree, UpdateTree};
use figtree_db::repositories::TreeRepo;

use crate::error::{AppError, AppResult};
use crate::guard;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/trees
///
/// Trees the caller is a member of.
pub async fn list_trees(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<FamilyTree>>>> {
    let scope = state.access.tree_scope(auth.user_id);
    let trees = TreeRepo::list_scoped(&state.pool, &scope, params.limit(), params.offset()).await?;
    Ok(Json(DataResponse { data: trees }))
}

/// POST /api/v1/trees
///
/// Any authenticated user may create a tree and becomes its admin.
pub async fn create_tree(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateTree>,
) -> AppResult<(StatusCode, Json<DataResponse<FamilyTree>>)> {
    input.validate()?;
    let (tree, membership) = TreeRepo::create_with_admin(&state.pool, &input, auth.user_id).await?;
    tracing::info!(
        user_id = auth.user_id,
        tree_id = tree.id,
        membership_id = membership.id,
        "Family tree created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: tree })))
}

/// GET /api/v1/trees/{id}
pub async fn get_tree(
    State(state): State<AppState>,
    auth: AuthUser,
    method: Method,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<FamilyTree>>> {
    let tree = guard::tree(&state, &auth, id, guard::mode_of(&method)).await?;
    Ok(Json(DataResponse { data: tree }))
}

/// PUT /api/v1/trees/{id}
pub async fn update_tree(
    State(state): State<AppState>,
    auth: AuthUser,
    method: Method,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTree>,
) -> AppResult<Json<DataResponse<FamilyTree>>> {
    guard::tree(&state, &auth, id, guard::mode_of(&method)).await?;
    input.validate()?;

    let tree = TreeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::not_found(guard::TREE_ENTITY, id)))?;
    tracing::info!(user_id = auth.user_id, tree_id = id, "Family tree updated");
    Ok(Json(DataResponse { data: tree }))
}

/// DELETE /api/v1/trees/{id}
///
/// Deletes the tree with every record and membership it owns.
pub async fn delete_tree(
    State(state): State<AppState>,
    auth: AuthUser,
    method: Method,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    guard::tree(&state, &auth, id, guard::mode_of(&method)).await?;

    if !TreeRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found(guard::TREE_ENTITY, id)));
    }
    tracing::info!(user_id = auth.user_id, tree_id = id, "Family tree deleted");
    Ok(StatusCode::NO_CONTENT)
}
