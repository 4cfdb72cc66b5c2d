//! Handlers shared by every record collection (`/people`, `/events`, ...).
//!
//! Each handler is generic over the record kind and mounted once per kind by
//! [`crate::routes::records`].

use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode};
use axum::Json;
use figtree_core::error::CoreError;
use figtree_core::types::DbId;
use figtree_db::models::records::{NewRecord, RecordInput, RecordPatch};
use figtree_db::repositories::{RecordRepo, TreeRecord};

use crate::error::{AppError, AppResult};
use crate::guard;
use crate::middleware::auth::AuthUser;
use crate::query::TreeListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/{records}
///
/// Records the caller may read, newest first. Filtering happens in the
/// query, so pages are never short because of hidden rows.
pub async fn list<T: TreeRecord>(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<TreeListParams>,
) -> AppResult<Json<DataResponse<Vec<T>>>> {
    let scope = state.access.record_scope(auth.user_id);
    let page = params.page();
    let records =
        RecordRepo::list_scoped::<T>(&state.pool, &scope, params.tree_id, page.limit(), page.offset())
            .await?;
    Ok(Json(DataResponse { data: records }))
}

/// POST /api/v1/{records}
pub async fn create<T: TreeRecord>(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<NewRecord<T::Create>>,
) -> AppResult<(StatusCode, Json<DataResponse<T>>)> {
    guard::add_records(&state, &auth, input.tree_id).await?;
    input.fields.validate()?;

    let private = state.access.effective_private(input.private);
    let record = RecordRepo::create::<T>(&state.pool, input.tree_id, private, &input.fields).await?;

    tracing::info!(
        user_id = auth.user_id,
        tree_id = input.tree_id,
        kind = %T::KIND,
        id = record.id(),
        "Record created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// GET /api/v1/{records}/{id}
pub async fn get<T: TreeRecord>(
    State(state): State<AppState>,
    auth: AuthUser,
    method: Method,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<T>>> {
    let record = guard::record::<T>(&state, &auth, id, guard::mode_of(&method)).await?;
    Ok(Json(DataResponse { data: record }))
}

/// PUT /api/v1/{records}/{id}
///
/// Partial update. The record stays in its tree.
pub async fn update<T: TreeRecord>(
    State(state): State<AppState>,
    auth: AuthUser,
    method: Method,
    Path(id): Path<DbId>,
    Json(input): Json<RecordPatch<T::Update>>,
) -> AppResult<Json<DataResponse<T>>> {
    let current = guard::record::<T>(&state, &auth, id, guard::mode_of(&method)).await?;
    input.fields.validate()?;

    let record = RecordRepo::update::<T>(
        &state.pool,
        id,
        current.tree_id(),
        input.private,
        &input.fields,
    )
    .await?
    .ok_or(AppError::Core(CoreError::not_found(T::KIND.entity(), id)))?;

    tracing::info!(user_id = auth.user_id, kind = %T::KIND, id, "Record updated");
    Ok(Json(DataResponse { data: record }))
}

/// DELETE /api/v1/{records}/{id}
///
/// Attachments of the record are deleted with it.
pub async fn delete<T: TreeRecord>(
    State(state): State<AppState>,
    auth: AuthUser,
    method: Method,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    guard::record::<T>(&state, &auth, id, guard::mode_of(&method)).await?;

    if !RecordRepo::delete(&state.pool, T::KIND, id).await? {
        return Err(AppError::Core(CoreError::not_found(T::KIND.entity(), id)));
    }
    tracing::info!(user_id = auth.user_id, kind = %T::KIND, id, "Record deleted");
    Ok(StatusCode::NO_CONTENT)
}
