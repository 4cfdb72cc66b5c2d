//! Tree-scoped access checks for handlers.
//!
//! Each check looks up the acting user's current membership role, asks the
//! [`AccessPolicy`](figtree_core::access::AccessPolicy) in application state,
//! and turns a denial into an error: [`Denial::Conceal`] becomes 404 so the
//! target's existence is not revealed, [`Denial::Forbid`] becomes 403.

use axum::http::Method;
use figtree_core::access::{AccessMode, Denial};
use figtree_core::error::CoreError;
use figtree_core::roles::TreeRole;
use figtree_core::types::DbId;
use figtree_db::models::membership::TreeMembership;
use figtree_db::models::tree::FamilyTree;
use figtree_db::repositories::{MembershipRepo, RecordRepo, TreeRecord, TreeRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub const TREE_ENTITY: &str = "FamilyTree";
pub const MEMBERSHIP_ENTITY: &str = "TreeMembership";

/// Access mode implied by a request method.
pub fn mode_of(method: &Method) -> AccessMode {
    AccessMode::for_method(method.as_str())
}

async fn role_on(state: &AppState, user: &AuthUser, tree_id: DbId) -> AppResult<Option<TreeRole>> {
    Ok(MembershipRepo::find_role(&state.pool, user.user_id, tree_id).await?)
}

fn deny(denial: Denial, entity: &'static str, id: DbId, action: &str) -> AppError {
    match denial {
        Denial::Conceal => AppError::Core(CoreError::not_found(entity, id)),
        Denial::Forbid => AppError::Core(CoreError::forbidden(format!(
            "Your role on this family tree does not allow you to {action}"
        ))),
    }
}

/// Load a tree and check `mode` access to it.
pub async fn tree(
    state: &AppState,
    user: &AuthUser,
    tree_id: DbId,
    mode: AccessMode,
) -> AppResult<FamilyTree> {
    let not_found = || AppError::Core(CoreError::not_found(TREE_ENTITY, tree_id));
    let tree = TreeRepo::find_by_id(&state.pool, tree_id)
        .await?
        .ok_or_else(not_found)?;

    let role = role_on(state, user, tree_id).await?;
    match state.access.tree_denial(role, mode) {
        None => Ok(tree),
        Some(denial) => {
            tracing::debug!(user_id = user.user_id, tree_id, ?denial, "Tree access denied");
            Err(deny(denial, TREE_ENTITY, tree_id, "change the tree"))
        }
    }
}

/// Check that the user may administer the memberships of `tree_id`.
///
/// Used when granting access, before any membership row exists.
pub async fn administer_tree(state: &AppState, user: &AuthUser, tree_id: DbId) -> AppResult<()> {
    let role = role_on(state, user, tree_id).await?;
    match state.access.membership_denial(role, AccessMode::Write) {
        None => Ok(()),
        Some(denial) => Err(deny(denial, TREE_ENTITY, tree_id, "manage memberships")),
    }
}

/// Load a membership and check `mode` access to it.
pub async fn membership(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
    mode: AccessMode,
) -> AppResult<TreeMembership> {
    let not_found = || AppError::Core(CoreError::not_found(MEMBERSHIP_ENTITY, id));
    let membership = MembershipRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;

    let role = role_on(state, user, membership.tree_id).await?;
    match state.access.membership_denial(role, mode) {
        None => Ok(membership),
        Some(denial) => Err(deny(denial, MEMBERSHIP_ENTITY, id, "manage memberships")),
    }
}

/// Load a record of kind `T` and check `mode` access to it.
pub async fn record<T: TreeRecord>(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
    mode: AccessMode,
) -> AppResult<T> {
    let entity = T::KIND.entity();
    let record: T = RecordRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::not_found(entity, id)))?;

    let role = role_on(state, user, record.tree_id()).await?;
    match state.access.record_denial(role, Some(record.private()), mode) {
        None => Ok(record),
        Some(denial) => {
            tracing::debug!(
                user_id = user.user_id,
                kind = %T::KIND,
                id,
                ?denial,
                "Record access denied"
            );
            Err(deny(denial, entity, id, "change its records"))
        }
    }
}

/// Check that the user may add records to `tree_id`.
pub async fn add_records(state: &AppState, user: &AuthUser, tree_id: DbId) -> AppResult<()> {
    let role = role_on(state, user, tree_id).await?;
    match state.access.create_denial(role) {
        None => Ok(()),
        Some(denial) => Err(deny(denial, TREE_ENTITY, tree_id, "add records")),
    }
}
