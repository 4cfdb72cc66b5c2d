//! Tree membership model and DTOs.

use figtree_core::roles::TreeRole;
use figtree_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tree_memberships` table: one user's role on one tree.
///
/// `role` is stored as its numeric level and decoded into [`TreeRole`];
/// it serializes by name (`"read_private"`).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TreeMembership {
    pub id: DbId,
    pub tree_id: DbId,
    pub user_id: DbId,
    #[sqlx(try_from = "i16")]
    pub role: TreeRole,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for granting a user access to a tree.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMembership {
    pub tree_id: DbId,
    pub user_id: DbId,
    /// Defaults to [`TreeRole::Read`].
    pub role: Option<TreeRole>,
}

/// Only the role of an existing membership can change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMembership {
    pub role: TreeRole,
}
