//! Errors raised by multi-step repository writes.

use figtree_core::records::RecordRef;
use figtree_core::types::DbId;

/// A write rejected by a storage-level invariant, or a database failure.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// A foreign key or `subject` points at a record that is missing or
    /// belongs to another tree.
    #[error("{field}: {} {} does not exist in this tree", .target.kind.entity(), .target.id)]
    InvalidReference {
        field: &'static str,
        target: RecordRef,
    },

    /// The change would leave the tree without an admin membership.
    #[error("family tree {tree_id} must keep at least one admin")]
    LastAdmin { tree_id: DbId },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
