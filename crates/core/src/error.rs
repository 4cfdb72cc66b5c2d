//! Domain error taxonomy shared by the repository and HTTP layers.

use crate::types::DbId;

/// Errors produced by domain logic.
///
/// The HTTP layer maps each variant to one status code; see
/// `figtree_api::error::AppError`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The target does not exist, or the acting user may not see it.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed input, including references to records outside the tree.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The write would break a uniqueness or ownership invariant.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No acting user, or credentials that do not identify one.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The acting user can see the target but may not perform the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        CoreError::NotFound { entity, id }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        CoreError::Forbidden(message.into())
    }
}

impl From<crate::validation::ValidationError> for CoreError {
    fn from(err: crate::validation::ValidationError) -> Self {
        CoreError::Validation(err.to_string())
    }
}
