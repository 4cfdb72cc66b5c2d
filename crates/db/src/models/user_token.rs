//! Single-use email tokens (account activation, password reset).

use figtree_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// What a [`UserToken`] may be redeemed for. Persisted as SMALLINT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    Activation,
    PasswordReset,
}

impl TokenPurpose {
    pub fn id(self) -> i16 {
        match self {
            TokenPurpose::Activation => 1,
            TokenPurpose::PasswordReset => 2,
        }
    }
}

/// A row from the `user_tokens` table. Only the SHA-256 hash of the token
/// is stored; the plaintext exists only in the email sent to the user.
#[derive(Debug, Clone, FromRow)]
pub struct UserToken {
    pub id: DbId,
    pub user_id: DbId,
    pub purpose: i16,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub used_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateUserToken {
    pub user_id: DbId,
    pub purpose: TokenPurpose,
    pub token_hash: String,
    pub expires_at: Timestamp,
}
