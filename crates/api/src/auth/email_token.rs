//! Single-use tokens delivered by email.

use chrono::{Duration, Utc};
use figtree_core::types::DbId;
use figtree_db::models::user_token::{CreateUserToken, TokenPurpose};
use uuid::Uuid;

use super::hash_token;

/// A freshly issued token: the plaintext for the email and the row to store.
#[derive(Debug)]
pub struct IssuedToken {
    pub plaintext: String,
    pub record: CreateUserToken,
}

/// Issue a token for `user_id` valid for `ttl`.
///
/// The plaintext is two v4 UUIDs in simple form (64 hex characters).
pub fn issue(user_id: DbId, purpose: TokenPurpose, ttl: Duration) -> IssuedToken {
    let plaintext = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    let record = CreateUserToken {
        user_id,
        purpose,
        token_hash: hash_token(&plaintext),
        expires_at: Utc::now() + ttl,
    };
    IssuedToken { plaintext, record }
}
