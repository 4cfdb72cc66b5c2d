//! Refresh sessions. Each login opens one; each refresh rotates it.

use figtree_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `refresh_sessions` table, keyed by the SHA-256 hash of
/// the refresh token handed to the client.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshSession {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl RefreshSession {
    /// Whether the token can still be exchanged at `now`.
    pub fn is_live(&self, now: Timestamp) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}

#[derive(Debug, Clone)]
pub struct NewRefreshSession {
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> Timestamp {
        Timestamp::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn expired_or_revoked_sessions_are_dead() {
        let mut session = RefreshSession {
            id: 1,
            user_id: 1,
            token_hash: "ab".repeat(32),
            expires_at: at(1_000),
            revoked_at: None,
            created_at: at(0),
            updated_at: at(0),
        };
        assert!(session.is_live(at(999)));
        assert!(!session.is_live(at(1_000)));

        session.revoked_at = Some(at(10));
        assert!(!session.is_live(at(500)));
    }
}
