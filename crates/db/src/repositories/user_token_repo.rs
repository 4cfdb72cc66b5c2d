//! Repository for the `user_tokens` table.

use figtree_core::types::DbId;
use sqlx::PgPool;

use crate::models::user_token::{CreateUserToken, TokenPurpose, UserToken};

const COLUMNS: &str = "id, user_id, purpose, token_hash, expires_at, used_at, created_at, updated_at";

pub struct UserTokenRepo;

impl UserTokenRepo {
    pub async fn create(pool: &PgPool, input: &CreateUserToken) -> Result<UserToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_tokens (user_id, purpose, token_hash, expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserToken>(&query)
            .bind(input.user_id)
            .bind(input.purpose.id())
            .bind(&input.token_hash)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Redeem a token: mark it used if it has the given purpose, is unused and
    /// has not expired. Returns `None` otherwise.
    ///
    /// The single `UPDATE ... RETURNING` guarantees a token is redeemed at most
    /// once even under concurrent requests.
    pub async fn consume(
        pool: &PgPool,
        purpose: TokenPurpose,
        token_hash: &str,
    ) -> Result<Option<UserToken>, sqlx::Error> {
        let query = format!(
            "UPDATE user_tokens SET used_at = NOW()
             WHERE token_hash = $1
               AND purpose = $2
               AND used_at IS NULL
               AND expires_at > NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserToken>(&query)
            .bind(token_hash)
            .bind(purpose.id())
            .fetch_optional(pool)
            .await
    }

    /// Invalidate every outstanding token of one purpose for a user.
    pub async fn invalidate_for_user(
        pool: &PgPool,
        user_id: DbId,
        purpose: TokenPurpose,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_tokens SET used_at = NOW()
             WHERE user_id = $1 AND purpose = $2 AND used_at IS NULL",
        )
        .bind(user_id)
        .bind(purpose.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
