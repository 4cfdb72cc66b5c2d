//! Credentials and tokens.
//!
//! - [`password`]: Argon2id hashing and strength checks.
//! - [`jwt`]: access tokens and opaque refresh tokens.
//! - [`email_token`]: single-use activation and password-reset tokens.

pub mod email_token;
pub mod jwt;
pub mod password;

use sha2::{Digest, Sha256};

/// SHA-256 hex digest of an opaque token. Only digests are persisted.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
