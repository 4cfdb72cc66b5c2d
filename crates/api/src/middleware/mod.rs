//! Request extractors for authentication and account roles.
//!
//! - [`auth::AuthUser`]: the user behind a JWT Bearer token.
//! - [`rbac::RequireStaff`]: an authenticated staff account.
//!
//! Tree roles are not checked here; see [`crate::guard`].

pub mod auth;
pub mod rbac;
