//! Domain logic for Fig Tree with no I/O dependencies.
//!
//! Everything here is pure: the role hierarchy, the access policy consulted
//! by every request, the scoping predicates handed to the storage layer,
//! record kinds, and input validation. The `db` and `api` crates build on it.

pub mod access;
pub mod error;
pub mod pagination;
pub mod records;
pub mod roles;
pub mod scope;
pub mod types;
pub mod validation;
