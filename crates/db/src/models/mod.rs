//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` row struct matching the database table
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for partial updates

pub mod membership;
pub mod records;
pub mod session;
pub mod tree;
pub mod user;
pub mod user_token;
