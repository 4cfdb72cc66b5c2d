pub mod admin;
pub mod auth;
pub mod memberships;
pub mod records;
pub mod trees;
