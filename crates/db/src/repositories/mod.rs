//! Repository layer: one zero-sized struct per table (or table family).

pub mod membership_repo;
pub mod record_repo;
pub mod records;
pub mod session_repo;
pub mod tree_repo;
pub mod user_repo;
pub mod user_token_repo;

pub use membership_repo::MembershipRepo;
pub use record_repo::{RecordRepo, TreeRecord};
pub use session_repo::SessionRepo;
pub use tree_repo::TreeRepo;
pub use user_repo::UserRepo;
pub use user_token_repo::UserTokenRepo;
