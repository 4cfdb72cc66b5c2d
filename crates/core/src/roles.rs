//! Role definitions.
//!
//! Two independent role systems exist:
//!
//! - **Account roles** (`ROLE_STAFF`, `ROLE_MEMBER`) are global and embedded
//!   in JWT claims. Staff may manage user accounts; they gain no access to
//!   family tree data from it.
//! - **Tree roles** ([`TreeRole`]) are granted per family tree through a
//!   membership row and decide access to the tree's records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Account role for users with `is_staff = true`.
pub const ROLE_STAFF: &str = "staff";
/// Account role for every other user.
pub const ROLE_MEMBER: &str = "member";

/// Resolve the account role name for a user row.
pub fn account_role(is_staff: bool) -> &'static str {
    if is_staff {
        ROLE_STAFF
    } else {
        ROLE_MEMBER
    }
}

/// Storage type of a tree role (SMALLINT).
pub type TreeRoleLevel = i16;

/// Tree roles, totally ordered by capability.
///
/// The discriminants are the values persisted in `tree_memberships.role`.
/// Variant declaration order matches numeric order, so the derived `Ord`
/// is the ordinal comparison used for every threshold check.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeRole {
    /// May read public records.
    Read = 10,
    /// May read public and private records.
    ReadPrivate = 20,
    /// May create, update and delete records.
    Write = 30,
    /// May edit the tree itself and administer its memberships.
    Admin = 40,
}

impl TreeRole {
    /// Every role, lowest first.
    pub const ALL: [TreeRole; 4] = [
        TreeRole::Read,
        TreeRole::ReadPrivate,
        TreeRole::Write,
        TreeRole::Admin,
    ];

    /// The persisted level of this role.
    pub fn level(self) -> TreeRoleLevel {
        self as TreeRoleLevel
    }

    /// Whether this role meets the given threshold.
    pub fn at_least(self, threshold: TreeRole) -> bool {
        self >= threshold
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TreeRole::Read => "read",
            TreeRole::ReadPrivate => "read_private",
            TreeRole::Write => "write",
            TreeRole::Admin => "admin",
        }
    }
}

impl fmt::Display for TreeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored level does not name a known role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown tree role level {0}")]
pub struct UnknownRoleLevel(pub TreeRoleLevel);

impl TryFrom<TreeRoleLevel> for TreeRole {
    type Error = UnknownRoleLevel;

    fn try_from(level: TreeRoleLevel) -> Result<Self, Self::Error> {
        TreeRole::ALL
            .into_iter()
            .find(|role| role.level() == level)
            .ok_or(UnknownRoleLevel(level))
    }
}

impl From<TreeRole> for TreeRoleLevel {
    fn from(role: TreeRole) -> Self {
        role.level()
    }
}
