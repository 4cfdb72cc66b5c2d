//! Declarative list-scoping predicates.
//!
//! A scope describes which rows a user may list without evaluating the
//! access policy row by row. The repository layer renders each scope into a
//! SQL `EXISTS` clause; the `admits` methods state the same predicate in
//! Rust so it can be checked against [`AccessPolicy`](crate::access::AccessPolicy).

use crate::roles::TreeRole;
use crate::types::DbId;

/// Trees on which the user holds at least `min_role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeScope {
    pub user_id: DbId,
    pub min_role: TreeRole,
}

impl TreeScope {
    pub fn admits(&self, role: Option<TreeRole>) -> bool {
        role.is_some_and(|role| role.at_least(self.min_role))
    }
}

/// Memberships belonging to trees the user administers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MembershipScope {
    pub user_id: DbId,
    pub admin_role: TreeRole,
}

impl MembershipScope {
    /// `role` is the acting user's role on the membership's tree.
    pub fn admits(&self, role: Option<TreeRole>) -> bool {
        role.is_some_and(|role| role.at_least(self.admin_role))
    }
}

/// Records the user may read.
///
/// A record qualifies when the user's role on the record's tree is at least
/// `private_min`, or at least `public_min` and the record is not private.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordScope {
    pub user_id: DbId,
    pub private_min: TreeRole,
    pub public_min: TreeRole,
}

impl RecordScope {
    /// `role` is the user's role on the record's tree.
    pub fn admits(&self, role: Option<TreeRole>, private: bool) -> bool {
        match role {
            None => false,
            Some(role) => {
                role.at_least(self.private_min) || (role.at_least(self.public_min) && !private)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{AccessMode, AccessPolicy};

    fn roles() -> impl Iterator<Item = Option<TreeRole>> {
        TreeRole::ALL.map(Some).into_iter().chain([None])
    }

    #[test]
    fn record_scope_matches_policy_reads() {
        let policy = AccessPolicy::default();
        let scope = policy.record_scope(7);
        for role in roles() {
            for private in [true, false] {
                assert_eq!(
                    scope.admits(role, private),
                    policy.can_access_record(role, Some(private), AccessMode::Read),
                    "role={role:?} private={private}"
                );
            }
        }
    }

    #[test]
    fn tree_scope_matches_policy_reads() {
        let policy = AccessPolicy::default();
        let scope = policy.tree_scope(7);
        for role in roles() {
            assert_eq!(
                scope.admits(role),
                policy.can_access_tree(role, AccessMode::Read)
            );
        }
    }

    #[test]
    fn membership_scope_matches_policy() {
        let policy = AccessPolicy::default();
        let scope = policy.membership_scope(7);
        for role in roles() {
            assert_eq!(
                scope.admits(role),
                policy.can_access_membership(role, AccessMode::Read)
            );
        }
    }
}
