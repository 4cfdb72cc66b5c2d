//! Tree-scoped access policy.
//!
//! [`AccessPolicy`] is a pure evaluator: callers look up the acting user's
//! membership role on the relevant tree (or `None` when there is no
//! membership) and ask whether an operation is allowed. It never touches the
//! database and never errors for a normal deny.
//!
//! Thresholds live in an [`AccessConfig`] injected at construction so the
//! policy can be built once at startup and shared through application state.

use crate::roles::TreeRole;
use crate::scope::{MembershipScope, RecordScope, TreeScope};
use crate::types::DbId;

/// The intended effect of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

impl AccessMode {
    /// Map an HTTP method name to an access mode.
    ///
    /// Safe methods (`GET`, `HEAD`, `OPTIONS`) read; everything else writes.
    pub fn for_method(method: &str) -> Self {
        match method {
            "GET" | "HEAD" | "OPTIONS" => AccessMode::Read,
            _ => AccessMode::Write,
        }
    }

    pub fn is_write(self) -> bool {
        self == AccessMode::Write
    }
}

/// Role thresholds and visibility defaults consulted by [`AccessPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessConfig {
    /// Minimum role to read a tree.
    pub tree_read: TreeRole,
    /// Minimum role to modify a tree or delete it.
    pub tree_write: TreeRole,
    /// Minimum role to read or write a tree's memberships.
    pub membership_admin: TreeRole,
    /// Minimum role to read records whose private flag is false.
    pub record_read_public: TreeRole,
    /// Minimum role to read records regardless of their private flag.
    pub record_read_private: TreeRole,
    /// Minimum role to create, update or delete records.
    pub record_write: TreeRole,
    /// Visibility assumed for records whose private flag is unset.
    pub default_private: bool,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            tree_read: TreeRole::Read,
            tree_write: TreeRole::Admin,
            membership_admin: TreeRole::Admin,
            record_read_public: TreeRole::Read,
            record_read_private: TreeRole::ReadPrivate,
            record_write: TreeRole::Write,
            default_private: true,
        }
    }
}

/// How a denied operation should be reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// The user cannot see the target at all; report it as not found.
    Conceal,
    /// The user can see the target but may not perform this operation.
    Forbid,
}

/// Evaluates access decisions against an [`AccessConfig`].
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    config: AccessConfig,
}

impl AccessPolicy {
    pub fn new(config: AccessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    /// Resolve a possibly-unset private flag. Unset means the configured default.
    pub fn effective_private(&self, private: Option<bool>) -> bool {
        private.unwrap_or(self.config.default_private)
    }

    /// Whether a member holding `role` may access the tree itself.
    ///
    /// Reads need `tree_read`; writes (renaming, deleting) need `tree_write`.
    pub fn can_access_tree(&self, role: Option<TreeRole>, mode: AccessMode) -> bool {
        let Some(role) = role else {
            return false;
        };
        match mode {
            AccessMode::Read => role.at_least(self.config.tree_read),
            AccessMode::Write => role.at_least(self.config.tree_write),
        }
    }

    /// Whether a user holding `role` on a membership's tree may administer it.
    ///
    /// Reads and writes share the same threshold.
    pub fn can_access_membership(&self, role: Option<TreeRole>, _mode: AccessMode) -> bool {
        role.is_some_and(|role| role.at_least(self.config.membership_admin))
    }

    /// Whether a user holding `role` on a record's tree may access the record.
    pub fn can_access_record(
        &self,
        role: Option<TreeRole>,
        private: Option<bool>,
        mode: AccessMode,
    ) -> bool {
        let Some(role) = role else {
            return false;
        };
        match mode {
            AccessMode::Read => {
                role.at_least(self.config.record_read_private)
                    || (role.at_least(self.config.record_read_public)
                        && !self.effective_private(private))
            }
            AccessMode::Write => role.at_least(self.config.record_write),
        }
    }

    /// Whether a user holding `role` on a tree may add records to it.
    pub fn can_create_record(&self, role: Option<TreeRole>) -> bool {
        role.is_some_and(|role| role.at_least(self.config.record_write))
    }

    /// Classify a tree access. `None` means allowed.
    pub fn tree_denial(&self, role: Option<TreeRole>, mode: AccessMode) -> Option<Denial> {
        classify(
            self.can_access_tree(role, mode),
            self.can_access_tree(role, AccessMode::Read),
        )
    }

    /// Classify a membership access. `None` means allowed.
    ///
    /// Memberships a user cannot administer never appear in their listings,
    /// so a denial always conceals.
    pub fn membership_denial(&self, role: Option<TreeRole>, mode: AccessMode) -> Option<Denial> {
        classify(self.can_access_membership(role, mode), false)
    }

    /// Classify a record access. `None` means allowed.
    pub fn record_denial(
        &self,
        role: Option<TreeRole>,
        private: Option<bool>,
        mode: AccessMode,
    ) -> Option<Denial> {
        classify(
            self.can_access_record(role, private, mode),
            self.can_access_record(role, private, AccessMode::Read),
        )
    }

    /// Classify adding a record to a tree. `None` means allowed.
    pub fn create_denial(&self, role: Option<TreeRole>) -> Option<Denial> {
        classify(
            self.can_create_record(role),
            self.can_access_tree(role, AccessMode::Read),
        )
    }

    /// Predicate selecting the trees `user_id` may list.
    pub fn tree_scope(&self, user_id: DbId) -> TreeScope {
        TreeScope {
            user_id,
            min_role: self.config.tree_read,
        }
    }

    /// Predicate selecting the memberships `user_id` may list.
    pub fn membership_scope(&self, user_id: DbId) -> MembershipScope {
        MembershipScope {
            user_id,
            admin_role: self.config.membership_admin,
        }
    }

    /// Predicate selecting the records `user_id` may list.
    pub fn record_scope(&self, user_id: DbId) -> RecordScope {
        RecordScope {
            user_id,
            private_min: self.config.record_read_private,
            public_min: self.config.record_read_public,
        }
    }
}

fn classify(allowed: bool, visible: bool) -> Option<Denial> {
    match (allowed, visible) {
        (true, _) => None,
        (false, true) => Some(Denial::Forbid),
        (false, false) => Some(Denial::Conceal),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const MODES: [AccessMode; 2] = [AccessMode::Read, AccessMode::Write];
    const FLAGS: [Option<bool>; 3] = [Some(true), Some(false), None];

    fn policy() -> AccessPolicy {
        AccessPolicy::default()
    }

    #[test]
    fn method_mapping_treats_only_safe_methods_as_reads() {
        assert_eq!(AccessMode::for_method("GET"), AccessMode::Read);
        assert_eq!(AccessMode::for_method("HEAD"), AccessMode::Read);
        assert_eq!(AccessMode::for_method("OPTIONS"), AccessMode::Read);
        assert_eq!(AccessMode::for_method("POST"), AccessMode::Write);
        assert_eq!(AccessMode::for_method("PUT"), AccessMode::Write);
        assert_eq!(AccessMode::for_method("PATCH"), AccessMode::Write);
        assert_eq!(AccessMode::for_method("DELETE"), AccessMode::Write);
    }

    #[test]
    fn tree_write_implies_tree_read() {
        let p = policy();
        for role in TreeRole::ALL.map(Some).into_iter().chain([None]) {
            if p.can_access_tree(role, AccessMode::Write) {
                assert!(p.can_access_tree(role, AccessMode::Read));
            }
        }
    }

    #[test]
    fn tree_write_requires_admin() {
        let p = policy();
        assert!(p.can_access_tree(Some(TreeRole::Admin), AccessMode::Write));
        assert!(!p.can_access_tree(Some(TreeRole::Write), AccessMode::Write));
        assert!(p.can_access_tree(Some(TreeRole::Read), AccessMode::Read));
    }

    #[test]
    fn no_membership_denies_everything() {
        let p = policy();
        for mode in MODES {
            assert!(!p.can_access_tree(None, mode));
            assert!(!p.can_access_membership(None, mode));
            for private in FLAGS {
                assert!(!p.can_access_record(None, private, mode));
            }
        }
        assert!(!p.can_create_record(None));
    }

    #[test]
    fn read_private_ignores_private_flag() {
        let p = policy();
        for private in FLAGS {
            assert!(p.can_access_record(Some(TreeRole::ReadPrivate), private, AccessMode::Read));
        }
    }

    #[test]
    fn read_role_sees_only_public_records() {
        let p = policy();
        let read = Some(TreeRole::Read);
        assert!(p.can_access_record(read, Some(false), AccessMode::Read));
        assert!(!p.can_access_record(read, Some(true), AccessMode::Read));
    }

    #[test]
    fn unset_private_flag_is_private() {
        let p = policy();
        assert!(!p.can_access_record(Some(TreeRole::Read), None, AccessMode::Read));
        assert!(p.effective_private(None));
    }

    #[test]
    fn writes_require_write_role() {
        let p = policy();
        for role in [TreeRole::Read, TreeRole::ReadPrivate] {
            for private in FLAGS {
                assert!(!p.can_access_record(Some(role), private, AccessMode::Write));
            }
            assert!(!p.can_create_record(Some(role)));
        }
        for role in [TreeRole::Write, TreeRole::Admin] {
            assert!(p.can_access_record(Some(role), Some(true), AccessMode::Write));
            assert!(p.can_create_record(Some(role)));
        }
    }

    #[test]
    fn higher_roles_satisfy_every_lower_read_check() {
        let p = policy();
        for role in [TreeRole::Write, TreeRole::Admin] {
            for private in FLAGS {
                assert!(p.can_access_record(Some(role), private, AccessMode::Read));
            }
        }
    }

    #[test]
    fn scenario_writer_on_one_tree_only() {
        // U holds write on T1 and nothing on T2.
        let p = policy();
        let on_t1 = Some(TreeRole::Write);
        let on_t2 = None;
        assert!(p.can_access_record(on_t1, Some(true), AccessMode::Write));
        for mode in MODES {
            assert!(!p.can_access_record(on_t2, Some(false), mode));
        }
    }

    #[test]
    fn scenario_reader_public_and_private_records() {
        let p = policy();
        let v = Some(TreeRole::Read);
        assert!(p.can_access_record(v, Some(false), AccessMode::Read));
        assert!(!p.can_access_record(v, Some(false), AccessMode::Write));
        assert!(!p.can_access_record(v, Some(true), AccessMode::Read));
    }

    #[test]
    fn scenario_membership_administration() {
        let p = policy();
        assert!(p.can_access_membership(Some(TreeRole::Admin), AccessMode::Write));
        assert!(!p.can_access_membership(Some(TreeRole::Write), AccessMode::Write));
        assert!(!p.can_access_membership(Some(TreeRole::Write), AccessMode::Read));
    }

    #[test]
    fn denial_conceals_what_the_user_cannot_read() {
        let p = policy();
        assert_matches!(
            p.record_denial(None, Some(false), AccessMode::Read),
            Some(Denial::Conceal)
        );
        assert_matches!(
            p.record_denial(Some(TreeRole::Read), Some(true), AccessMode::Write),
            Some(Denial::Conceal)
        );
        assert_matches!(
            p.record_denial(Some(TreeRole::Read), Some(false), AccessMode::Write),
            Some(Denial::Forbid)
        );
        assert_matches!(
            p.record_denial(Some(TreeRole::ReadPrivate), Some(true), AccessMode::Write),
            Some(Denial::Forbid)
        );
        assert_eq!(
            p.record_denial(Some(TreeRole::Write), Some(true), AccessMode::Write),
            None
        );
    }

    #[test]
    fn tree_and_create_denials() {
        let p = policy();
        assert_matches!(p.tree_denial(None, AccessMode::Read), Some(Denial::Conceal));
        assert_matches!(
            p.tree_denial(Some(TreeRole::Write), AccessMode::Write),
            Some(Denial::Forbid)
        );
        assert_eq!(p.tree_denial(Some(TreeRole::Admin), AccessMode::Write), None);

        assert_matches!(p.create_denial(None), Some(Denial::Conceal));
        assert_matches!(p.create_denial(Some(TreeRole::ReadPrivate)), Some(Denial::Forbid));
        assert_eq!(p.create_denial(Some(TreeRole::Write)), None);
    }

    #[test]
    fn membership_denials_always_conceal() {
        let p = policy();
        assert_matches!(
            p.membership_denial(Some(TreeRole::Write), AccessMode::Read),
            Some(Denial::Conceal)
        );
        assert_eq!(p.membership_denial(Some(TreeRole::Admin), AccessMode::Write), None);
    }

    #[test]
    fn injected_config_changes_thresholds() {
        let p = AccessPolicy::new(AccessConfig {
            record_write: TreeRole::Admin,
            default_private: false,
            ..AccessConfig::default()
        });
        assert!(!p.can_access_record(Some(TreeRole::Write), Some(false), AccessMode::Write));
        assert!(p.can_access_record(Some(TreeRole::Read), None, AccessMode::Read));
    }
}
