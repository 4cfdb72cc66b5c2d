//! SQL rendering of the list-scoping predicates.
//!
//! Each scope becomes an `EXISTS` subquery against `tree_memberships`, so
//! listing endpoints filter in the database instead of loading rows and
//! checking them one by one. Placeholders are numbered from `first` so the
//! predicate can be combined with other bound parameters.

use figtree_core::scope::{MembershipScope, RecordScope, TreeScope};
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::Postgres;

/// A scope that can be expressed as a SQL boolean expression.
pub trait ScopeSql {
    /// Number of placeholders used by [`predicate`](Self::predicate).
    const PARAMS: usize;

    /// Boolean expression over the row aliased as `alias`.
    fn predicate(&self, alias: &str, first: usize) -> String;

    /// Bind the predicate's placeholders, in order.
    fn bind<'q, O>(
        &self,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments>;
}

fn membership_exists(tree_column: &str, first: usize, role_check: &str) -> String {
    format!(
        "EXISTS (SELECT 1 FROM tree_memberships scope_m \
         WHERE scope_m.tree_id = {tree_column} AND scope_m.user_id = ${first} AND ({role_check}))"
    )
}

impl ScopeSql for TreeScope {
    const PARAMS: usize = 2;

    fn predicate(&self, alias: &str, first: usize) -> String {
        let role_check = format!("scope_m.role >= ${}", first + 1);
        membership_exists(&format!("{alias}.id"), first, &role_check)
    }

    fn bind<'q, O>(
        &self,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        query.bind(self.user_id).bind(self.min_role.level())
    }
}

impl ScopeSql for MembershipScope {
    const PARAMS: usize = 2;

    fn predicate(&self, alias: &str, first: usize) -> String {
        let role_check = format!("scope_m.role >= ${}", first + 1);
        membership_exists(&format!("{alias}.tree_id"), first, &role_check)
    }

    fn bind<'q, O>(
        &self,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        query.bind(self.user_id).bind(self.admin_role.level())
    }
}

impl ScopeSql for RecordScope {
    const PARAMS: usize = 3;

    fn predicate(&self, alias: &str, first: usize) -> String {
        let role_check = format!(
            "scope_m.role >= ${} OR (scope_m.role >= ${} AND NOT {alias}.private)",
            first + 1,
            first + 2
        );
        membership_exists(&format!("{alias}.tree_id"), first, &role_check)
    }

    fn bind<'q, O>(
        &self,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        query
            .bind(self.user_id)
            .bind(self.private_min.level())
            .bind(self.public_min.level())
    }
}
