//! Repository for the `tree_memberships` table.

use figtree_core::roles::{TreeRole, TreeRoleLevel};
use figtree_core::scope::MembershipScope;
use figtree_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::error::WriteError;
use crate::models::membership::{CreateMembership, TreeMembership};
use crate::scope::ScopeSql;

pub(crate) const COLUMNS: &str = "id, tree_id, user_id, role, created_at, updated_at";

const ADMIN: TreeRoleLevel = TreeRole::Admin as TreeRoleLevel;

pub struct MembershipRepo;

impl MembershipRepo {
    /// The role `user_id` holds on `tree_id`, or `None` without a membership.
    ///
    /// Always reads the current row; role changes take effect on the next call.
    pub async fn find_role(
        pool: &PgPool,
        user_id: DbId,
        tree_id: DbId,
    ) -> Result<Option<TreeRole>, sqlx::Error> {
        let level: Option<TreeRoleLevel> = sqlx::query_scalar(
            "SELECT role FROM tree_memberships WHERE user_id = $1 AND tree_id = $2",
        )
        .bind(user_id)
        .bind(tree_id)
        .fetch_optional(pool)
        .await?;

        level
            .map(TreeRole::try_from)
            .transpose()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TreeMembership>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tree_memberships WHERE id = $1");
        sqlx::query_as::<_, TreeMembership>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List memberships admitted by `scope`, optionally narrowed to one tree.
    pub async fn list_scoped(
        pool: &PgPool,
        scope: &MembershipScope,
        tree_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TreeMembership>, sqlx::Error> {
        let n = MembershipScope::PARAMS;
        let query = format!(
            "SELECT {COLUMNS} FROM tree_memberships ms
             WHERE {}
               AND (${t}::BIGINT IS NULL OR ms.tree_id = ${t})
             ORDER BY ms.tree_id, ms.role DESC, ms.id
             LIMIT ${} OFFSET ${}",
            scope.predicate("ms", 1),
            n + 2,
            n + 3,
            t = n + 1,
        );
        scope
            .bind(sqlx::query_as::<_, TreeMembership>(&query))
            .bind(tree_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Grant `user_id` a role on a tree. Defaults to [`TreeRole::Read`].
    ///
    /// A second membership for the same (tree, user) pair violates
    /// `uq_tree_memberships_tree_user`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateMembership,
    ) -> Result<TreeMembership, sqlx::Error> {
        let query = format!(
            "INSERT INTO tree_memberships (tree_id, user_id, role)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TreeMembership>(&query)
            .bind(input.tree_id)
            .bind(input.user_id)
            .bind(input.role.unwrap_or(TreeRole::Read).level())
            .fetch_one(pool)
            .await
    }

    /// Change a membership's role. Returns `Ok(None)` if it does not exist.
    ///
    /// Demoting the tree's only admin fails with [`WriteError::LastAdmin`].
    pub async fn update_role(
        pool: &PgPool,
        id: DbId,
        role: TreeRole,
    ) -> Result<Option<TreeMembership>, WriteError> {
        let mut tx = pool.begin().await?;

        if role != TreeRole::Admin && !lock_and_keep_admin(&mut tx, id).await? {
            return Ok(None);
        }

        let query = format!(
            "UPDATE tree_memberships SET role = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, TreeMembership>(&query)
            .bind(id)
            .bind(role.level())
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Remove a membership. Returns `Ok(false)` if it does not exist.
    ///
    /// Removing the tree's only admin fails with [`WriteError::LastAdmin`].
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, WriteError> {
        let mut tx = pool.begin().await?;

        if !lock_and_keep_admin(&mut tx, id).await? {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM tree_memberships WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Lock the target membership together with its tree's admin rows, then
/// refuse to proceed if the target is the only admin left.
///
/// Rows are locked in id order so concurrent demotions cannot deadlock.
/// Returns `false` when the membership does not exist.
async fn lock_and_keep_admin(conn: &mut PgConnection, id: DbId) -> Result<bool, WriteError> {
    let tree_id: Option<DbId> =
        sqlx::query_scalar("SELECT tree_id FROM tree_memberships WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
    let Some(tree_id) = tree_id else {
        return Ok(false);
    };

    let rows: Vec<(DbId, TreeRoleLevel)> = sqlx::query_as(
        "SELECT id, role FROM tree_memberships
         WHERE tree_id = $1 AND (role = $2 OR id = $3)
         ORDER BY id
         FOR UPDATE",
    )
    .bind(tree_id)
    .bind(ADMIN)
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    let Some(&(_, target_role)) = rows.iter().find(|(row_id, _)| *row_id == id) else {
        return Ok(false);
    };
    let admins = rows.iter().filter(|(_, role)| *role == ADMIN).count();
    if target_role == ADMIN && admins <= 1 {
        tracing::info!(tree_id, membership_id = id, "Refused to remove last tree admin");
        return Err(WriteError::LastAdmin { tree_id });
    }
    Ok(true)
}
