//! Repository for the `family_trees` table.

use figtree_core::roles::TreeRole;
use figtree_core::scope::TreeScope;
use figtree_core::types::DbId;
use sqlx::PgPool;

use crate::models::membership::TreeMembership;
use crate::models::tree::{CreateTree, FamilyTree, UpdateTree};
use crate::repositories::membership_repo;
use crate::repositories::RecordRepo;
use crate::scope::ScopeSql;

const COLUMNS: &str = "id, name, created_at, updated_at";

pub struct TreeRepo;

impl TreeRepo {
    /// Create a tree and make `user_id` its admin, atomically.
    ///
    /// Both rows are inserted in one transaction: a tree never exists
    /// without its creator's admin membership.
    pub async fn create_with_admin(
        pool: &PgPool,
        input: &CreateTree,
        user_id: DbId,
    ) -> Result<(FamilyTree, TreeMembership), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("INSERT INTO family_trees (name) VALUES ($1) RETURNING {COLUMNS}");
        let tree = sqlx::query_as::<_, FamilyTree>(&query)
            .bind(&input.name)
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO tree_memberships (tree_id, user_id, role)
             VALUES ($1, $2, $3)
             RETURNING {}",
            membership_repo::COLUMNS
        );
        let membership = sqlx::query_as::<_, TreeMembership>(&query)
            .bind(tree.id)
            .bind(user_id)
            .bind(TreeRole::Admin.level())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((tree, membership))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<FamilyTree>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM family_trees WHERE id = $1");
        sqlx::query_as::<_, FamilyTree>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the trees admitted by `scope`, ordered by name.
    pub async fn list_scoped(
        pool: &PgPool,
        scope: &TreeScope,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<FamilyTree>, sqlx::Error> {
        let n = TreeScope::PARAMS;
        let query = format!(
            "SELECT {COLUMNS} FROM family_trees t
             WHERE {}
             ORDER BY t.name, t.id
             LIMIT ${} OFFSET ${}",
            scope.predicate("t", 1),
            n + 1,
            n + 2
        );
        scope
            .bind(sqlx::query_as::<_, FamilyTree>(&query))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Rename a tree. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTree,
    ) -> Result<Option<FamilyTree>, sqlx::Error> {
        let query = format!(
            "UPDATE family_trees SET name = COALESCE($2, name)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FamilyTree>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a tree with everything it owns. Returns `false` if it does not exist.
    ///
    /// `tree_id` references are `ON DELETE RESTRICT`, so records and
    /// memberships are removed first, in the same transaction. The tree row is
    /// locked up front, which makes concurrent inserts into the tree wait and
    /// then fail their foreign-key check.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM family_trees WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(false);
        }

        let records = RecordRepo::delete_all_in_tree(&mut tx, id).await?;

        let memberships = sqlx::query("DELETE FROM tree_memberships WHERE tree_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM family_trees WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(tree_id = id, records, memberships, "Family tree deleted");
        Ok(true)
    }
}
