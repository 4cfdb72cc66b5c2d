//! Generic persistence for genealogical records.
//!
//! [`TreeRecord`] is implemented once per record kind (see [`records`]) and
//! supplies the kind-specific SQL. [`RecordRepo`] provides everything that is
//! the same for all kinds: lookup, scoped listing, reference checks,
//! transactional writes, and deletion with dependent attachments.
//!
//! [`records`]: crate::repositories::records

use async_trait::async_trait;
use figtree_core::records::{RecordKind, RecordRef};
use figtree_core::scope::RecordScope;
use figtree_core::types::DbId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgConnection, PgPool};

use crate::error::WriteError;
use crate::models::records::{RecordInput, Reference};
use crate::scope::ScopeSql;

/// A record kind stored in its own table with the shared record columns.
#[async_trait]
pub trait TreeRecord:
    for<'r> FromRow<'r, PgRow> + Serialize + Send + Sync + Unpin + 'static
{
    const KIND: RecordKind;
    /// Unqualified select list matching the row struct.
    const COLUMNS: &'static str;

    type Create: RecordInput + DeserializeOwned + Send + Sync + 'static;
    type Update: RecordInput + DeserializeOwned + Send + Sync + 'static;

    fn id(&self) -> DbId;
    fn tree_id(&self) -> DbId;
    fn private(&self) -> bool;

    async fn insert(
        conn: &mut PgConnection,
        tree_id: DbId,
        private: bool,
        input: &Self::Create,
    ) -> Result<Self, sqlx::Error>;

    /// Apply a partial update. Returns `None` if the row does not exist.
    async fn update(
        conn: &mut PgConnection,
        id: DbId,
        private: Option<bool>,
        input: &Self::Update,
    ) -> Result<Option<Self>, sqlx::Error>;
}

pub struct RecordRepo;

impl RecordRepo {
    pub async fn find_by_id<T: TreeRecord>(pool: &PgPool, id: DbId) -> Result<Option<T>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} WHERE id = $1",
            T::COLUMNS,
            T::KIND.table()
        );
        sqlx::query_as::<_, T>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the records of kind `T` admitted by `scope`, optionally narrowed
    /// to one tree, newest first.
    pub async fn list_scoped<T: TreeRecord>(
        pool: &PgPool,
        scope: &RecordScope,
        tree_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<T>, sqlx::Error> {
        let n = RecordScope::PARAMS;
        let query = format!(
            "SELECT {cols} FROM {table} r
             WHERE {pred}
               AND (${t}::BIGINT IS NULL OR r.tree_id = ${t})
             ORDER BY r.created_at DESC, r.id DESC
             LIMIT ${l} OFFSET ${o}",
            cols = T::COLUMNS,
            table = T::KIND.table(),
            pred = scope.predicate("r", 1),
            t = n + 1,
            l = n + 2,
            o = n + 3,
        );
        scope
            .bind(sqlx::query_as::<_, T>(&query))
            .bind(tree_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Insert a record into `tree_id` after checking that everything it
    /// references belongs to the same tree.
    pub async fn create<T: TreeRecord>(
        pool: &PgPool,
        tree_id: DbId,
        private: bool,
        input: &T::Create,
    ) -> Result<T, WriteError> {
        let mut tx = pool.begin().await?;
        check_references(&mut tx, tree_id, &input.references()).await?;
        let record = T::insert(&mut tx, tree_id, private, input).await?;
        tx.commit().await?;
        Ok(record)
    }

    /// Partially update a record of `tree_id`. Returns `Ok(None)` if the row
    /// no longer exists.
    pub async fn update<T: TreeRecord>(
        pool: &PgPool,
        id: DbId,
        tree_id: DbId,
        private: Option<bool>,
        input: &T::Update,
    ) -> Result<Option<T>, WriteError> {
        let mut tx = pool.begin().await?;
        check_references(&mut tx, tree_id, &input.references()).await?;
        let record = T::update(&mut tx, id, private, input).await?;
        tx.commit().await?;
        Ok(record)
    }

    /// Delete a record together with every record depending on it.
    ///
    /// Dependents are the attachments whose `subject` is the record and,
    /// for sources and repositories, the citations and urls that require it.
    /// Dependents are followed transitively. Returns `false` if the record
    /// does not exist.
    pub async fn delete(pool: &PgPool, kind: RecordKind, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let lock = format!("SELECT id FROM {} WHERE id = $1 FOR UPDATE", kind.table());
        let found: Option<DbId> = sqlx::query_scalar(&lock)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if found.is_none() {
            return Ok(false);
        }

        let mut removed = 0usize;
        let mut pending = delete_dependents(&mut tx, RecordRef::new(kind, id)).await?;
        while let Some(next) = pending.pop() {
            removed += 1;
            pending.extend(delete_dependents(&mut tx, next).await?);
        }

        let query = format!("DELETE FROM {} WHERE id = $1", kind.table());
        sqlx::query(&query).bind(id).execute(&mut *tx).await?;

        tx.commit().await?;
        tracing::debug!(kind = %kind, id, dependents = removed, "Record deleted");
        Ok(true)
    }

    /// Whether `kind` #`id` exists in `tree_id`. Locks the row against
    /// deletion for the rest of the transaction.
    pub async fn exists_in_tree(
        conn: &mut PgConnection,
        kind: RecordKind,
        id: DbId,
        tree_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "SELECT id FROM {} WHERE id = $1 AND tree_id = $2 FOR SHARE",
            kind.table()
        );
        let found: Option<DbId> = sqlx::query_scalar(&query)
            .bind(id)
            .bind(tree_id)
            .fetch_optional(conn)
            .await?;
        Ok(found.is_some())
    }

    /// Delete every record owned by a tree. Part of tree deletion.
    pub(crate) async fn delete_all_in_tree(
        conn: &mut PgConnection,
        tree_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let mut removed = 0;
        for kind in RecordKind::ALL {
            let query = format!("DELETE FROM {} WHERE tree_id = $1", kind.table());
            removed += sqlx::query(&query)
                .bind(tree_id)
                .execute(&mut *conn)
                .await?
                .rows_affected();
        }
        Ok(removed)
    }
}

async fn check_references(
    conn: &mut PgConnection,
    tree_id: DbId,
    references: &[Reference],
) -> Result<(), WriteError> {
    for reference in references {
        let RecordRef { kind, id } = reference.target;
        if !RecordRepo::exists_in_tree(conn, kind, id, tree_id).await? {
            return Err(WriteError::InvalidReference {
                field: reference.field,
                target: reference.target,
            });
        }
    }
    Ok(())
}

/// The kind and column of records that cannot exist without `kind`.
fn required_children(kind: RecordKind) -> Option<(RecordKind, &'static str)> {
    match kind {
        RecordKind::Source => Some((RecordKind::Citation, "source_id")),
        RecordKind::Repository => Some((RecordKind::Url, "repository_id")),
        _ => None,
    }
}

/// Delete the direct dependents of `target`, returning them so their own
/// dependents can be removed next.
async fn delete_dependents(
    conn: &mut PgConnection,
    target: RecordRef,
) -> Result<Vec<RecordRef>, sqlx::Error> {
    let mut removed = Vec::new();

    if let Some((child, column)) = required_children(target.kind) {
        let query = format!(
            "DELETE FROM {} WHERE {column} = $1 RETURNING id",
            child.table()
        );
        let ids: Vec<DbId> = sqlx::query_scalar(&query)
            .bind(target.id)
            .fetch_all(&mut *conn)
            .await?;
        removed.extend(ids.into_iter().map(|id| RecordRef::new(child, id)));
    }

    for kind in RecordKind::ATTACHMENTS {
        let query = format!(
            "DELETE FROM {} WHERE subject_kind = $1 AND subject_id = $2 RETURNING id",
            kind.table()
        );
        let ids: Vec<DbId> = sqlx::query_scalar(&query)
            .bind(target.kind.as_str())
            .bind(target.id)
            .fetch_all(&mut *conn)
            .await?;
        removed.extend(ids.into_iter().map(|id| RecordRef::new(kind, id)));
    }

    Ok(removed)
}
