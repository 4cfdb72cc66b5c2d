use async_trait::async_trait;
use figtree_core::records::RecordKind;
use figtree_core::types::DbId;
use sqlx::PgConnection;

use super::BindNullable;
use crate::models::records::url::{CreateUrl, UpdateUrl, Url};
use crate::models::records::subject_columns;
use crate::repositories::TreeRecord;

const COLUMNS: &str = "id, tree_id, private, href, name, description, last_accessed, \
                       repository_id, subject_kind, subject_id, created_at, updated_at";

#[async_trait]
impl TreeRecord for Url {
    const KIND: RecordKind = RecordKind::Url;
    const COLUMNS: &'static str = COLUMNS;

    type Create = CreateUrl;
    type Update = UpdateUrl;

    fn id(&self) -> DbId {
        self.id
    }

    fn tree_id(&self) -> DbId {
        self.tree_id
    }

    fn private(&self) -> bool {
        self.private
    }

    async fn insert(
        conn: &mut PgConnection,
        tree_id: DbId,
        private: bool,
        input: &CreateUrl,
    ) -> Result<Self, sqlx::Error> {
        let (subject_kind, subject_id) = subject_columns(input.subject);
        let query = format!(
            "INSERT INTO urls (tree_id, private, href, name, description, last_accessed,
                 repository_id, subject_kind, subject_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Url>(&query)
            .bind(tree_id)
            .bind(private)
            .bind(&input.href)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.last_accessed)
            .bind(input.repository_id)
            .bind(subject_kind)
            .bind(subject_id)
            .fetch_one(conn)
            .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: DbId,
        private: Option<bool>,
        input: &UpdateUrl,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE urls SET
                private = COALESCE($2, private),
                href = COALESCE($3, href),
                name = CASE WHEN $4 THEN $5 ELSE name END,
                description = CASE WHEN $6 THEN $7 ELSE description END,
                last_accessed = CASE WHEN $8 THEN $9 ELSE last_accessed END,
                repository_id = COALESCE($10, repository_id),
                subject_kind = CASE WHEN $11 THEN $12 ELSE subject_kind END,
                subject_id = CASE WHEN $11 THEN $13 ELSE subject_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Url>(&query)
            .bind(id)
            .bind(private)
            .bind(&input.href)
            .bind_nullable(input.name.clone())
            .bind_nullable(input.description.clone())
            .bind_nullable(input.last_accessed)
            .bind(input.repository_id)
            .bind_subject(input.subject)
            .fetch_optional(conn)
            .await
    }
}
