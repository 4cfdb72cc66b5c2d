use async_trait::async_trait;
use figtree_core::records::RecordKind;
use figtree_core::types::DbId;
use sqlx::PgConnection;

use super::BindNullable;
use crate::models::records::tag::{CreateTag, Tag, UpdateTag};
use crate::models::records::subject_columns;
use crate::repositories::TreeRecord;

const COLUMNS: &str = "id, tree_id, private, name, description, subject_kind, \
                       subject_id, created_at, updated_at";

#[async_trait]
impl TreeRecord for Tag {
    const KIND: RecordKind = RecordKind::Tag;
    const COLUMNS: &'static str = COLUMNS;

    type Create = CreateTag;
    type Update = UpdateTag;

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
        input: &CreateTag,
    ) -> Result<Self, sqlx::Error> {
        let (subject_kind, subject_id) = subject_columns(input.subject);
        let query = format!(
            "INSERT INTO tags (tree_id, private, name, description, subject_kind, subject_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(tree_id)
            .bind(private)
            .bind(&input.name)
            .bind(&input.description)
            .bind(subject_kind)
            .bind(subject_id)
            .fetch_one(conn)
            .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: DbId,
        private: Option<bool>,
        input: &UpdateTag,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE tags SET
                private = COALESCE($2, private),
                name = COALESCE($3, name),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                subject_kind = CASE WHEN $6 THEN $7 ELSE subject_kind END,
                subject_id = CASE WHEN $6 THEN $8 ELSE subject_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .bind(private)
            .bind(&input.name)
            .bind_nullable(input.description.clone())
            .bind_subject(input.subject)
            .fetch_optional(conn)
            .await
    }
}
