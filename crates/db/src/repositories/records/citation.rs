use async_trait::async_trait;
use figtree_core::records::RecordKind;
use figtree_core::types::DbId;
use sqlx::PgConnection;

use super::BindNullable;
use crate::models::records::citation::{Citation, CreateCitation, UpdateCitation};
use crate::models::records::subject_columns;
use crate::repositories::TreeRecord;

const COLUMNS: &str = "id, tree_id, private, page_or_reference, confidence, source_id, \
                       subject_kind, subject_id, created_at, updated_at";

#[async_trait]
impl TreeRecord for Citation {
    const KIND: RecordKind = RecordKind::Citation;
    const COLUMNS: &'static str = COLUMNS;

    type Create = CreateCitation;
    type Update = UpdateCitation;

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
        input: &CreateCitation,
    ) -> Result<Self, sqlx::Error> {
        let (subject_kind, subject_id) = subject_columns(input.subject);
        let query = format!(
            "INSERT INTO citations (tree_id, private, page_or_reference, confidence, source_id,
                 subject_kind, subject_id)
             VALUES ($1, $2, $3, COALESCE($4, 1), $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Citation>(&query)
            .bind(tree_id)
            .bind(private)
            .bind(&input.page_or_reference)
            .bind(input.confidence)
            .bind(input.source_id)
            .bind(subject_kind)
            .bind(subject_id)
            .fetch_one(conn)
            .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: DbId,
        private: Option<bool>,
        input: &UpdateCitation,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE citations SET
                private = COALESCE($2, private),
                page_or_reference = CASE WHEN $3 THEN $4 ELSE page_or_reference END,
                confidence = COALESCE($5, confidence),
                source_id = COALESCE($6, source_id),
                subject_kind = CASE WHEN $7 THEN $8 ELSE subject_kind END,
                subject_id = CASE WHEN $7 THEN $9 ELSE subject_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Citation>(&query)
            .bind(id)
            .bind(private)
            .bind_nullable(input.page_or_reference.clone())
            .bind(input.confidence)
            .bind(input.source_id)
            .bind_subject(input.subject)
            .fetch_optional(conn)
            .await
    }
}
