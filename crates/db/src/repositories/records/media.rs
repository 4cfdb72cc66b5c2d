use async_trait::async_trait;
use figtree_core::records::RecordKind;
use figtree_core::types::DbId;
use sqlx::PgConnection;

use super::BindNullable;
use crate::models::records::media::{CreateMedia, Media, UpdateMedia};
use crate::models::records::subject_columns;
use crate::repositories::TreeRecord;

const COLUMNS: &str = "id, tree_id, private, file_path, date_type, date, description, \
                       subject_kind, subject_id, created_at, updated_at";

#[async_trait]
impl TreeRecord for Media {
    const KIND: RecordKind = RecordKind::Media;
    const COLUMNS: &'static str = COLUMNS;

    type Create = CreateMedia;
    type Update = UpdateMedia;

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
        input: &CreateMedia,
    ) -> Result<Self, sqlx::Error> {
        let (subject_kind, subject_id) = subject_columns(input.subject);
        let query = format!(
            "INSERT INTO media (tree_id, private, file_path, date_type, date, description,
                 subject_kind, subject_id)
             VALUES ($1, $2, $3, COALESCE($4, 0), $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(tree_id)
            .bind(private)
            .bind(&input.file_path)
            .bind(input.date_type)
            .bind(input.date)
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
        input: &UpdateMedia,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE media SET
                private = COALESCE($2, private),
                file_path = COALESCE($3, file_path),
                date_type = COALESCE($4, date_type),
                date = CASE WHEN $5 THEN $6 ELSE date END,
                description = CASE WHEN $7 THEN $8 ELSE description END,
                subject_kind = CASE WHEN $9 THEN $10 ELSE subject_kind END,
                subject_id = CASE WHEN $9 THEN $11 ELSE subject_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .bind(private)
            .bind(&input.file_path)
            .bind(input.date_type)
            .bind_nullable(input.date)
            .bind_nullable(input.description.clone())
            .bind_subject(input.subject)
            .fetch_optional(conn)
            .await
    }
}
