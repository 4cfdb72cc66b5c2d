use async_trait::async_trait;
use figtree_core::records::RecordKind;
use figtree_core::types::DbId;
use sqlx::PgConnection;

use super::BindNullable;
use crate::models::records::note::{CreateNote, Note, UpdateNote};
use crate::models::records::subject_columns;
use crate::repositories::TreeRecord;

const COLUMNS: &str = "id, tree_id, private, text, subject_kind, subject_id, \
                       created_at, updated_at";

#[async_trait]
impl TreeRecord for Note {
    const KIND: RecordKind = RecordKind::Note;
    const COLUMNS: &'static str = COLUMNS;

    type Create = CreateNote;
    type Update = UpdateNote;

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
        input: &CreateNote,
    ) -> Result<Self, sqlx::Error> {
        let (subject_kind, subject_id) = subject_columns(input.subject);
        let query = format!(
            "INSERT INTO notes (tree_id, private, text, subject_kind, subject_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(tree_id)
            .bind(private)
            .bind(&input.text)
            .bind(subject_kind)
            .bind(subject_id)
            .fetch_one(conn)
            .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: DbId,
        private: Option<bool>,
        input: &UpdateNote,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET
                private = COALESCE($2, private),
                text = COALESCE($3, text),
                subject_kind = CASE WHEN $4 THEN $5 ELSE subject_kind END,
                subject_id = CASE WHEN $4 THEN $6 ELSE subject_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(private)
            .bind(&input.text)
            .bind_subject(input.subject)
            .fetch_optional(conn)
            .await
    }
}
