use async_trait::async_trait;
use figtree_core::records::RecordKind;
use figtree_core::types::DbId;
use sqlx::PgConnection;

use super::BindNullable;
use crate::models::records::source::{CreateSource, Source, UpdateSource};
use crate::repositories::TreeRecord;

const COLUMNS: &str = "id, tree_id, private, title, author, pubinfo, created_at, \
                       updated_at";

#[async_trait]
impl TreeRecord for Source {
    const KIND: RecordKind = RecordKind::Source;
    const COLUMNS: &'static str = COLUMNS;

    type Create = CreateSource;
    type Update = UpdateSource;

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
        input: &CreateSource,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO sources (tree_id, private, title, author, pubinfo)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Source>(&query)
            .bind(tree_id)
            .bind(private)
            .bind(&input.title)
            .bind(&input.author)
            .bind(&input.pubinfo)
            .fetch_one(conn)
            .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: DbId,
        private: Option<bool>,
        input: &UpdateSource,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE sources SET
                private = COALESCE($2, private),
                title = COALESCE($3, title),
                author = CASE WHEN $4 THEN $5 ELSE author END,
                pubinfo = CASE WHEN $6 THEN $7 ELSE pubinfo END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Source>(&query)
            .bind(id)
            .bind(private)
            .bind(&input.title)
            .bind_nullable(input.author.clone())
            .bind_nullable(input.pubinfo.clone())
            .fetch_optional(conn)
            .await
    }
}
