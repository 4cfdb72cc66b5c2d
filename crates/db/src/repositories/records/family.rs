use async_trait::async_trait;
use figtree_core::records::RecordKind;
use figtree_core::types::DbId;
use sqlx::PgConnection;

use super::BindNullable;
use crate::models::records::family::{CreateFamily, Family, UpdateFamily};
use crate::repositories::TreeRecord;

const COLUMNS: &str = "id, tree_id, private, parent1_id, parent2_id, created_at, \
                       updated_at";

#[async_trait]
impl TreeRecord for Family {
    const KIND: RecordKind = RecordKind::Family;
    const COLUMNS: &'static str = COLUMNS;

    type Create = CreateFamily;
    type Update = UpdateFamily;

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
        input: &CreateFamily,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO families (tree_id, private, parent1_id, parent2_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Family>(&query)
            .bind(tree_id)
            .bind(private)
            .bind(input.parent1_id)
            .bind(input.parent2_id)
            .fetch_one(conn)
            .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: DbId,
        private: Option<bool>,
        input: &UpdateFamily,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE families SET
                private = COALESCE($2, private),
                parent1_id = CASE WHEN $3 THEN $4 ELSE parent1_id END,
                parent2_id = CASE WHEN $5 THEN $6 ELSE parent2_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Family>(&query)
            .bind(id)
            .bind(private)
            .bind_nullable(input.parent1_id)
            .bind_nullable(input.parent2_id)
            .fetch_optional(conn)
            .await
    }
}
