use async_trait::async_trait;
use figtree_core::records::RecordKind;
use figtree_core::types::DbId;
use sqlx::PgConnection;

use super::BindNullable;
use crate::models::records::place::{CreatePlace, Place, UpdatePlace};
use crate::repositories::TreeRecord;

const COLUMNS: &str = "id, tree_id, private, name, place_type, enclosed_by_id, \
                       created_at, updated_at";

#[async_trait]
impl TreeRecord for Place {
    const KIND: RecordKind = RecordKind::Place;
    const COLUMNS: &'static str = COLUMNS;

    type Create = CreatePlace;
    type Update = UpdatePlace;

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
        input: &CreatePlace,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO places (tree_id, private, name, place_type, enclosed_by_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Place>(&query)
            .bind(tree_id)
            .bind(private)
            .bind(&input.name)
            .bind(&input.place_type)
            .bind(input.enclosed_by_id)
            .fetch_one(conn)
            .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: DbId,
        private: Option<bool>,
        input: &UpdatePlace,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE places SET
                private = COALESCE($2, private),
                name = COALESCE($3, name),
                place_type = CASE WHEN $4 THEN $5 ELSE place_type END,
                enclosed_by_id = CASE WHEN $6 THEN $7 ELSE enclosed_by_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Place>(&query)
            .bind(id)
            .bind(private)
            .bind(&input.name)
            .bind_nullable(input.place_type.clone())
            .bind_nullable(input.enclosed_by_id)
            .fetch_optional(conn)
            .await
    }
}
