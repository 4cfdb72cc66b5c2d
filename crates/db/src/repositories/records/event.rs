use async_trait::async_trait;
use figtree_core::records::RecordKind;
use figtree_core::types::DbId;
use sqlx::PgConnection;

use super::BindNullable;
use crate::models::records::event::{CreateEvent, Event, UpdateEvent};
use crate::repositories::TreeRecord;

const COLUMNS: &str = "id, tree_id, private, event_type, date_type, date, date_end, \
                       description, place_id, created_at, updated_at";

#[async_trait]
impl TreeRecord for Event {
    const KIND: RecordKind = RecordKind::Event;
    const COLUMNS: &'static str = COLUMNS;

    type Create = CreateEvent;
    type Update = UpdateEvent;

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
        input: &CreateEvent,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO events (tree_id, private, event_type, date_type, date, date_end,
                 description, place_id)
             VALUES ($1, $2, $3, COALESCE($4, 0), $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(tree_id)
            .bind(private)
            .bind(&input.event_type)
            .bind(input.date_type)
            .bind(input.date)
            .bind(input.date_end)
            .bind(&input.description)
            .bind(input.place_id)
            .fetch_one(conn)
            .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: DbId,
        private: Option<bool>,
        input: &UpdateEvent,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                private = COALESCE($2, private),
                event_type = COALESCE($3, event_type),
                date_type = COALESCE($4, date_type),
                date = CASE WHEN $5 THEN $6 ELSE date END,
                date_end = CASE WHEN $7 THEN $8 ELSE date_end END,
                description = CASE WHEN $9 THEN $10 ELSE description END,
                place_id = CASE WHEN $11 THEN $12 ELSE place_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(private)
            .bind(&input.event_type)
            .bind(input.date_type)
            .bind_nullable(input.date)
            .bind_nullable(input.date_end)
            .bind_nullable(input.description.clone())
            .bind_nullable(input.place_id)
            .fetch_optional(conn)
            .await
    }
}
