use async_trait::async_trait;
use figtree_core::records::RecordKind;
use figtree_core::types::DbId;
use sqlx::PgConnection;

use super::BindNullable;
use crate::models::records::name::{CreateName, Name, UpdateName};
use crate::repositories::TreeRecord;

const COLUMNS: &str = "id, tree_id, private, given_name, surname, suffix, prefix, \
                       created_at, updated_at";

#[async_trait]
impl TreeRecord for Name {
    const KIND: RecordKind = RecordKind::Name;
    const COLUMNS: &'static str = COLUMNS;

    type Create = CreateName;
    type Update = UpdateName;

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
        input: &CreateName,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO names (tree_id, private, given_name, surname, suffix, prefix)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Name>(&query)
            .bind(tree_id)
            .bind(private)
            .bind(&input.given_name)
            .bind(&input.surname)
            .bind(&input.suffix)
            .bind(&input.prefix)
            .fetch_one(conn)
            .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: DbId,
        private: Option<bool>,
        input: &UpdateName,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE names SET
                private = COALESCE($2, private),
                given_name = CASE WHEN $3 THEN $4 ELSE given_name END,
                surname = CASE WHEN $5 THEN $6 ELSE surname END,
                suffix = CASE WHEN $7 THEN $8 ELSE suffix END,
                prefix = CASE WHEN $9 THEN $10 ELSE prefix END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Name>(&query)
            .bind(id)
            .bind(private)
            .bind_nullable(input.given_name.clone())
            .bind_nullable(input.surname.clone())
            .bind_nullable(input.suffix.clone())
            .bind_nullable(input.prefix.clone())
            .fetch_optional(conn)
            .await
    }
}
