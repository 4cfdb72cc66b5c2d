use async_trait::async_trait;
use figtree_core::records::RecordKind;
use figtree_core::types::DbId;
use sqlx::PgConnection;

use super::BindNullable;
use crate::models::records::person::{CreatePerson, Person, UpdatePerson};
use crate::repositories::TreeRecord;

const COLUMNS: &str = "id, tree_id, private, sex, primary_name_id, birth_id, death_id, \
                       family_id, parent_family_id, created_at, updated_at";

#[async_trait]
impl TreeRecord for Person {
    const KIND: RecordKind = RecordKind::Person;
    const COLUMNS: &'static str = COLUMNS;

    type Create = CreatePerson;
    type Update = UpdatePerson;

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
        input: &CreatePerson,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO people (tree_id, private, sex, primary_name_id, birth_id, death_id,
                 family_id, parent_family_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(tree_id)
            .bind(private)
            .bind(input.sex)
            .bind(input.primary_name_id)
            .bind(input.birth_id)
            .bind(input.death_id)
            .bind(input.family_id)
            .bind(input.parent_family_id)
            .fetch_one(conn)
            .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: DbId,
        private: Option<bool>,
        input: &UpdatePerson,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE people SET
                private = COALESCE($2, private),
                sex = CASE WHEN $3 THEN $4 ELSE sex END,
                primary_name_id = CASE WHEN $5 THEN $6 ELSE primary_name_id END,
                birth_id = CASE WHEN $7 THEN $8 ELSE birth_id END,
                death_id = CASE WHEN $9 THEN $10 ELSE death_id END,
                family_id = CASE WHEN $11 THEN $12 ELSE family_id END,
                parent_family_id = CASE WHEN $13 THEN $14 ELSE parent_family_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(id)
            .bind(private)
            .bind_nullable(input.sex)
            .bind_nullable(input.primary_name_id)
            .bind_nullable(input.birth_id)
            .bind_nullable(input.death_id)
            .bind_nullable(input.family_id)
            .bind_nullable(input.parent_family_id)
            .fetch_optional(conn)
            .await
    }
}
