use async_trait::async_trait;
use figtree_core::records::RecordKind;
use figtree_core::types::DbId;
use sqlx::PgConnection;

use crate::models::records::repository::{CreateRepository, Repository, UpdateRepository};
use crate::repositories::TreeRecord;

const COLUMNS: &str = "id, tree_id, private, repository_type, name, created_at, \
                       updated_at";

#[async_trait]
impl TreeRecord for Repository {
    const KIND: RecordKind = RecordKind::Repository;
    const COLUMNS: &'static str = COLUMNS;

    type Create = CreateRepository;
    type Update = UpdateRepository;

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
        input: &CreateRepository,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO repositories (tree_id, private, repository_type, name)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Repository>(&query)
            .bind(tree_id)
            .bind(private)
            .bind(&input.repository_type)
            .bind(&input.name)
            .fetch_one(conn)
            .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: DbId,
        private: Option<bool>,
        input: &UpdateRepository,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE repositories SET
                private = COALESCE($2, private),
                repository_type = COALESCE($3, repository_type),
                name = COALESCE($4, name)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Repository>(&query)
            .bind(id)
            .bind(private)
            .bind(&input.repository_type)
            .bind(&input.name)
            .fetch_optional(conn)
            .await
    }
}
