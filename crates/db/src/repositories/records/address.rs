use async_trait::async_trait;
use figtree_core::records::RecordKind;
use figtree_core::types::DbId;
use sqlx::PgConnection;

use super::BindNullable;
use crate::models::records::address::{Address, CreateAddress, UpdateAddress};
use crate::models::records::subject_columns;
use crate::repositories::TreeRecord;

const COLUMNS: &str = "id, tree_id, private, line1, line2, line3, line4, municipality, \
                       province, country, code, latitude, longitude, date, \
                       subject_kind, subject_id, created_at, updated_at";

#[async_trait]
impl TreeRecord for Address {
    const KIND: RecordKind = RecordKind::Address;
    const COLUMNS: &'static str = COLUMNS;

    type Create = CreateAddress;
    type Update = UpdateAddress;

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
        input: &CreateAddress,
    ) -> Result<Self, sqlx::Error> {
        let (subject_kind, subject_id) = subject_columns(input.subject);
        let query = format!(
            "INSERT INTO addresses (tree_id, private, line1, line2, line3, line4, municipality,
                 province, country, code, latitude, longitude, date, subject_kind,
                 subject_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                     $14, $15)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Address>(&query)
            .bind(tree_id)
            .bind(private)
            .bind(&input.line1)
            .bind(&input.line2)
            .bind(&input.line3)
            .bind(&input.line4)
            .bind(&input.municipality)
            .bind(&input.province)
            .bind(&input.country)
            .bind(&input.code)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.date)
            .bind(subject_kind)
            .bind(subject_id)
            .fetch_one(conn)
            .await
    }

    async fn update(
        conn: &mut PgConnection,
        id: DbId,
        private: Option<bool>,
        input: &UpdateAddress,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE addresses SET
                private = COALESCE($2, private),
                line1 = COALESCE($3, line1),
                line2 = CASE WHEN $4 THEN $5 ELSE line2 END,
                line3 = CASE WHEN $6 THEN $7 ELSE line3 END,
                line4 = CASE WHEN $8 THEN $9 ELSE line4 END,
                municipality = CASE WHEN $10 THEN $11 ELSE municipality END,
                province = CASE WHEN $12 THEN $13 ELSE province END,
                country = CASE WHEN $14 THEN $15 ELSE country END,
                code = CASE WHEN $16 THEN $17 ELSE code END,
                latitude = CASE WHEN $18 THEN $19 ELSE latitude END,
                longitude = CASE WHEN $20 THEN $21 ELSE longitude END,
                date = CASE WHEN $22 THEN $23 ELSE date END,
                subject_kind = CASE WHEN $24 THEN $25 ELSE subject_kind END,
                subject_id = CASE WHEN $24 THEN $26 ELSE subject_id END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Address>(&query)
            .bind(id)
            .bind(private)
            .bind(&input.line1)
            .bind_nullable(input.line2.clone())
            .bind_nullable(input.line3.clone())
            .bind_nullable(input.line4.clone())
            .bind_nullable(input.municipality.clone())
            .bind_nullable(input.province.clone())
            .bind_nullable(input.country.clone())
            .bind_nullable(input.code.clone())
            .bind_nullable(input.latitude)
            .bind_nullable(input.longitude)
            .bind_nullable(input.date)
            .bind_subject(input.subject)
            .fetch_optional(conn)
            .await
    }
}
