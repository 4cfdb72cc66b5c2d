//! [`TreeRecord`](crate::repositories::TreeRecord) implementations, one per
//! record kind.
//!
//! Updates leave absent fields alone. Required columns use
//! `COALESCE($n, col)`. Nullable columns take a "provided" flag followed by
//! the new value, `CASE WHEN $n THEN $n+1 ELSE col END`, so that `null` can
//! clear them. The attachment subject shares one flag across its column pair.

use figtree_core::records::RecordRef;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{Encode, Postgres, Type};

use crate::models::records::subject_columns;

mod address;
mod citation;
mod event;
mod family;
mod media;
mod name;
mod note;
mod person;
mod place;
mod repository;
mod source;
mod tag;
mod url;

/// Binds for the flag-and-value placeholders of a nullable column.
trait BindNullable<'q> {
    fn bind_nullable<T>(self, field: Option<Option<T>>) -> Self
    where
        T: 'q + Encode<'q, Postgres> + Type<Postgres>;

    /// Flag, `subject_kind`, `subject_id`.
    fn bind_subject(self, field: Option<Option<RecordRef>>) -> Self;
}

impl<'q, O> BindNullable<'q> for QueryAs<'q, Postgres, O, PgArguments> {
    fn bind_nullable<T>(self, field: Option<Option<T>>) -> Self
    where
        T: 'q + Encode<'q, Postgres> + Type<Postgres>,
    {
        self.bind(field.is_some()).bind(field.flatten())
    }

    fn bind_subject(self, field: Option<Option<RecordRef>>) -> Self {
        let (kind, id) = subject_columns(field.flatten());
        self.bind(field.is_some()).bind(kind).bind(id)
    }
}
