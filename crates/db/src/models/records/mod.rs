//! Genealogical record models.
//!
//! Every record row carries the shared columns `id`, `tree_id`, `private`,
//! `created_at` and `updated_at`. Create DTOs hold only the kind-specific
//! fields: `tree_id` and `private` are supplied separately by the caller
//! (see [`NewRecord`]), and `tree_id` can never be changed by an update.

use figtree_core::records::{RecordKind, RecordRef};
use figtree_core::types::DbId;
use figtree_core::validation::ValidationResult;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;

pub mod address;
pub mod citation;
pub mod event;
pub mod family;
pub mod media;
pub mod name;
pub mod note;
pub mod person;
pub mod place;
pub mod repository;
pub mod source;
pub mod tag;
pub mod url;

/// Request body of a record create: shared columns plus kind fields.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRecord<C> {
    pub tree_id: DbId,
    /// Unset means the configured default visibility.
    pub private: Option<bool>,
    #[serde(flatten)]
    pub fields: C,
}

/// Request body of a record update. A `tree_id` in the body is ignored.
///
/// Absent fields keep their stored value. Nullable kind fields are
/// `Option<Option<T>>` so that an explicit `null` clears the column.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPatch<U> {
    pub private: Option<bool>,
    #[serde(flatten)]
    pub fields: U,
}

/// A record-valued field of a write, checked against the target tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub field: &'static str,
    pub target: RecordRef,
}

/// Behaviour shared by create and update DTOs.
pub trait RecordInput {
    /// Field-level checks that need no database access.
    fn validate(&self) -> ValidationResult;

    /// Records this input points at. Each must exist in the written tree.
    fn references(&self) -> Vec<Reference>;
}

/// Collect the set foreign-key fields of an input.
pub(crate) fn foreign_keys(fields: &[(&'static str, RecordKind, Option<DbId>)]) -> Vec<Reference> {
    fields
        .iter()
        .filter_map(|&(field, kind, id)| {
            id.map(|id| Reference {
                field,
                target: RecordRef::new(kind, id),
            })
        })
        .collect()
}

/// Reference for an attachment's `subject`, when set.
pub(crate) fn subject_reference(subject: Option<RecordRef>) -> Option<Reference> {
    subject.map(|target| Reference {
        field: "subject",
        target,
    })
}

/// The `(subject_kind, subject_id)` column pair of attachment rows.
///
/// Serializes as the [`RecordRef`] it encodes, or `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow)]
pub struct SubjectColumns {
    pub subject_kind: Option<String>,
    pub subject_id: Option<DbId>,
}

impl SubjectColumns {
    pub fn record_ref(&self) -> Option<RecordRef> {
        RecordRef::from_columns(self.subject_kind.as_deref(), self.subject_id)
    }
}

impl Serialize for SubjectColumns {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record_ref().serialize(serializer)
    }
}

/// Deserialize a nullable update field: absent is `None` (through
/// `#[serde(default)]`), `null` is `Some(None)`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// The new text of a nullable update field, if one was sent.
pub(crate) fn sent_text(field: &Option<Option<String>>) -> Option<&str> {
    field.as_ref().and_then(|v| v.as_deref())
}

/// Split a subject into bindable column values.
pub(crate) fn subject_columns(subject: Option<RecordRef>) -> (Option<&'static str>, Option<DbId>) {
    match subject {
        Some(r) => (Some(r.kind.as_str()), Some(r.id)),
        None => (None, None),
    }
}
