//! A web address held by a repository.

use figtree_core::records::{RecordKind, RecordRef};
use figtree_core::types::{Date, DbId, Timestamp};
use figtree_core::validation::{self as v, ValidationResult, TEXT_MAX};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{foreign_keys, sent_text, subject_reference, RecordInput, Reference, SubjectColumns};

const HREF_MAX: usize = 2048;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Url {
    pub id: DbId,
    pub tree_id: DbId,
    pub private: bool,
    pub href: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub last_accessed: Option<Date>,
    pub repository_id: DbId,
    #[sqlx(flatten)]
    pub subject: SubjectColumns,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUrl {
    pub href: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub last_accessed: Option<Date>,
    pub repository_id: DbId,
    pub subject: Option<RecordRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUrl {
    pub href: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub last_accessed: Option<Option<Date>>,
    pub repository_id: Option<DbId>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub subject: Option<Option<RecordRef>>,
}

impl RecordInput for CreateUrl {
    fn validate(&self) -> ValidationResult {
        v::require_text("href", &self.href, HREF_MAX)?;
        v::optional_text("name", self.name.as_deref(), TEXT_MAX)?;
        v::optional_text("description", self.description.as_deref(), TEXT_MAX)
    }

    fn references(&self) -> Vec<Reference> {
        let mut refs = foreign_keys(&[(
            "repository_id",
            RecordKind::Repository,
            Some(self.repository_id),
        )]);
        refs.extend(subject_reference(self.subject));
        refs
    }
}

impl RecordInput for UpdateUrl {
    fn validate(&self) -> ValidationResult {
        v::replace_text("href", self.href.as_deref(), HREF_MAX)?;
        v::optional_text("name", sent_text(&self.name), TEXT_MAX)?;
        v::optional_text("description", sent_text(&self.description), TEXT_MAX)
    }

    fn references(&self) -> Vec<Reference> {
        let mut refs =
            foreign_keys(&[("repository_id", RecordKind::Repository, self.repository_id)]);
        refs.extend(subject_reference(self.subject.flatten()));
        refs
    }
}
