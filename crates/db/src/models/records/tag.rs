//! A short label attached to a record.

use figtree_core::records::RecordRef;
use figtree_core::types::{DbId, Timestamp};
use figtree_core::validation::{self as v, ValidationResult, TAG_NAME_MAX, TEXT_MAX};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{sent_text, subject_reference, RecordInput, Reference, SubjectColumns};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub tree_id: DbId,
    pub private: bool,
    pub name: String,
    pub description: Option<String>,
    #[sqlx(flatten)]
    pub subject: SubjectColumns,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTag {
    pub name: String,
    pub description: Option<String>,
    pub subject: Option<RecordRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTag {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub subject: Option<Option<RecordRef>>,
}

impl RecordInput for CreateTag {
    fn validate(&self) -> ValidationResult {
        v::require_text("name", &self.name, TAG_NAME_MAX)?;
        v::optional_text("description", self.description.as_deref(), TEXT_MAX)
    }

    fn references(&self) -> Vec<Reference> {
        subject_reference(self.subject).into_iter().collect()
    }
}

impl RecordInput for UpdateTag {
    fn validate(&self) -> ValidationResult {
        v::replace_text("name", self.name.as_deref(), TAG_NAME_MAX)?;
        v::optional_text("description", sent_text(&self.description), TEXT_MAX)
    }

    fn references(&self) -> Vec<Reference> {
        subject_reference(self.subject.flatten()).into_iter().collect()
    }
}
