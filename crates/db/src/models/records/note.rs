//! Free-text research note.

use figtree_core::records::RecordRef;
use figtree_core::types::{DbId, Timestamp};
use figtree_core::validation::{self as v, ValidationResult};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{subject_reference, RecordInput, Reference, SubjectColumns};

/// Notes are unbounded text; only blankness is checked.
const NOTE_MAX: usize = 100_000;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Note {
    pub id: DbId,
    pub tree_id: DbId,
    pub private: bool,
    pub text: String,
    #[sqlx(flatten)]
    pub subject: SubjectColumns,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateNote {
    pub text: String,
    pub subject: Option<RecordRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNote {
    pub text: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub subject: Option<Option<RecordRef>>,
}

impl RecordInput for CreateNote {
    fn validate(&self) -> ValidationResult {
        v::require_text("text", &self.text, NOTE_MAX)
    }

    fn references(&self) -> Vec<Reference> {
        subject_reference(self.subject).into_iter().collect()
    }
}

impl RecordInput for UpdateNote {
    fn validate(&self) -> ValidationResult {
        v::replace_text("text", self.text.as_deref(), NOTE_MAX)
    }

    fn references(&self) -> Vec<Reference> {
        subject_reference(self.subject.flatten()).into_iter().collect()
    }
}
