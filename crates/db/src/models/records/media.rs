//! A media file (scan, photograph, recording) with an optional subject.

use figtree_core::records::{ChoiceId, MediaDateType, RecordRef};
use figtree_core::types::{Date, DbId, Timestamp};
use figtree_core::validation::{self as v, ValidationResult, TEXT_MAX};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{sent_text, subject_reference, RecordInput, Reference, SubjectColumns};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Media {
    pub id: DbId,
    pub tree_id: DbId,
    pub private: bool,
    pub file_path: String,
    /// See [`MediaDateType`].
    pub date_type: ChoiceId,
    pub date: Option<Date>,
    pub description: Option<String>,
    #[sqlx(flatten)]
    pub subject: SubjectColumns,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMedia {
    pub file_path: String,
    pub date_type: Option<ChoiceId>,
    pub date: Option<Date>,
    pub description: Option<String>,
    pub subject: Option<RecordRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMedia {
    pub file_path: Option<String>,
    pub date_type: Option<ChoiceId>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub date: Option<Option<Date>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub subject: Option<Option<RecordRef>>,
}

impl RecordInput for CreateMedia {
    fn validate(&self) -> ValidationResult {
        v::require_text("file_path", &self.file_path, TEXT_MAX)?;
        v::choice::<MediaDateType>(self.date_type)?;
        v::optional_text("description", self.description.as_deref(), TEXT_MAX)
    }

    fn references(&self) -> Vec<Reference> {
        subject_reference(self.subject).into_iter().collect()
    }
}

impl RecordInput for UpdateMedia {
    fn validate(&self) -> ValidationResult {
        v::replace_text("file_path", self.file_path.as_deref(), TEXT_MAX)?;
        v::choice::<MediaDateType>(self.date_type)?;
        v::optional_text("description", sent_text(&self.description), TEXT_MAX)
    }

    fn references(&self) -> Vec<Reference> {
        subject_reference(self.subject.flatten()).into_iter().collect()
    }
}
