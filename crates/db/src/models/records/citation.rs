//! Citation of a source, optionally attached to the record it supports.

use figtree_core::records::{Confidence, ChoiceId, RecordKind, RecordRef};
use figtree_core::types::{DbId, Timestamp};
use figtree_core::validation::{self as v, ValidationResult, PAGE_REFERENCE_MAX};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{foreign_keys, sent_text, subject_reference, RecordInput, Reference, SubjectColumns};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Citation {
    pub id: DbId,
    pub tree_id: DbId,
    pub private: bool,
    pub page_or_reference: Option<String>,
    /// See [`Confidence`].
    pub confidence: ChoiceId,
    pub source_id: DbId,
    #[sqlx(flatten)]
    pub subject: SubjectColumns,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCitation {
    pub page_or_reference: Option<String>,
    /// Defaults to [`Confidence::Regular`].
    pub confidence: Option<ChoiceId>,
    pub source_id: DbId,
    pub subject: Option<RecordRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCitation {
    #[serde(default, deserialize_with = "super::nullable")]
    pub page_or_reference: Option<Option<String>>,
    pub confidence: Option<ChoiceId>,
    pub source_id: Option<DbId>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub subject: Option<Option<RecordRef>>,
}

impl RecordInput for CreateCitation {
    fn validate(&self) -> ValidationResult {
        v::optional_text(
            "page_or_reference",
            self.page_or_reference.as_deref(),
            PAGE_REFERENCE_MAX,
        )?;
        v::choice::<Confidence>(self.confidence)
    }

    fn references(&self) -> Vec<Reference> {
        let mut refs = foreign_keys(&[("source_id", RecordKind::Source, Some(self.source_id))]);
        refs.extend(subject_reference(self.subject));
        refs
    }
}

impl RecordInput for UpdateCitation {
    fn validate(&self) -> ValidationResult {
        v::optional_text(
            "page_or_reference",
            sent_text(&self.page_or_reference),
            PAGE_REFERENCE_MAX,
        )?;
        v::choice::<Confidence>(self.confidence)
    }

    fn references(&self) -> Vec<Reference> {
        let mut refs = foreign_keys(&[("source_id", RecordKind::Source, self.source_id)]);
        refs.extend(subject_reference(self.subject.flatten()));
        refs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_include_source_and_subject() {
        let input = CreateCitation {
            page_or_reference: Some("p. 12".into()),
            confidence: None,
            source_id: 5,
            subject: Some(RecordRef::new(RecordKind::Event, 8)),
        };
        let fields: Vec<_> = input.references().iter().map(|r| r.field).collect();
        assert_eq!(fields, ["source_id", "subject"]);
    }

    #[test]
    fn unknown_confidence_is_rejected() {
        let input = UpdateCitation {
            confidence: Some(7),
            ..Default::default()
        };
        assert_eq!(input.validate().unwrap_err().field, "confidence");
    }
}
