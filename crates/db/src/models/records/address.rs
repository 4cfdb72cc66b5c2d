//! Postal address attached to a person, place or other record.

use figtree_core::records::RecordRef;
use figtree_core::types::{Date, DbId, Timestamp};
use figtree_core::validation::{self as v, ValidationResult, POSTAL_CODE_MAX, TEXT_MAX};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{sent_text, subject_reference, RecordInput, Reference, SubjectColumns};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Address {
    pub id: DbId,
    pub tree_id: DbId,
    pub private: bool,
    pub line1: String,
    pub line2: Option<String>,
    pub line3: Option<String>,
    pub line4: Option<String>,
    pub municipality: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date: Option<Date>,
    #[sqlx(flatten)]
    pub subject: SubjectColumns,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAddress {
    pub line1: String,
    pub line2: Option<String>,
    pub line3: Option<String>,
    pub line4: Option<String>,
    pub municipality: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date: Option<Date>,
    pub subject: Option<RecordRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAddress {
    pub line1: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub line2: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub line3: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub line4: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub municipality: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub province: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub country: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub code: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub longitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub date: Option<Option<Date>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub subject: Option<Option<RecordRef>>,
}

fn validate_lines(
    line2: Option<&str>,
    line3: Option<&str>,
    line4: Option<&str>,
    municipality: Option<&str>,
    province: Option<&str>,
    country: Option<&str>,
    code: Option<&str>,
) -> ValidationResult {
    v::optional_text("line2", line2, TEXT_MAX)?;
    v::optional_text("line3", line3, TEXT_MAX)?;
    v::optional_text("line4", line4, TEXT_MAX)?;
    v::optional_text("municipality", municipality, TEXT_MAX)?;
    v::optional_text("province", province, TEXT_MAX)?;
    v::optional_text("country", country, TEXT_MAX)?;
    v::optional_text("code", code, POSTAL_CODE_MAX)
}

impl RecordInput for CreateAddress {
    fn validate(&self) -> ValidationResult {
        v::require_text("line1", &self.line1, TEXT_MAX)?;
        validate_lines(
            self.line2.as_deref(),
            self.line3.as_deref(),
            self.line4.as_deref(),
            self.municipality.as_deref(),
            self.province.as_deref(),
            self.country.as_deref(),
            self.code.as_deref(),
        )
    }

    fn references(&self) -> Vec<Reference> {
        subject_reference(self.subject).into_iter().collect()
    }
}

impl RecordInput for UpdateAddress {
    fn validate(&self) -> ValidationResult {
        v::replace_text("line1", self.line1.as_deref(), TEXT_MAX)?;
        validate_lines(
            sent_text(&self.line2),
            sent_text(&self.line3),
            sent_text(&self.line4),
            sent_text(&self.municipality),
            sent_text(&self.province),
            sent_text(&self.country),
            sent_text(&self.code),
        )
    }

    fn references(&self) -> Vec<Reference> {
        subject_reference(self.subject.flatten()).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postal_code_is_limited() {
        let input = UpdateAddress {
            code: Some(Some("12345678901".into())),
            ..Default::default()
        };
        assert_eq!(input.validate().unwrap_err().field, "code");
    }
}
