//! A personal name. People point at their primary name.

use figtree_core::types::{DbId, Timestamp};
use figtree_core::validation::{self as v, ValidationResult, TEXT_MAX};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{sent_text, RecordInput, Reference};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Name {
    pub id: DbId,
    pub tree_id: DbId,
    pub private: bool,
    pub given_name: Option<String>,
    pub surname: Option<String>,
    pub suffix: Option<String>,
    pub prefix: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateName {
    pub given_name: Option<String>,
    pub surname: Option<String>,
    pub suffix: Option<String>,
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateName {
    #[serde(default, deserialize_with = "super::nullable")]
    pub given_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub surname: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub suffix: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub prefix: Option<Option<String>>,
}

fn validate_parts(
    given_name: Option<&str>,
    surname: Option<&str>,
    suffix: Option<&str>,
    prefix: Option<&str>,
) -> ValidationResult {
    v::optional_text("given_name", given_name, TEXT_MAX)?;
    v::optional_text("surname", surname, TEXT_MAX)?;
    v::optional_text("suffix", suffix, TEXT_MAX)?;
    v::optional_text("prefix", prefix, TEXT_MAX)
}

impl RecordInput for CreateName {
    fn validate(&self) -> ValidationResult {
        validate_parts(
            self.given_name.as_deref(),
            self.surname.as_deref(),
            self.suffix.as_deref(),
            self.prefix.as_deref(),
        )
    }

    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }
}

impl RecordInput for UpdateName {
    fn validate(&self) -> ValidationResult {
        validate_parts(
            sent_text(&self.given_name),
            sent_text(&self.surname),
            sent_text(&self.suffix),
            sent_text(&self.prefix),
        )
    }

    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }
}
