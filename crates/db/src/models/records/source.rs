//! A source document cited as evidence.

use figtree_core::types::{DbId, Timestamp};
use figtree_core::validation::{self as v, ValidationResult, PUBINFO_MAX, TEXT_MAX};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{sent_text, RecordInput, Reference};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Source {
    pub id: DbId,
    pub tree_id: DbId,
    pub private: bool,
    pub title: String,
    pub author: Option<String>,
    pub pubinfo: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSource {
    pub title: String,
    pub author: Option<String>,
    pub pubinfo: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSource {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub author: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub pubinfo: Option<Option<String>>,
}

impl RecordInput for CreateSource {
    fn validate(&self) -> ValidationResult {
        v::require_text("title", &self.title, TEXT_MAX)?;
        v::optional_text("author", self.author.as_deref(), TEXT_MAX)?;
        v::optional_text("pubinfo", self.pubinfo.as_deref(), PUBINFO_MAX)
    }

    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }
}

impl RecordInput for UpdateSource {
    fn validate(&self) -> ValidationResult {
        v::replace_text("title", self.title.as_deref(), TEXT_MAX)?;
        v::optional_text("author", sent_text(&self.author), TEXT_MAX)?;
        v::optional_text("pubinfo", sent_text(&self.pubinfo), PUBINFO_MAX)
    }

    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }
}
