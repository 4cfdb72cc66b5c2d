//! A place, optionally nested inside a larger one.

use figtree_core::records::RecordKind;
use figtree_core::types::{DbId, Timestamp};
use figtree_core::validation::{self as v, ValidationResult, TEXT_MAX};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{foreign_keys, sent_text, RecordInput, Reference};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Place {
    pub id: DbId,
    pub tree_id: DbId,
    pub private: bool,
    pub name: String,
    pub place_type: Option<String>,
    pub enclosed_by_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlace {
    pub name: String,
    pub place_type: Option<String>,
    pub enclosed_by_id: Option<DbId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePlace {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub place_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub enclosed_by_id: Option<Option<DbId>>,
}

impl RecordInput for CreatePlace {
    fn validate(&self) -> ValidationResult {
        v::require_text("name", &self.name, TEXT_MAX)?;
        v::optional_text("place_type", self.place_type.as_deref(), TEXT_MAX)
    }

    fn references(&self) -> Vec<Reference> {
        foreign_keys(&[("enclosed_by_id", RecordKind::Place, self.enclosed_by_id)])
    }
}

impl RecordInput for UpdatePlace {
    fn validate(&self) -> ValidationResult {
        v::replace_text("name", self.name.as_deref(), TEXT_MAX)?;
        v::optional_text("place_type", sent_text(&self.place_type), TEXT_MAX)
    }

    fn references(&self) -> Vec<Reference> {
        foreign_keys(&[("enclosed_by_id", RecordKind::Place, self.enclosed_by_id.flatten())])
    }
}
