//! An archive, library or website holding sources.

use figtree_core::types::{DbId, Timestamp};
use figtree_core::validation::{self as v, ValidationResult, TEXT_MAX};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{RecordInput, Reference};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Repository {
    pub id: DbId,
    pub tree_id: DbId,
    pub private: bool,
    pub repository_type: String,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRepository {
    pub repository_type: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRepository {
    pub repository_type: Option<String>,
    pub name: Option<String>,
}

impl RecordInput for CreateRepository {
    fn validate(&self) -> ValidationResult {
        v::require_text("repository_type", &self.repository_type, TEXT_MAX)?;
        v::require_text("name", &self.name, TEXT_MAX)
    }

    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }
}

impl RecordInput for UpdateRepository {
    fn validate(&self) -> ValidationResult {
        v::replace_text("repository_type", self.repository_type.as_deref(), TEXT_MAX)?;
        v::replace_text("name", self.name.as_deref(), TEXT_MAX)
    }

    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }
}
