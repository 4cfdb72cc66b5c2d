//! Family tree model and DTOs.

use figtree_core::types::{DbId, Timestamp};
use figtree_core::validation::{self, ValidationResult};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `family_trees` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct FamilyTree {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTree {
    pub name: String,
}

impl CreateTree {
    pub fn validate(&self) -> ValidationResult {
        validation::tree_name(&self.name)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTree {
    pub name: Option<String>,
}

impl UpdateTree {
    pub fn validate(&self) -> ValidationResult {
        match &self.name {
            Some(name) => validation::tree_name(name),
            None => Ok(()),
        }
    }
}
