//! A couple and, through `people.parent_family_id`, their children.

use figtree_core::records::RecordKind;
use figtree_core::types::{DbId, Timestamp};
use figtree_core::validation::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{foreign_keys, RecordInput, Reference};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Family {
    pub id: DbId,
    pub tree_id: DbId,
    pub private: bool,
    pub parent1_id: Option<DbId>,
    pub parent2_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateFamily {
    pub parent1_id: Option<DbId>,
    pub parent2_id: Option<DbId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFamily {
    #[serde(default, deserialize_with = "super::nullable")]
    pub parent1_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub parent2_id: Option<Option<DbId>>,
}

fn check_distinct_parents(parent1_id: Option<DbId>, parent2_id: Option<DbId>) -> ValidationResult {
    if parent1_id.is_some() && parent1_id == parent2_id {
        return Err(ValidationError::new(
            "parent2_id",
            "must differ from parent1_id",
        ));
    }
    Ok(())
}

fn parents(parent1_id: Option<DbId>, parent2_id: Option<DbId>) -> Vec<Reference> {
    foreign_keys(&[
        ("parent1_id", RecordKind::Person, parent1_id),
        ("parent2_id", RecordKind::Person, parent2_id),
    ])
}

impl RecordInput for CreateFamily {
    fn validate(&self) -> ValidationResult {
        check_distinct_parents(self.parent1_id, self.parent2_id)
    }

    fn references(&self) -> Vec<Reference> {
        parents(self.parent1_id, self.parent2_id)
    }
}

impl RecordInput for UpdateFamily {
    fn validate(&self) -> ValidationResult {
        check_distinct_parents(self.parent1_id.flatten(), self.parent2_id.flatten())
    }

    fn references(&self) -> Vec<Reference> {
        parents(self.parent1_id.flatten(), self.parent2_id.flatten())
    }
}
