//! A person. Names, vital events and families are separate records.

use figtree_core::records::{ChoiceId, RecordKind, Sex};
use figtree_core::types::{DbId, Timestamp};
use figtree_core::validation::{self as v, ValidationResult};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{foreign_keys, RecordInput, Reference};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Person {
    pub id: DbId,
    pub tree_id: DbId,
    pub private: bool,
    /// See [`Sex`].
    pub sex: Option<ChoiceId>,
    pub primary_name_id: Option<DbId>,
    pub birth_id: Option<DbId>,
    pub death_id: Option<DbId>,
    /// The family this person heads as a partner.
    pub family_id: Option<DbId>,
    /// The family this person was born into.
    pub parent_family_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePerson {
    pub sex: Option<ChoiceId>,
    pub primary_name_id: Option<DbId>,
    pub birth_id: Option<DbId>,
    pub death_id: Option<DbId>,
    pub family_id: Option<DbId>,
    pub parent_family_id: Option<DbId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePerson {
    #[serde(default, deserialize_with = "super::nullable")]
    pub sex: Option<Option<ChoiceId>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub primary_name_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub birth_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub death_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub family_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub parent_family_id: Option<Option<DbId>>,
}

impl RecordInput for CreatePerson {
    fn validate(&self) -> ValidationResult {
        v::choice::<Sex>(self.sex)
    }

    fn references(&self) -> Vec<Reference> {
        foreign_keys(&[
            ("primary_name_id", RecordKind::Name, self.primary_name_id),
            ("birth_id", RecordKind::Event, self.birth_id),
            ("death_id", RecordKind::Event, self.death_id),
            ("family_id", RecordKind::Family, self.family_id),
            ("parent_family_id", RecordKind::Family, self.parent_family_id),
        ])
    }
}

impl RecordInput for UpdatePerson {
    fn validate(&self) -> ValidationResult {
        v::choice::<Sex>(self.sex.flatten())
    }

    fn references(&self) -> Vec<Reference> {
        foreign_keys(&[
            ("primary_name_id", RecordKind::Name, self.primary_name_id.flatten()),
            ("birth_id", RecordKind::Event, self.birth_id.flatten()),
            ("death_id", RecordKind::Event, self.death_id.flatten()),
            ("family_id", RecordKind::Family, self.family_id.flatten()),
            ("parent_family_id", RecordKind::Family, self.parent_family_id.flatten()),
        ])
    }
}
