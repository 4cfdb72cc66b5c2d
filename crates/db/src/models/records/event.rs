//! Dated life event (birth, baptism, census entry, ...).

use figtree_core::records::{ChoiceId, EventDateType, RecordKind};
use figtree_core::types::{Date, DbId, Timestamp};
use figtree_core::validation::{self as v, ValidationResult, TEXT_MAX};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{foreign_keys, sent_text, RecordInput, Reference};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub tree_id: DbId,
    pub private: bool,
    pub event_type: String,
    /// See [`EventDateType`].
    pub date_type: ChoiceId,
    pub date: Option<Date>,
    pub date_end: Option<Date>,
    pub description: Option<String>,
    pub place_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvent {
    pub event_type: String,
    /// Defaults to [`EventDateType::Regular`].
    pub date_type: Option<ChoiceId>,
    pub date: Option<Date>,
    pub date_end: Option<Date>,
    pub description: Option<String>,
    pub place_id: Option<DbId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEvent {
    pub event_type: Option<String>,
    pub date_type: Option<ChoiceId>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub date: Option<Option<Date>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub date_end: Option<Option<Date>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub place_id: Option<Option<DbId>>,
}

fn check_date_order(date: Option<Date>, date_end: Option<Date>) -> ValidationResult {
    match (date, date_end) {
        (Some(start), Some(end)) if end < start => Err(v::ValidationError::new(
            "date_end",
            "must not be earlier than date",
        )),
        _ => Ok(()),
    }
}

impl RecordInput for CreateEvent {
    fn validate(&self) -> ValidationResult {
        v::require_text("event_type", &self.event_type, TEXT_MAX)?;
        v::choice::<EventDateType>(self.date_type)?;
        v::optional_text("description", self.description.as_deref(), TEXT_MAX)?;
        check_date_order(self.date, self.date_end)
    }

    fn references(&self) -> Vec<Reference> {
        foreign_keys(&[("place_id", RecordKind::Place, self.place_id)])
    }
}

impl RecordInput for UpdateEvent {
    fn validate(&self) -> ValidationResult {
        v::replace_text("event_type", self.event_type.as_deref(), TEXT_MAX)?;
        v::choice::<EventDateType>(self.date_type)?;
        v::optional_text("description", sent_text(&self.description), TEXT_MAX)?;
        check_date_order(self.date.flatten(), self.date_end.flatten())
    }

    fn references(&self) -> Vec<Reference> {
        foreign_keys(&[("place_id", RecordKind::Place, self.place_id.flatten())])
    }
}
