//! Genealogical record kinds, record references and choice enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Record kinds
// ---------------------------------------------------------------------------

/// Every kind of genealogical record a tree can own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Address,
    Citation,
    Event,
    Family,
    Media,
    Name,
    Note,
    Person,
    Place,
    Repository,
    Source,
    Tag,
    Url,
}

impl RecordKind {
    pub const ALL: [RecordKind; 13] = [
        RecordKind::Address,
        RecordKind::Citation,
        RecordKind::Event,
        RecordKind::Family,
        RecordKind::Media,
        RecordKind::Name,
        RecordKind::Note,
        RecordKind::Person,
        RecordKind::Place,
        RecordKind::Repository,
        RecordKind::Source,
        RecordKind::Tag,
        RecordKind::Url,
    ];

    /// Kinds that can be attached to another record through a `subject`.
    pub const ATTACHMENTS: [RecordKind; 6] = [
        RecordKind::Address,
        RecordKind::Citation,
        RecordKind::Media,
        RecordKind::Note,
        RecordKind::Tag,
        RecordKind::Url,
    ];

    /// Database table holding this kind.
    pub fn table(self) -> &'static str {
        match self {
            RecordKind::Address => "addresses",
            RecordKind::Citation => "citations",
            RecordKind::Event => "events",
            RecordKind::Family => "families",
            RecordKind::Media => "media",
            RecordKind::Name => "names",
            RecordKind::Note => "notes",
            RecordKind::Person => "people",
            RecordKind::Place => "places",
            RecordKind::Repository => "repositories",
            RecordKind::Source => "sources",
            RecordKind::Tag => "tags",
            RecordKind::Url => "urls",
        }
    }

    /// Human-readable entity name used in error messages.
    pub fn entity(self) -> &'static str {
        match self {
            RecordKind::Address => "Address",
            RecordKind::Citation => "Citation",
            RecordKind::Event => "Event",
            RecordKind::Family => "Family",
            RecordKind::Media => "Media",
            RecordKind::Name => "Name",
            RecordKind::Note => "Note",
            RecordKind::Person => "Person",
            RecordKind::Place => "Place",
            RecordKind::Repository => "Repository",
            RecordKind::Source => "Source",
            RecordKind::Tag => "Tag",
            RecordKind::Url => "Url",
        }
    }

    /// Wire name, also stored in `subject_kind` columns.
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Address => "address",
            RecordKind::Citation => "citation",
            RecordKind::Event => "event",
            RecordKind::Family => "family",
            RecordKind::Media => "media",
            RecordKind::Name => "name",
            RecordKind::Note => "note",
            RecordKind::Person => "person",
            RecordKind::Place => "place",
            RecordKind::Repository => "repository",
            RecordKind::Source => "source",
            RecordKind::Tag => "tag",
            RecordKind::Url => "url",
        }
    }

    /// URL path segment of the collection endpoint. Matches the table name.
    pub fn path(self) -> &'static str {
        self.table()
    }

    pub fn is_attachment(self) -> bool {
        Self::ATTACHMENTS.contains(&self)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown record kind '{0}'")]
pub struct UnknownRecordKind(pub String);

impl FromStr for RecordKind {
    type Err = UnknownRecordKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownRecordKind(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Record references
// ---------------------------------------------------------------------------

/// A typed pointer to any record, e.g. `{ "kind": "person", "id": 7 }`.
///
/// Attachment records (addresses, citations, media, notes, tags, urls) use
/// this as their `subject`. It is persisted as a `(subject_kind, subject_id)`
/// column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordRef {
    pub kind: RecordKind,
    pub id: DbId,
}

impl RecordRef {
    pub fn new(kind: RecordKind, id: DbId) -> Self {
        Self { kind, id }
    }

    /// Rebuild a reference from its stored column pair.
    ///
    /// Returns `None` when either column is NULL or the kind is unknown.
    pub fn from_columns(kind: Option<&str>, id: Option<DbId>) -> Option<Self> {
        let kind = kind?.parse().ok()?;
        Some(Self { kind, id: id? })
    }
}

// ---------------------------------------------------------------------------
// Choice enums
// ---------------------------------------------------------------------------

/// Storage type of choice columns (SMALLINT).
pub type ChoiceId = i16;

/// A fixed set of integer choices persisted in a SMALLINT column.
pub trait Choice: Sized + Copy + 'static {
    /// Field name used in validation messages.
    const FIELD: &'static str;
    const ALL: &'static [Self];

    fn id(self) -> ChoiceId;

    fn from_id(id: ChoiceId) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.id() == id)
    }
}

macro_rules! define_choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($field:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl Choice for $name {
            const FIELD: &'static str = $field;
            const ALL: &'static [Self] = &[ $( $name::$variant ),+ ];

            fn id(self) -> ChoiceId {
                self as ChoiceId
            }
        }

        impl From<$name> for ChoiceId {
            fn from(value: $name) -> Self {
                value as ChoiceId
            }
        }
    };
}

define_choice_enum! {
    /// Researcher's confidence in a citation.
    Confidence ("confidence") {
        Low = 0,
        Regular = 1,
        High = 2,
    }
}

define_choice_enum! {
    /// How an event's dates should be read.
    EventDateType ("date_type") {
        Regular = 0,
        Before = 1,
        After = 2,
        About = 3,
        Range = 4,
        Span = 5,
    }
}

define_choice_enum! {
    /// How a media item's date should be read.
    MediaDateType ("date_type") {
        Regular = 0,
        Before = 1,
        After = 2,
        About = 3,
    }
}

define_choice_enum! {
    /// Sex recorded at birth.
    Sex ("sex") {
        Female = 0,
        Male = 1,
        Other = 2,
    }
}
