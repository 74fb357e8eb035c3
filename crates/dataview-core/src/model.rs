use crate::state::ViewState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use ulid::Ulid;

/// One item of the collection being browsed. Records are opaque JSON
/// objects; nested attributes are addressed by dot-path (e.g.
/// `"analytics.totalSpent"`). The engine never mutates them.
pub type Record = JsonValue;

pub type PresetId = String; // ULID string

/// An exportable column: `key` is a field path into the record, `label`
/// is the header shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Column {
    pub key: String,
    pub label: String,
}

/// An immutable snapshot of search/filter/sort state, created when the
/// user explicitly saves and deleted explicitly by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedFilter {
    pub id: PresetId,
    pub name: String,
    pub state: ViewState,
    pub created_at: DateTime<Utc>,
}

impl SavedFilter {
    pub fn new(name: String, state: ViewState) -> Self {
        Self {
            id: Ulid::new().to_string(),
            name,
            state,
            created_at: Utc::now(),
        }
    }
}
