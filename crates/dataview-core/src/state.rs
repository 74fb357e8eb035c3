use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Select value that deactivates a filter, mirroring the "All" option of a
/// filter dropdown.
pub const ALL_SENTINEL: &str = "all";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Empty `field` means no ordering is applied (original order preserved).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SortState {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortState {
    pub fn by(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn is_none(&self) -> bool {
        self.field.is_empty()
    }
}

/// Numeric bounds for a `range` filter. Unset bounds are open-ended; the
/// values stay raw JSON so a half-typed bound never breaks deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RangeBounds {
    #[serde(default)]
    pub min: Option<JsonValue>,
    #[serde(default)]
    pub max: Option<JsonValue>,
}

/// Date bounds for a `daterange` filter. Unset or unparsable bounds are
/// open-ended.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DateBounds {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

/// The currently chosen value of one filter dimension: a scalar for
/// `select`, an array for `multiselect`, bounds for `range`/`daterange`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FilterValue {
    Many(Vec<JsonValue>),
    Range(RangeBounds),
    Dates(DateBounds),
    One(JsonValue),
}

impl FilterValue {
    /// An inactive value matches everything; callers drop inactive entries
    /// rather than keeping them around. An empty multiselect is inactive by
    /// policy (clearing the last selection must not mean "match nothing").
    pub fn is_active(&self) -> bool {
        match self {
            FilterValue::Many(selected) => !selected.is_empty(),
            FilterValue::Range(bounds) => bounds.min.is_some() || bounds.max.is_some(),
            FilterValue::Dates(bounds) => bounds.start.is_some() || bounds.end.is_some(),
            FilterValue::One(JsonValue::Null) => false,
            FilterValue::One(JsonValue::String(s)) => !s.is_empty() && s != ALL_SENTINEL,
            FilterValue::One(_) => true,
        }
    }
}

/// The live state triple the pipeline is a pure function of. The default
/// value is the identity state: no search, no filters, no sort.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ViewState {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub filters: BTreeMap<String, FilterValue>,
    #[serde(default)]
    pub sort: SortState,
}

impl ViewState {
    pub fn is_identity(&self) -> bool {
        self.search.trim().is_empty()
            && self.sort.is_none()
            && self.filters.values().all(|v| !v.is_active())
    }

    pub fn clear(&mut self) {
        *self = ViewState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_value_shapes_deserialize_untagged() {
        let many: FilterValue = serde_json::from_value(json!(["a", "b"])).unwrap();
        assert!(matches!(many, FilterValue::Many(ref v) if v.len() == 2));

        let range: FilterValue = serde_json::from_value(json!({"min": 10, "max": 20})).unwrap();
        assert!(matches!(range, FilterValue::Range(_)));

        let dates: FilterValue =
            serde_json::from_value(json!({"start": "2026-01-01", "end": "2026-02-01"})).unwrap();
        assert!(matches!(dates, FilterValue::Dates(_)));

        let one: FilterValue = serde_json::from_value(json!("protein")).unwrap();
        assert!(matches!(one, FilterValue::One(_)));
    }

    #[test]
    fn all_sentinel_and_empty_values_are_inactive() {
        assert!(!FilterValue::One(json!("all")).is_active());
        assert!(!FilterValue::One(json!("")).is_active());
        assert!(!FilterValue::One(JsonValue::Null).is_active());
        assert!(!FilterValue::Many(vec![]).is_active());
        assert!(!FilterValue::Range(RangeBounds::default()).is_active());
        assert!(!FilterValue::Dates(DateBounds::default()).is_active());

        assert!(FilterValue::One(json!("protein")).is_active());
        assert!(FilterValue::Many(vec![json!("a")]).is_active());
        assert!(FilterValue::Range(RangeBounds {
            min: Some(json!(1)),
            max: None,
        })
        .is_active());
    }

    #[test]
    fn half_open_range_keeps_raw_bound() {
        // A user mid-edit can leave a non-numeric bound; it must survive
        // deserialization and be ignored at evaluation time.
        let v: FilterValue = serde_json::from_value(json!({"min": "1e", "max": 50})).unwrap();
        match v {
            FilterValue::Range(bounds) => {
                assert_eq!(bounds.min, Some(json!("1e")));
                assert_eq!(bounds.max, Some(json!(50)));
            }
            other => panic!("expected range, got {other:?}"),
        }
    }

    #[test]
    fn default_state_is_identity() {
        let mut state = ViewState {
            search: "whey".into(),
            filters: BTreeMap::from([("category".to_string(), FilterValue::One(json!("protein")))]),
            sort: SortState::by("price", SortDirection::Desc),
        };
        assert!(!state.is_identity());
        state.clear();
        assert!(state.is_identity());
        assert_eq!(state, ViewState::default());
    }
}
