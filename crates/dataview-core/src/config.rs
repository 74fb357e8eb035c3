use crate::model::Column;
use serde::{Deserialize, Serialize};

/// One filterable dimension of a view. `key` doubles as the field path
/// the predicate reads from each record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterSpec {
    pub key: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FilterKind,
}

/// Kind-specific filter parameters. Tagged so each kind carries only what
/// it needs and the filter stage can dispatch exhaustively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FilterKind {
    Select {
        options: Vec<String>,
    },
    Multiselect {
        options: Vec<String>,
    },
    Range {
        min: f64,
        max: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f64>,
    },
    Daterange,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SortOption {
    pub value: String,
    pub label: String,
}

/// Declarative per-view configuration: which fields free-text search reads,
/// which filter dimensions exist, which sorts are offered, and which
/// columns exports emit.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ViewConfig {
    #[serde(default)]
    pub searchable_fields: Vec<String>,
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
    #[serde(default)]
    pub sort_options: Vec<SortOption>,
    #[serde(default)]
    pub columns: Vec<Column>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_spec_tagged_by_type() {
        let spec: FilterSpec = serde_json::from_value(json!({
            "key": "category",
            "label": "Category",
            "type": "select",
            "options": ["protein", "vitamins"]
        }))
        .unwrap();
        assert_eq!(spec.key, "category");
        assert!(matches!(spec.kind, FilterKind::Select { ref options } if options.len() == 2));
    }

    #[test]
    fn range_spec_step_is_optional() {
        let spec: FilterSpec = serde_json::from_value(json!({
            "key": "price",
            "label": "Price",
            "type": "range",
            "min": 0.0,
            "max": 200.0
        }))
        .unwrap();
        match spec.kind {
            FilterKind::Range { min, max, step } => {
                assert_eq!(min, 0.0);
                assert_eq!(max, 200.0);
                assert!(step.is_none());
            }
            other => panic!("expected range, got {other:?}"),
        }
    }

    #[test]
    fn daterange_spec_carries_no_params() {
        let spec: FilterSpec = serde_json::from_value(json!({
            "key": "createdAt",
            "label": "Created",
            "type": "daterange"
        }))
        .unwrap();
        assert!(matches!(spec.kind, FilterKind::Daterange));
    }
}
