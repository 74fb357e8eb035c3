//! Filter stage: per-kind predicates ANDed across active dimensions.

use crate::resolve::{as_date, as_number, parse_date, resolve, values_equal};
use dataview_core::{FilterKind, FilterSpec, FilterValue};
use serde_json::Value;
use std::collections::BTreeMap;

/// Apply every active filter in turn; a record survives only if it matches
/// all of them. Entries with no matching descriptor are ignored, since the
/// predicate is chosen by the descriptor's kind.
pub fn apply_filters(
    mut records: Vec<Value>,
    active: &BTreeMap<String, FilterValue>,
    specs: &[FilterSpec],
) -> Vec<Value> {
    for spec in specs {
        let Some(value) = active.get(&spec.key) else {
            continue;
        };
        if !value.is_active() {
            continue;
        }
        records.retain(|record| matches_filter(record, spec, value));
    }
    records
}

/// Evaluate one filter dimension against one record.
///
/// A state value whose shape does not fit the declared kind deactivates the
/// dimension rather than failing the pipeline; this keeps the view alive
/// while the user is mid-edit.
fn matches_filter(record: &Value, spec: &FilterSpec, value: &FilterValue) -> bool {
    let resolved = resolve(record, &spec.key);
    match (&spec.kind, value) {
        (FilterKind::Select { .. }, FilterValue::One(want)) => resolved
            .map(|have| values_equal(have, want))
            .unwrap_or(false),
        (FilterKind::Multiselect { .. }, FilterValue::Many(selected)) => match resolved {
            // array field: at least one element must be in the selected set
            Some(Value::Array(items)) => items
                .iter()
                .any(|item| selected.iter().any(|s| values_equal(item, s))),
            Some(scalar) => selected.iter().any(|s| values_equal(scalar, s)),
            None => false,
        },
        (FilterKind::Range { .. }, FilterValue::Range(bounds)) => {
            let Some(have) = resolved.and_then(as_number) else {
                return false;
            };
            let min = bounds
                .min
                .as_ref()
                .and_then(as_number)
                .unwrap_or(f64::NEG_INFINITY);
            let max = bounds
                .max
                .as_ref()
                .and_then(as_number)
                .unwrap_or(f64::INFINITY);
            min <= have && have <= max
        }
        (FilterKind::Daterange, FilterValue::Dates(bounds)) => {
            let Some(have) = resolved.and_then(as_date) else {
                return false;
            };
            let after_start = bounds
                .start
                .as_deref()
                .and_then(parse_date)
                .map(|start| have >= start)
                .unwrap_or(true);
            let before_end = bounds
                .end
                .as_deref()
                .and_then(parse_date)
                .map(|end| have <= end)
                .unwrap_or(true);
            after_start && before_end
        }
        _ => true,
    }
}
