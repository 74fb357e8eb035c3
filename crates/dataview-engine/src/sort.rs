//! Sort stage: stable, typed comparison with a deterministic home for
//! missing values.

use crate::resolve::{compare_values, resolve};
use dataview_core::{SortDirection, SortState};
use serde_json::Value;
use std::cmp::Ordering;

/// Stable sort by the configured field. Ties and incomparable pairs keep
/// input order. `desc` reverses the comparator, not the final array, so tie
/// stability survives either direction. Records whose sort field does not
/// resolve sort last under both directions.
pub fn apply_sort(mut records: Vec<Value>, sort: &SortState) -> Vec<Value> {
    if sort.is_none() {
        return records;
    }
    records.sort_by(|a, b| {
        match (resolve(a, &sort.field), resolve(b, &sort.field)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(left), Some(right)) => {
                let ord = compare_values(left, right).unwrap_or(Ordering::Equal);
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            }
        }
    });
    records
}
