//! Pipeline composition: search → filters → sort.

use crate::filter::apply_filters;
use crate::search::apply_search;
use crate::sort::apply_sort;
use dataview_core::{ViewConfig, ViewState};
use once_cell::sync::Lazy;
use prometheus::{register_histogram, Histogram};
use serde_json::Value;

static PROJECTION_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "dataview_projection_seconds",
        "Full projection pipeline latency"
    )
    .unwrap()
});

/// Project a record collection through the view's live state. Pure function
/// of its inputs: same records, config and state always produce the same
/// output in the same order. The output is a subsequence of the input
/// except for reordering by an active sort.
pub fn project(records: &[Value], config: &ViewConfig, state: &ViewState) -> Vec<Value> {
    let _timer = PROJECTION_SECONDS.start_timer();
    let out = apply_search(records.to_vec(), &state.search, &config.searchable_fields);
    let out = apply_filters(out, &state.filters, &config.filters);
    apply_sort(out, &state.sort)
}
