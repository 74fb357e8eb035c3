//! Free-text search stage.

use crate::resolve::{as_search_text, resolve};
use serde_json::Value;

/// Keep a record iff any searchable field, resolved and stringified,
/// contains `query` as a case-insensitive substring. An empty or
/// whitespace-only query is the identity. Fields that do not resolve never
/// match.
pub fn apply_search(mut records: Vec<Value>, query: &str, searchable_fields: &[String]) -> Vec<Value> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records;
    }
    records.retain(|record| {
        searchable_fields.iter().any(|field| {
            resolve(record, field)
                .and_then(|value| as_search_text(value))
                .map(|text| text.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
    });
    records
}
