//! Field-path resolution and the value coercions shared by every stage.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;
use std::cmp::Ordering;

/// Resolve a dot-separated field path against a record.
///
/// Walks the record segment by segment and short-circuits to `None` on any
/// missing intermediate. Never panics. `None` (field absent) is kept
/// distinct from `Some(Value::Null)` so the sort stage can place truly
/// missing values deterministically.
pub fn resolve<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

/// Stringify a resolved value for substring search. Arrays flatten to their
/// scalar elements; objects and nulls never match.
pub fn as_search_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(as_search_text).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(" "))
            }
        }
        Value::Null | Value::Object(_) => None,
    }
}

/// Numeric coercion for range filters and comparisons. Numeric strings are
/// accepted; anything else is "not a number".
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Date coercion for daterange filters and chronological sorting.
pub fn as_date(value: &Value) -> Option<DateTime<Utc>> {
    value.as_str().and_then(parse_date)
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates. An unparsable
/// string is treated as absent, never as an error.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}

/// Compare two values with native ordering: numbers numerically, strings
/// that both parse as dates chronologically, other strings lexically,
/// booleans false < true. Mismatched types are incomparable.
pub fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => match (parse_date(a), parse_date(b)) {
            (Some(da), Some(db)) => Some(da.cmp(&db)),
            _ => Some(a.cmp(b)),
        },
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Equality across representations: `1` equals `1.0`, otherwise plain JSON
/// equality.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    left == right || compare_values(left, right) == Some(Ordering::Equal)
}
