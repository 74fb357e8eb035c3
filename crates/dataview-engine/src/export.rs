//! Export serialization of a projection to CSV or JSON.

use crate::resolve::resolve;
use dataview_core::{Column, ViewError};
use serde_json::Value;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(ViewError::Validation(format!(
                "unknown export format: {other}"
            ))),
        }
    }
}

/// Serialize `records` restricted to the requested columns. Callers pass
/// the current projection, never the raw collection ("export what I see").
pub fn export_as(records: &[Value], format: ExportFormat, columns: &[Column]) -> String {
    match format {
        ExportFormat::Csv => export_csv(records, columns),
        ExportFormat::Json => export_json(records, columns),
    }
}

/// RFC 4180 style: every field double-quoted with embedded quotes doubled,
/// header row from the column labels.
pub fn export_csv(records: &[Value], columns: &[Column]) -> String {
    let mut out = String::new();
    let header: Vec<String> = columns.iter().map(|c| quote(&c.label)).collect();
    out.push_str(&header.join(","));
    out.push('\n');
    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|c| quote(&cell_text(resolve(record, &c.key))))
            .collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Pretty-printed array of objects, keys taken from the column labels in
/// column order.
pub fn export_json(records: &[Value], columns: &[Column]) -> String {
    let rows: Vec<Value> = records
        .iter()
        .map(|record| {
            let mut obj = serde_json::Map::new();
            for column in columns {
                obj.insert(
                    column.label.clone(),
                    resolve(record, &column.key).cloned().unwrap_or(Value::Null),
                );
            }
            Value::Object(obj)
        })
        .collect();
    serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns() -> Vec<Column> {
        vec![
            Column {
                key: "name".into(),
                label: "Name".into(),
            },
            Column {
                key: "analytics.totalSpent".into(),
                label: "Total Spent".into(),
            },
        ]
    }

    #[test]
    fn csv_header_uses_labels() {
        let out = export_csv(&[], &columns());
        assert_eq!(out, "\"Name\",\"Total Spent\"\n");
    }

    #[test]
    fn csv_rows_resolve_nested_paths() {
        let records = vec![json!({"name": "Alex", "analytics": {"totalSpent": 1280}})];
        let out = export_csv(&records, &columns());
        assert_eq!(out, "\"Name\",\"Total Spent\"\n\"Alex\",\"1280\"\n");
    }

    #[test]
    fn csv_escapes_embedded_quotes_and_commas() {
        let records = vec![json!({"name": "Says \"hi\", often", "analytics": {"totalSpent": 1}})];
        let out = export_csv(&records, &columns());
        let row = out.lines().nth(1).unwrap();
        assert_eq!(row, "\"Says \"\"hi\"\", often\",\"1\"");
    }

    #[test]
    fn csv_missing_fields_are_empty_cells() {
        let records = vec![json!({"name": "Alex"})];
        let out = export_csv(&records, &columns());
        assert_eq!(out.lines().nth(1).unwrap(), "\"Alex\",\"\"");
    }

    #[test]
    fn json_limits_to_columns_with_label_keys() {
        let records = vec![json!({
            "name": "Alex",
            "secret": "hidden",
            "analytics": {"totalSpent": 1280}
        })];
        let out = export_json(&records, &columns());
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            parsed,
            json!([{"Name": "Alex", "Total Spent": 1280}])
        );
        assert!(!out.contains("secret"));
    }

    #[test]
    fn format_parses_from_str() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
