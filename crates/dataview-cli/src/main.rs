use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use dataview_core::{FilterValue, Record, SortDirection, SortState, ViewConfig, ViewState};
use dataview_engine::{export_as, project, ExportFormat};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dataview")]
#[command(about="DataView admin CLI", long_about=None)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print the projected records as JSON to stdout
    Query {
        #[command(flatten)]
        input: ViewInput,
    },
    /// Write the projection to {prefix}_{date}.{ext}
    Export {
        #[command(flatten)]
        input: ViewInput,
        #[arg(long, default_value = "csv")]
        format: String,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        #[arg(long, default_value = "export")]
        prefix: String,
    },
}

#[derive(Args)]
struct ViewInput {
    /// JSON file holding the record array
    #[arg(long)]
    records: PathBuf,
    /// JSON file holding the view config
    #[arg(long)]
    config: PathBuf,
    #[arg(long)]
    search: Option<String>,
    /// Filter value as KEY=JSON (repeatable), e.g. status='"active"'
    #[arg(long = "filter", value_name = "KEY=JSON")]
    filters: Vec<String>,
    /// Sort as FIELD or FIELD:desc
    #[arg(long)]
    sort: Option<String>,
}

fn read_records(path: &PathBuf) -> Result<Vec<Record>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read records file {}", path.display()))?;
    serde_json::from_str(&raw).context("records file must hold a JSON array of objects")
}

fn read_config(path: &PathBuf) -> Result<ViewConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read config file {}", path.display()))?;
    serde_json::from_str(&raw).context("config file must hold a view config object")
}

fn parse_filter(arg: &str) -> Result<(String, FilterValue)> {
    let Some((key, raw)) = arg.split_once('=') else {
        bail!("filter must look like KEY=JSON, got {arg:?}");
    };
    // bare words are accepted as strings for convenience
    let value = serde_json::from_str(raw)
        .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
    let value: FilterValue =
        serde_json::from_value(value).with_context(|| format!("filter value for {key:?}"))?;
    Ok((key.to_string(), value))
}

fn parse_sort(arg: &str) -> SortState {
    match arg.split_once(':') {
        Some((field, "desc")) => SortState::by(field, SortDirection::Desc),
        Some((field, _)) => SortState::by(field, SortDirection::Asc),
        None => SortState::by(arg, SortDirection::Asc),
    }
}

fn build_state(input: &ViewInput) -> Result<ViewState> {
    let mut state = ViewState::default();
    if let Some(search) = &input.search {
        state.search = search.clone();
    }
    for arg in &input.filters {
        let (key, value) = parse_filter(arg)?;
        if value.is_active() {
            state.filters.insert(key, value);
        }
    }
    if let Some(sort) = &input.sort {
        state.sort = parse_sort(sort);
    }
    Ok(state)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Query { input } => {
            let records = read_records(&input.records)?;
            let config = read_config(&input.config)?;
            let state = build_state(&input)?;
            let out = project(&records, &config, &state);
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Cmd::Export {
            input,
            format,
            out_dir,
            prefix,
        } => {
            let records = read_records(&input.records)?;
            let config = read_config(&input.config)?;
            let state = build_state(&input)?;
            let format: ExportFormat = format
                .parse()
                .map_err(|e| anyhow::anyhow!("{e}"))?;
            let out = project(&records, &config, &state);
            let payload = export_as(&out, format, &config.columns);
            let filename = format!(
                "{}_{}.{}",
                prefix,
                Utc::now().format("%Y-%m-%d"),
                format.extension()
            );
            let path = out_dir.join(filename);
            std::fs::write(&path, payload)
                .with_context(|| format!("write export to {}", path.display()))?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_args_accept_json_and_bare_words() {
        let (key, value) = parse_filter("status=\"active\"").unwrap();
        assert_eq!(key, "status");
        assert_eq!(value, FilterValue::One(json!("active")));

        let (_, value) = parse_filter("status=active").unwrap();
        assert_eq!(value, FilterValue::One(json!("active")));

        let (_, value) = parse_filter("price={\"min\":10,\"max\":20}").unwrap();
        assert!(matches!(value, FilterValue::Range(_)));

        assert!(parse_filter("no-equals-sign").is_err());
    }

    #[test]
    fn sort_arg_parses_direction() {
        assert_eq!(parse_sort("price"), SortState::by("price", SortDirection::Asc));
        assert_eq!(
            parse_sort("price:desc"),
            SortState::by("price", SortDirection::Desc)
        );
        assert_eq!(
            parse_sort("price:asc"),
            SortState::by("price", SortDirection::Asc)
        );
    }
}
