//! FILENAME: app/pivot-cli/src/cli.rs
//! Command-line arguments and the command itself.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use pivot_engine::{generate_pivot, AggregationType, PivotConfig};
use pivot_source::{load_config, load_records};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(author, version, about = "Cross-tabulate a dataset into a pivot table", long_about = None)]
pub struct Args {
    /// Dataset to pivot (.xlsx, .xlsm, .xlsb, .xls, .ods or .json)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Pivot configuration (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Row fields, outermost first (overrides the configuration)
    #[arg(long, value_delimiter = ',')]
    pub rows: Vec<String>,

    /// Column fields, outermost first (overrides the configuration)
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Value fields (overrides the configuration)
    #[arg(long, value_delimiter = ',')]
    pub values: Vec<String>,

    /// Aggregation for a value field, as field=sum|avg|count|min|max
    #[arg(long = "agg", value_parser = parse_aggregation)]
    pub aggregations: Vec<(String, AggregationType)>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    /// Also write log lines to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

fn parse_aggregation(raw: &str) -> Result<(String, AggregationType), String> {
    let (field, name) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected field=aggregation, got '{}'", raw))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{}'", raw));
    }
    match name.trim().parse::<AggregationType>().unwrap_or_default() {
        AggregationType::Unsupported(_) => {
            Err(format!("unknown aggregation '{}' (expected sum, avg, count, min or max)", name))
        }
        aggregation => Ok((field.to_string(), aggregation)),
    }
}

/// Configuration file (if any) with the command-line overrides applied.
pub fn build_config(args: &Args) -> anyhow::Result<PivotConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => PivotConfig::default(),
    };

    if !args.rows.is_empty() {
        config.row_fields = args.rows.clone();
    }
    if !args.columns.is_empty() {
        config.column_fields = args.columns.clone();
    }
    if !args.values.is_empty() {
        config.value_fields = args.values.clone();
    }
    for (field, aggregation) in &args.aggregations {
        config.aggregations.insert(field.clone(), aggregation.clone());
    }

    config.validate().context("Invalid pivot configuration")?;
    Ok(config)
}

/// Loads the dataset, pivots it and writes JSON to `out`. An empty pivot
/// writes the flat records instead.
pub fn run(args: &Args, out: &mut impl Write) -> anyhow::Result<()> {
    let config = build_config(args)?;
    let records = load_records(&args.data)
        .with_context(|| format!("Failed to load dataset {}", args.data.display()))?;

    let result = generate_pivot(&records, &config);

    let json = if result.is_empty() {
        log::info!("nothing to cross-tabulate, writing {} flat records", records.len());
        to_json(&records, args.pretty)?
    } else {
        log::info!(
            "pivot has {} rows and {} columns",
            result.row_keys.len(),
            result.column_keys.len()
        );
        to_json(&result, args.pretty)?
    };

    writeln!(out, "{}", json).context("Failed to write output")?;
    Ok(())
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize output")
}
