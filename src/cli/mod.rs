//! Command-line parsing for the drift/validation tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the statistics and validation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::ColumnType;
use crate::monitor::DEFAULT_BINS;
use crate::storage::Location;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dw", version, about = "Tabular dataset drift and partition validation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare a current dataset against a reference (PSI + KS per feature).
    Drift(DriftArgs),
    /// Split a dataset on a temporal key and store both partitions.
    Split(SplitArgs),
    /// Report the absolute mean shift per feature between two partitions.
    Leakage(LeakageArgs),
    /// Check declared column types; exits with code 3 if any column mismatches.
    Sanity(SanityArgs),
    /// Write a synthetic dataset.
    Generate(GenerateArgs),
    /// End-to-end tracked run: sanity, split, leakage, and train-vs-test drift.
    Run(RunArgs),
}

#[derive(Debug, Args, Clone)]
pub struct DriftArgs {
    /// Reference (expected) dataset: a local CSV path or blob://<container>/<key>.
    #[arg(long)]
    pub reference: Location,

    /// Current (actual) dataset.
    #[arg(long)]
    pub current: Location,

    /// Feature columns to compare (comma separated).
    #[arg(short = 'f', long, value_delimiter = ',', required = true)]
    pub features: Vec<String>,

    /// Number of PSI histogram bins.
    #[arg(long, default_value_t = DEFAULT_BINS, value_parser = parse_bins)]
    pub bins: usize,

    /// Also write the report as JSON.
    #[arg(long)]
    pub json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SplitArgs {
    #[arg(long)]
    pub input: Location,

    /// Key column to split on (date, datetime, or ordinal).
    #[arg(long)]
    pub key: String,

    /// Last key value that belongs to the train partition.
    #[arg(long)]
    pub boundary: String,

    #[arg(long)]
    pub train_out: Location,

    #[arg(long)]
    pub test_out: Location,
}

#[derive(Debug, Args, Clone)]
pub struct LeakageArgs {
    #[arg(long)]
    pub train: Location,

    #[arg(long)]
    pub test: Location,

    /// Feature columns to check (comma separated).
    #[arg(short = 'f', long, value_delimiter = ',', required = true)]
    pub features: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct SanityArgs {
    #[arg(long)]
    pub input: Location,

    /// Expected column type as `column=type` (int, float, bool, text, date, datetime).
    #[arg(short = 'e', long = "expect", value_parser = parse_expectation)]
    pub expectations: Vec<(String, ColumnType)>,
}

#[derive(Debug, Args, Clone)]
pub struct GenerateArgs {
    /// Output location.
    #[arg(long)]
    pub out: Location,

    #[arg(short = 'n', long, default_value_t = 100_000)]
    pub rows: usize,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Timestamp of the first row.
    #[arg(long, default_value = "2022-01-01T00:00:00")]
    pub start: String,

    /// Mean shift applied to `feature1`.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub shift: f64,
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    #[arg(long)]
    pub input: Location,

    #[arg(long)]
    pub key: String,

    #[arg(long)]
    pub boundary: String,

    #[arg(short = 'f', long, value_delimiter = ',', required = true)]
    pub features: Vec<String>,

    #[arg(short = 'e', long = "expect", value_parser = parse_expectation)]
    pub expectations: Vec<(String, ColumnType)>,

    #[arg(long, default_value_t = DEFAULT_BINS, value_parser = parse_bins)]
    pub bins: usize,

    /// Run name (defaults to `monitor_<timestamp>`).
    #[arg(long)]
    pub run_name: Option<String>,

    /// Extra files to attach to the run as artifacts.
    #[arg(long = "attach")]
    pub attachments: Vec<PathBuf>,
}

fn parse_bins(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("bin count must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(format!("invalid bin count: {e}")),
    }
}

fn parse_expectation(raw: &str) -> Result<(String, ColumnType), String> {
    let (column, ty) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected `column=type`, got '{raw}'"))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(format!("missing column name in '{raw}'"));
    }
    let ty = ColumnType::parse(ty).ok_or_else(|| {
        format!("unknown type '{ty}' (expected int, float, bool, text, date, or datetime)")
    })?;
    Ok((column.to_string(), ty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_drift_command() {
        let cli = Cli::try_parse_from([
            "dw", "drift", "--reference", "ref.csv", "--current", "blob://c/cur.csv", "-f", "a,b", "--bins", "20",
        ])
        .unwrap();
        let Command::Drift(args) = cli.command else {
            panic!("expected drift command");
        };
        assert_eq!(args.features, vec!["a", "b"]);
        assert_eq!(args.bins, 20);
        assert!(args.current.is_remote());
    }

    #[test]
    fn zero_bins_are_rejected() {
        let res = Cli::try_parse_from([
            "dw", "drift", "--reference", "r.csv", "--current", "c.csv", "-f", "a", "--bins", "0",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn parses_expectations() {
        assert_eq!(parse_expectation("id=int").unwrap(), ("id".to_string(), ColumnType::Int));
        assert!(parse_expectation("id").is_err());
        assert!(parse_expectation("id=complex").is_err());
        assert!(parse_expectation("=int").is_err());
    }

    #[test]
    fn generate_accepts_negative_shift() {
        let cli = Cli::try_parse_from(["dw", "generate", "--out", "s.csv", "--shift", "-2.5"]).unwrap();
        let Command::Generate(args) = cli.command else {
            panic!("expected generate command");
        };
        assert_eq!(args.shift, -2.5);
        assert_eq!(args.rows, 100_000);
    }
}
