//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs logging and reads configuration once
//! - loads/stores datasets through the configured storage
//! - runs the comparator, validator, or a full tracked run
//! - prints reports and writes optional exports

use std::collections::BTreeMap;

use chrono::Utc;
use clap::Parser;
use tracing::{info, warn};

use crate::cli::{Command, DriftArgs, GenerateArgs, LeakageArgs, RunArgs, SanityArgs, SplitArgs};
use crate::config::AppConfig;
use crate::data::{SyntheticSpec, generate_synthetic};
use crate::domain::{ColumnType, MonitorRunConfig, Scalar, parse_date, parse_datetime};
use crate::error::{AppError, ErrorKind};
use crate::storage::{DatasetStore, Location, Storage};
use crate::tracking::{FileTracker, Tracker};

pub mod pipeline;

/// Entry point for the `dw` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    if let Err(err) = crate::logging::init() {
        eprintln!("{err}");
    }

    let config = AppConfig::from_env();
    let storage = Storage::new(&config.storage)?;
    storage.ensure_supports(locations(&cli.command))?;

    match cli.command {
        Command::Drift(args) => handle_drift(&storage, args),
        Command::Split(args) => handle_split(&storage, args),
        Command::Leakage(args) => handle_leakage(&storage, args),
        Command::Sanity(args) => handle_sanity(&storage, args),
        Command::Generate(args) => handle_generate(&storage, args),
        Command::Run(args) => handle_run(&storage, &config, args),
    }
}

/// Every dataset location a command will read or write.
fn locations(command: &Command) -> Vec<&Location> {
    match command {
        Command::Drift(a) => vec![&a.reference, &a.current],
        Command::Split(a) => vec![&a.input, &a.train_out, &a.test_out],
        Command::Leakage(a) => vec![&a.train, &a.test],
        Command::Sanity(a) => vec![&a.input],
        Command::Generate(a) => vec![&a.out],
        Command::Run(a) => vec![&a.input],
    }
}

fn handle_drift(storage: &Storage, args: DriftArgs) -> Result<(), AppError> {
    let reference = storage.load(&args.reference)?;
    let current = storage.load(&args.current)?;
    let report = crate::monitor::drift_report(&reference, &current, &args.features, args.bins);

    println!("{}", crate::report::format_drift_report(&report, args.bins));

    if let Some(path) = &args.json {
        crate::io::write_report_json(path, &report)?;
        info!(path = %path.display(), "wrote drift report");
    }
    Ok(())
}

fn handle_split(storage: &Storage, args: SplitArgs) -> Result<(), AppError> {
    let dataset = storage.load(&args.input)?;
    let key_type = dataset.require_column(&args.key)?.column_type();
    let boundary = Scalar::parse_for(&args.boundary, key_type)?;
    let (train, test) = crate::validation::time_split(&dataset, &args.key, &boundary)?;

    storage.store(&train, &args.train_out)?;
    storage.store(&test, &args.test_out)?;
    println!(
        "train: {} rows -> {}\ntest:  {} rows -> {}",
        train.n_rows(),
        args.train_out,
        test.n_rows(),
        args.test_out
    );
    Ok(())
}

fn handle_leakage(storage: &Storage, args: LeakageArgs) -> Result<(), AppError> {
    let train = storage.load(&args.train)?;
    let test = storage.load(&args.test)?;
    let report = crate::validation::leakage_check(&train, &test, &args.features);
    println!("{}", crate::report::format_leakage_report(&report));
    Ok(())
}

fn handle_sanity(storage: &Storage, args: SanityArgs) -> Result<(), AppError> {
    let dataset = storage.load(&args.input)?;
    let expected = expectations(args.expectations);
    let report = crate::validation::sanity_check(&dataset, &expected)?;
    println!("{}", crate::report::format_sanity_report(&report));

    if report.is_empty() {
        Ok(())
    } else {
        Err(AppError::new(
            ErrorKind::Schema,
            format!("{} column(s) failed the sanity check.", report.len()),
        ))
    }
}

fn handle_generate(storage: &Storage, args: GenerateArgs) -> Result<(), AppError> {
    let start = parse_datetime(&args.start)
        .or_else(|| parse_date(&args.start).and_then(|d| d.and_hms_opt(0, 0, 0)))
        .ok_or_else(|| {
            AppError::new(
                ErrorKind::Usage,
                format!("--start '{}' is not a date or timestamp.", args.start),
            )
        })?;
    let spec = SyntheticSpec {
        rows: args.rows,
        seed: args.seed,
        start,
        shift: args.shift,
    };
    let dataset = generate_synthetic(&spec)?;
    storage.store(&dataset, &args.out)?;
    println!("wrote {} rows -> {}", dataset.n_rows(), args.out);
    Ok(())
}

fn handle_run(storage: &Storage, config: &AppConfig, args: RunArgs) -> Result<(), AppError> {
    let run_config = monitor_config_from_args(&args);
    let dataset = storage.load(&args.input)?;

    let run_name = run_config
        .run_name
        .clone()
        .unwrap_or_else(|| format!("monitor_{}", Utc::now().format("%Y%m%dT%H%M%S")));
    let mut tracker = FileTracker::start(&config.tracking, &run_name)?;

    for path in &args.attachments {
        if let Err(err) = tracker.log_artifact(path) {
            // The run directory already exists; close it out.
            if let Err(finish_err) = tracker.finish() {
                warn!(error = %finish_err, "failed to finish run");
            }
            return Err(err);
        }
    }

    let summary = pipeline::run_monitor(&dataset, &run_config, &mut tracker)?;
    println!("{}", crate::report::format_run_summary(&summary, run_config.bins));
    println!("run {}: {}", tracker.run_id(), tracker.run_dir().display());
    Ok(())
}

pub fn monitor_config_from_args(args: &RunArgs) -> MonitorRunConfig {
    MonitorRunConfig {
        input: args.input.to_string(),
        key_column: args.key.clone(),
        boundary: args.boundary.clone(),
        features: args.features.clone(),
        expected_types: expectations(args.expectations.clone()),
        bins: args.bins,
        run_name: args.run_name.clone(),
    }
}

/// Later `--expect` flags for the same column win.
fn expectations(pairs: Vec<(String, ColumnType)>) -> BTreeMap<String, ColumnType> {
    pairs.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    #[test]
    fn run_args_become_monitor_config() {
        let cli = Cli::try_parse_from([
            "dw", "run", "--input", "blob://data/s.csv", "--key", "date", "--boundary", "2022-03-01", "-f",
            "feature1,feature2", "-e", "id=int", "-e", "id=text",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run command");
        };
        let config = monitor_config_from_args(&args);
        assert_eq!(config.input, "blob://data/s.csv");
        assert_eq!(config.features, vec!["feature1", "feature2"]);
        assert_eq!(config.expected_types["id"], ColumnType::Text);
        assert_eq!(config.bins, crate::monitor::DEFAULT_BINS);
        assert_eq!(config.run_name, None);
    }

    #[test]
    fn split_lists_all_locations() {
        let cli = Cli::try_parse_from([
            "dw", "split", "--input", "in.csv", "--key", "d", "--boundary", "5", "--train-out", "blob://c/tr.csv",
            "--test-out", "te.csv",
        ])
        .unwrap();
        let locs = locations(&cli.command);
        assert_eq!(locs.len(), 3);
        assert!(locs[1].is_remote());
    }
}
