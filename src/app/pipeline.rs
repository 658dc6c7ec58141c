//! Shared "monitoring run" logic.
//!
//! Keeping this in one place keeps the CLI handler small:
//! sanity check -> time split -> leakage check -> train/test drift -> tracking
//!
//! The pipeline receives an already loaded dataset and an already started
//! tracker; it never touches configuration or storage itself.

use tracing::info;

use crate::domain::{Dataset, MonitorRunConfig, RunSummary, Scalar};
use crate::error::{AppError, ErrorKind};
use crate::monitor::drift_report;
use crate::tracking::{Tracker, drift_metrics, leakage_metrics};
use crate::validation::{leakage_check, sanity_check, time_split};

/// Name of the JSON artifact holding the full `RunSummary`.
pub const SUMMARY_ARTIFACT: &str = "monitor_summary.json";

/// Compute every report for `dataset` without any tracking.
pub fn compute_summary(dataset: &Dataset, config: &MonitorRunConfig) -> Result<RunSummary, AppError> {
    let sanity = sanity_check(dataset, &config.expected_types)?;

    let key = dataset.require_column(&config.key_column)?;
    let boundary = Scalar::parse_for(&config.boundary, key.column_type())?;
    let (train, test) = time_split(dataset, &config.key_column, &boundary)?;
    info!(train = train.n_rows(), test = test.n_rows(), %boundary, "split dataset");

    let leakage = leakage_check(&train, &test, &config.features);
    let drift = drift_report(&train, &test, &config.features, config.bins);
    info!(
        sanity_issues = sanity.len(),
        leakage_features = leakage.len(),
        drift_features = drift.len(),
        "computed reports"
    );

    Ok(RunSummary {
        rows: dataset.n_rows(),
        train_rows: train.n_rows(),
        test_rows: test.n_rows(),
        boundary,
        sanity,
        leakage,
        drift,
    })
}

/// Compute the summary and log it to `tracker`. The run is finished whether
/// or not the computation succeeds.
pub fn run_monitor(
    dataset: &Dataset,
    config: &MonitorRunConfig,
    tracker: &mut dyn Tracker,
) -> Result<RunSummary, AppError> {
    let result = compute_and_log(dataset, config, tracker);
    let finished = tracker.finish();
    let summary = result?;
    finished?;
    Ok(summary)
}

fn compute_and_log(
    dataset: &Dataset,
    config: &MonitorRunConfig,
    tracker: &mut dyn Tracker,
) -> Result<RunSummary, AppError> {
    tracker.log_param("input", &config.input)?;
    tracker.log_param("key_column", &config.key_column)?;
    tracker.log_param("boundary", &config.boundary)?;
    tracker.log_param("bins", &config.bins.to_string())?;
    tracker.log_param("features", &config.features.join(","))?;

    let summary = compute_summary(dataset, config)?;

    tracker.log_metric("rows", summary.rows as f64)?;
    tracker.log_metric("train_rows", summary.train_rows as f64)?;
    tracker.log_metric("test_rows", summary.test_rows as f64)?;
    tracker.log_metric("sanity.issues", summary.sanity.len() as f64)?;
    for (key, value) in leakage_metrics(&summary.leakage).into_iter().chain(drift_metrics(&summary.drift)) {
        tracker.log_metric(&key, value)?;
    }

    let json = serde_json::to_string_pretty(&summary)
        .map_err(|e| AppError::new(ErrorKind::Tracking, format!("Failed to serialize run summary: {e}")))?;
    tracker.log_text(SUMMARY_ARTIFACT, &json)?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::Path;

    use chrono::NaiveDate;

    use super::*;
    use crate::data::{SyntheticSpec, generate_synthetic};
    use crate::domain::ColumnType;

    #[derive(Default)]
    struct RecordingTracker {
        params: BTreeMap<String, String>,
        metrics: BTreeMap<String, f64>,
        texts: Vec<String>,
        finished: bool,
    }

    impl Tracker for RecordingTracker {
        fn log_param(&mut self, key: &str, value: &str) -> Result<(), AppError> {
            self.params.insert(key.into(), value.into());
            Ok(())
        }
        fn log_metric(&mut self, key: &str, value: f64) -> Result<(), AppError> {
            self.metrics.insert(key.into(), value);
            Ok(())
        }
        fn log_artifact(&mut self, _path: &Path) -> Result<(), AppError> {
            Ok(())
        }
        fn log_text(&mut self, name: &str, _contents: &str) -> Result<(), AppError> {
            self.texts.push(name.into());
            Ok(())
        }
        fn finish(&mut self) -> Result<(), AppError> {
            self.finished = true;
            Ok(())
        }
    }

    fn config(boundary: &str) -> MonitorRunConfig {
        MonitorRunConfig {
            input: "synthetic".into(),
            key_column: "date".into(),
            boundary: boundary.into(),
            features: vec!["feature1".into(), "feature2".into(), "missing".into()],
            expected_types: BTreeMap::from([
                ("feature1".to_string(), ColumnType::Float),
                ("target".to_string(), ColumnType::Float),
            ]),
            bins: 10,
            run_name: None,
        }
    }

    fn dataset() -> Dataset {
        let spec = SyntheticSpec {
            rows: 120,
            seed: 5,
            start: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
            shift: 0.0,
        };
        generate_synthetic(&spec).unwrap()
    }

    #[test]
    fn logs_params_metrics_and_summary() {
        let mut tracker = RecordingTracker::default();
        let summary = run_monitor(&dataset(), &config("2022-01-01T00:59:00"), &mut tracker).unwrap();

        assert_eq!(summary.train_rows, 60);
        assert_eq!(summary.test_rows, 60);
        assert_eq!(summary.sanity.keys().collect::<Vec<_>>(), vec!["target"]);
        assert!(summary.drift.contains_key("feature1"));
        assert!(!summary.drift.contains_key("missing"));

        assert!(tracker.finished);
        assert_eq!(tracker.params["boundary"], "2022-01-01T00:59:00");
        assert_eq!(tracker.metrics["train_rows"], 60.0);
        assert_eq!(tracker.metrics["sanity.issues"], 1.0);
        assert!(tracker.metrics.contains_key("drift.feature2.ks"));
        assert!(tracker.metrics.contains_key("leakage.feature1"));
        assert_eq!(tracker.texts, vec![SUMMARY_ARTIFACT.to_string()]);
    }

    #[test]
    fn failed_run_is_still_finished() {
        let mut tracker = RecordingTracker::default();
        let err = run_monitor(&dataset(), &config("not a date"), &mut tracker).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(tracker.finished);
    }
}
