//! Experiment tracking collaborator.
//!
//! Reports are plain maps; callers flatten them into scalar metrics with
//! [`drift_metrics`] / [`leakage_metrics`] and hand those to a [`Tracker`].
//! The comparator and validator never log to a tracker themselves.

use std::path::Path;

use crate::domain::{DriftReport, LeakageReport};
use crate::error::AppError;

pub mod file;

pub use file::FileTracker;

/// Run-scoped sink for parameters, scalar metrics, and file artifacts.
pub trait Tracker {
    fn log_param(&mut self, key: &str, value: &str) -> Result<(), AppError>;
    fn log_metric(&mut self, key: &str, value: f64) -> Result<(), AppError>;
    fn log_artifact(&mut self, path: &Path) -> Result<(), AppError>;
    /// Store `contents` as an artifact file called `name`.
    fn log_text(&mut self, name: &str, contents: &str) -> Result<(), AppError>;
    /// Close the run and persist anything still buffered.
    fn finish(&mut self) -> Result<(), AppError>;
}

/// `drift.<feature>.psi` / `drift.<feature>.ks` metric pairs.
pub fn drift_metrics(report: &DriftReport) -> Vec<(String, f64)> {
    report
        .iter()
        .flat_map(|(name, m)| [(format!("drift.{name}.psi"), m.psi), (format!("drift.{name}.ks"), m.ks)])
        .collect()
}

/// `leakage.<feature>` metric pairs.
pub fn leakage_metrics(report: &LeakageReport) -> Vec<(String, f64)> {
    report
        .iter()
        .map(|(name, &v)| (format!("leakage.{name}"), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DriftMetrics;

    #[test]
    fn flattens_reports_into_metric_names() {
        let mut drift = DriftReport::new();
        drift.insert("f1".into(), DriftMetrics { psi: 0.4, ks: 0.6 });
        assert_eq!(
            drift_metrics(&drift),
            vec![("drift.f1.psi".to_string(), 0.4), ("drift.f1.ks".to_string(), 0.6)]
        );

        let leakage = LeakageReport::from([("f2".to_string(), 1.5)]);
        assert_eq!(leakage_metrics(&leakage), vec![("leakage.f2".to_string(), 1.5)]);
    }
}
