//! Formatted terminal output for reports.
//!
//! We keep formatting code in one place so:
//! - the statistics and validation code stays free of presentation concerns
//! - output changes are localized

use crate::domain::{DriftReport, LeakageReport, RunSummary, SanityReport};
use crate::monitor::PsiBand;

/// Drift table: one line per feature with PSI, its conventional band, and KS.
pub fn format_drift_report(report: &DriftReport, bins: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Drift report (bins={bins}) ===\n"));
    if report.is_empty() {
        out.push_str("No comparable features.\n");
        return out;
    }

    let width = name_width(report.keys());
    out.push_str(&format!("{:<width$}  {:>10}  {:<12}  {:>8}\n", "feature", "psi", "band", "ks"));
    for (name, m) in report {
        out.push_str(&format!(
            "{:<width$}  {:>10.4}  {:<12}  {:>8.4}\n",
            name,
            m.psi,
            PsiBand::classify(m.psi).label(),
            m.ks
        ));
    }
    out
}

pub fn format_leakage_report(report: &LeakageReport) -> String {
    let mut out = String::new();
    out.push_str("=== Leakage check (|mean(train) - mean(test)|) ===\n");
    if report.is_empty() {
        out.push_str("No comparable features.\n");
        return out;
    }

    let width = name_width(report.keys());
    for (name, diff) in report {
        out.push_str(&format!("{name:<width$}  {diff:>12.6}\n"));
    }
    out
}

pub fn format_sanity_report(report: &SanityReport) -> String {
    let mut out = String::new();
    out.push_str("=== Sanity check ===\n");
    if report.is_empty() {
        out.push_str("All declared column types match.\n");
        return out;
    }
    for (name, issue) in report {
        out.push_str(&format!("{name}: {issue}\n"));
    }
    out
}

/// Full summary of a tracked monitoring run.
pub fn format_run_summary(summary: &RunSummary, bins: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Rows: {} | train={} | test={} | boundary={}\n\n",
        summary.rows, summary.train_rows, summary.test_rows, summary.boundary
    ));
    out.push_str(&format_sanity_report(&summary.sanity));
    out.push('\n');
    out.push_str(&format_leakage_report(&summary.leakage));
    out.push('\n');
    out.push_str(&format_drift_report(&summary.drift, bins));
    out
}

fn name_width<'a>(names: impl Iterator<Item = &'a String>) -> usize {
    names.map(|n| n.chars().count()).max().unwrap_or(0).max("feature".len())
}
