//! Mean-shift leakage check between two partitions.

use rayon::prelude::*;
use tracing::debug;

use crate::domain::{Dataset, LeakageReport};
use crate::math::mean;
use crate::monitor::drift::paired_feature;

/// `|mean(train) - mean(test)|` for every requested feature present in both
/// partitions. Missing, non-numeric, or all-NaN features are skipped.
pub fn leakage_check(train: &Dataset, test: &Dataset, features: &[String]) -> LeakageReport {
    features
        .par_iter()
        .filter_map(|name| {
            let (a, b) = paired_feature(train, test, name).or_else(|| {
                debug!(feature = %name, "skipping feature for leakage check");
                None
            })?;
            // Means of opposite sign near f64::MAX can still differ by more than f64 holds.
            let diff = (mean(&a)? - mean(&b)?).abs().min(f64::MAX);
            Some((name.clone(), diff))
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Column, ColumnData};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn same_partition_has_zero_shift() {
        let t = Dataset::new(vec![
            Column::new("a", ColumnData::Float(vec![1.0, 4.0, 9.5])),
            Column::new("b", ColumnData::Int(vec![3, 3, 7])),
        ])
        .unwrap();
        let report = leakage_check(&t, &t, &names(&["a", "b"]));
        assert_eq!(report.len(), 2);
        assert!(report.values().all(|&v| v == 0.0));
    }

    #[test]
    fn reports_absolute_mean_difference() {
        let train = Dataset::new(vec![Column::new("x", ColumnData::Float(vec![1.0, 3.0]))]).unwrap();
        let test = Dataset::new(vec![Column::new("x", ColumnData::Float(vec![10.0, f64::NAN]))]).unwrap();
        let report = leakage_check(&train, &test, &names(&["x"]));
        assert_eq!(report.get("x"), Some(&8.0));
    }

    #[test]
    fn missing_features_are_skipped_not_errors() {
        let train = Dataset::new(vec![Column::new("x", ColumnData::Int(vec![1]))]).unwrap();
        let test = Dataset::new(vec![Column::new("y", ColumnData::Int(vec![1]))]).unwrap();
        let report = leakage_check(&train, &test, &names(&["x", "y", "z"]));
        assert!(report.is_empty());
    }

    #[test]
    fn extreme_means_stay_finite() {
        let train = Dataset::new(vec![Column::new("x", ColumnData::Float(vec![f64::MAX, f64::MAX]))]).unwrap();
        let test = Dataset::new(vec![Column::new("x", ColumnData::Float(vec![f64::MIN]))]).unwrap();
        let report = leakage_check(&train, &test, &names(&["x"]));
        assert_eq!(report.get("x"), Some(&f64::MAX));
    }

    #[test]
    fn empty_partition_is_skipped() {
        let train = Dataset::new(vec![Column::new("x", ColumnData::Int(vec![1, 2]))]).unwrap();
        let test = train.select_rows(&[]);
        assert!(leakage_check(&train, &test, &names(&["x"])).is_empty());
    }
}
