//! Declared-vs-actual column type check.

use std::collections::BTreeMap;

use tracing::warn;

use crate::domain::{ColumnType, Dataset, SanityReport};
use crate::error::AppError;

/// One issue per column whose actual type differs from the declared type.
///
/// Every declared column must exist; a missing one is an error, not an issue.
pub fn sanity_check(
    dataset: &Dataset,
    expected_types: &BTreeMap<String, ColumnType>,
) -> Result<SanityReport, AppError> {
    let mut issues = SanityReport::new();
    for (name, &expected) in expected_types {
        let actual = dataset.require_column(name)?.column_type();
        if actual != expected {
            warn!(column = %name, %actual, %expected, "column type mismatch");
            issues.insert(name.clone(), mismatch_descriptor(actual, expected));
        }
    }
    Ok(issues)
}

fn mismatch_descriptor(actual: ColumnType, expected: ColumnType) -> String {
    format!("wrong_type({actual}, expected={expected})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Column, ColumnData};
    use crate::error::ErrorKind;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Column::new("id", ColumnData::Text(vec!["a1".into(), "b2".into()])),
            Column::new("amount", ColumnData::Float(vec![1.0, 2.0])),
        ])
        .unwrap()
    }

    #[test]
    fn no_expectations_no_issues() {
        assert!(sanity_check(&dataset(), &BTreeMap::new()).unwrap().is_empty());
    }

    #[test]
    fn text_id_declared_numeric_is_reported() {
        let expected = BTreeMap::from([
            ("id".to_string(), ColumnType::Int),
            ("amount".to_string(), ColumnType::Float),
        ]);
        let report = sanity_check(&dataset(), &expected).unwrap();
        assert_eq!(report.len(), 1);
        let issue = &report["id"];
        assert_eq!(issue, "wrong_type(text, expected=int)");
        assert!(issue.contains("text") && issue.contains("int"));
    }

    #[test]
    fn int_and_float_are_distinct_types() {
        let expected = BTreeMap::from([("amount".to_string(), ColumnType::Int)]);
        let report = sanity_check(&dataset(), &expected).unwrap();
        assert_eq!(report.keys().collect::<Vec<_>>(), vec!["amount"]);
    }

    #[test]
    fn missing_column_is_fatal() {
        let expected = BTreeMap::from([("label".to_string(), ColumnType::Int)]);
        let err = sanity_check(&dataset(), &expected).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingColumn);
    }
}
