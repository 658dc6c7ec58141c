//! In-memory tabular dataset.
//!
//! A `Dataset` is an ordered list of uniquely named, equally long, typed
//! columns. The comparator and validator only ever read it; derived partitions
//! are new datasets built with [`Dataset::select_rows`].

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::types::{ColumnType, DATE_FMT, DATETIME_FMT};
use crate::error::{AppError, ErrorKind};

/// Typed column storage. `Float` uses NaN for missing cells.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Bool(Vec<bool>),
    Text(Vec<String>),
    Date(Vec<NaiveDate>),
    Datetime(Vec<NaiveDateTime>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Bool(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::Date(v) => v.len(),
            ColumnData::Datetime(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Int(_) => ColumnType::Int,
            ColumnData::Float(_) => ColumnType::Float,
            ColumnData::Bool(_) => ColumnType::Bool,
            ColumnData::Text(_) => ColumnType::Text,
            ColumnData::Date(_) => ColumnType::Date,
            ColumnData::Datetime(_) => ColumnType::Datetime,
        }
    }

    /// Finite numeric values of the column, in row order.
    ///
    /// Returns `None` for non-numeric columns. NaN cells are skipped.
    pub fn finite_values(&self) -> Option<Vec<f64>> {
        match self {
            ColumnData::Int(v) => Some(v.iter().map(|&x| x as f64).collect()),
            ColumnData::Float(v) => Some(v.iter().copied().filter(|x| x.is_finite()).collect()),
            ColumnData::Bool(v) => Some(v.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect()),
            ColumnData::Text(_) | ColumnData::Date(_) | ColumnData::Datetime(_) => None,
        }
    }

    /// Gather the given rows (in the given order) into a new column.
    pub fn take(&self, rows: &[usize]) -> ColumnData {
        fn pick<T: Clone>(values: &[T], rows: &[usize]) -> Vec<T> {
            rows.iter().map(|&i| values[i].clone()).collect()
        }
        match self {
            ColumnData::Int(v) => ColumnData::Int(pick(v, rows)),
            ColumnData::Float(v) => ColumnData::Float(pick(v, rows)),
            ColumnData::Bool(v) => ColumnData::Bool(pick(v, rows)),
            ColumnData::Text(v) => ColumnData::Text(pick(v, rows)),
            ColumnData::Date(v) => ColumnData::Date(pick(v, rows)),
            ColumnData::Datetime(v) => ColumnData::Datetime(pick(v, rows)),
        }
    }

    /// Render a single cell as text (CSV export). NaN renders as an empty cell.
    pub fn cell_text(&self, row: usize) -> String {
        match self {
            ColumnData::Int(v) => v[row].to_string(),
            ColumnData::Float(v) if v[row].is_nan() => String::new(),
            // Debug keeps a trailing `.0`, so integral floats reload as floats.
            ColumnData::Float(v) => format!("{:?}", v[row]),
            ColumnData::Bool(v) => v[row].to_string(),
            ColumnData::Text(v) => v[row].clone(),
            ColumnData::Date(v) => v[row].format(DATE_FMT).to_string(),
            ColumnData::Datetime(v) => v[row].format(DATETIME_FMT).to_string(),
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn column_type(&self) -> ColumnType {
        self.data.column_type()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Build a dataset, validating unique names and equal column lengths.
    pub fn new(columns: Vec<Column>) -> Result<Self, AppError> {
        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(AppError::new(
                    ErrorKind::Schema,
                    format!("Duplicate column name `{}`.", col.name),
                ));
            }
        }

        let n_rows = columns.first().map(Column::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != n_rows) {
            return Err(AppError::new(
                ErrorKind::Schema,
                format!(
                    "Column `{}` has {} rows, expected {n_rows}.",
                    bad.name,
                    bad.len()
                ),
            ));
        }

        Ok(Self { columns, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Like [`Dataset::column`], but a missing column is an error.
    pub fn require_column(&self, name: &str) -> Result<&Column, AppError> {
        self.column(name).ok_or_else(|| AppError::missing_column(name))
    }

    /// Finite values of a numeric column, or `None` if absent or non-numeric.
    pub fn feature_values(&self, name: &str) -> Option<Vec<f64>> {
        self.column(name)?.data.finite_values()
    }

    /// A new dataset holding `rows` (source row indices) with the same column set.
    ///
    /// Panics if a row index is out of bounds; callers derive indices from `n_rows`.
    pub fn select_rows(&self, rows: &[usize]) -> Dataset {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), c.data.take(rows)))
            .collect();
        Dataset {
            columns,
            n_rows: rows.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Dataset {
        Dataset::new(vec![
            Column::new("id", ColumnData::Int(vec![1, 2, 3])),
            Column::new("x", ColumnData::Float(vec![0.5, f64::NAN, 2.0])),
            Column::new("name", ColumnData::Text(vec!["a".into(), "b".into(), "c".into()])),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_unequal_lengths() {
        let err = Dataset::new(vec![
            Column::new("a", ColumnData::Int(vec![1, 2])),
            Column::new("b", ColumnData::Int(vec![1])),
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = Dataset::new(vec![
            Column::new("a", ColumnData::Int(vec![1])),
            Column::new("a", ColumnData::Int(vec![2])),
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
    }

    #[test]
    fn feature_values_skip_nan_and_reject_text() {
        let ds = small();
        assert_eq!(ds.feature_values("x"), Some(vec![0.5, 2.0]));
        assert_eq!(ds.feature_values("id"), Some(vec![1.0, 2.0, 3.0]));
        assert_eq!(ds.feature_values("name"), None);
        assert_eq!(ds.feature_values("missing"), None);
    }

    #[test]
    fn select_rows_keeps_column_set_and_order() {
        let ds = small();
        let picked = ds.select_rows(&[2, 0]);
        assert_eq!(picked.n_rows(), 2);
        assert_eq!(picked.column_names(), ds.column_names());
        assert_eq!(picked.column("id").unwrap().data, ColumnData::Int(vec![3, 1]));
    }

    #[test]
    fn nan_renders_as_empty_cell() {
        let ds = small();
        let x = &ds.column("x").unwrap().data;
        assert_eq!(x.cell_text(0), "0.5");
        assert_eq!(x.cell_text(1), "");
        assert_eq!(ColumnData::Float(vec![3.0]).cell_text(0), "3.0");
    }
}
