//! Temporal (or ordinal) train/test split.
//!
//! Rows with `key <= boundary` go to train, rows with `key > boundary` go to
//! test. Source row order is kept inside each partition and both partitions
//! carry the full column set.

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::{ColumnData, Dataset, Scalar};
use crate::error::{AppError, ErrorKind};

/// Split `dataset` on `key_column` at `boundary`.
///
/// Every row lands in exactly one partition. A key cell that cannot be ordered
/// against the boundary (a NaN float) is an error rather than a dropped row.
pub fn time_split(
    dataset: &Dataset,
    key_column: &str,
    boundary: &Scalar,
) -> Result<(Dataset, Dataset), AppError> {
    let key = dataset.require_column(key_column)?;

    let mut train_rows = Vec::new();
    let mut test_rows = Vec::new();
    for row in 0..dataset.n_rows() {
        match compare_cell(&key.data, row, boundary)? {
            Some(Ordering::Greater) => test_rows.push(row),
            Some(_) => train_rows.push(row),
            None => {
                return Err(AppError::new(
                    ErrorKind::Schema,
                    format!("Row {row} of `{key_column}` cannot be compared to boundary {boundary}."),
                ));
            }
        }
    }

    debug!(
        key = key_column,
        %boundary,
        train = train_rows.len(),
        test = test_rows.len(),
        "time split"
    );

    Ok((dataset.select_rows(&train_rows), dataset.select_rows(&test_rows)))
}

/// Order of cell `row` relative to `boundary`.
///
/// `Err` if the boundary type is incompatible with the column type;
/// `Ok(None)` if this particular cell is unordered (NaN).
fn compare_cell(data: &ColumnData, row: usize, boundary: &Scalar) -> Result<Option<Ordering>, AppError> {
    let ordering = match (data, boundary) {
        (ColumnData::Int(v), Scalar::Int(b)) => Some(v[row].cmp(b)),
        (ColumnData::Int(v), Scalar::Float(b)) => (v[row] as f64).partial_cmp(b),
        (ColumnData::Float(v), Scalar::Float(b)) => v[row].partial_cmp(b),
        (ColumnData::Float(v), Scalar::Int(b)) => v[row].partial_cmp(&(*b as f64)),
        (ColumnData::Date(v), Scalar::Date(b)) => Some(v[row].cmp(b)),
        (ColumnData::Date(v), Scalar::Datetime(b)) => Some(midnight(v[row]).cmp(b)),
        (ColumnData::Datetime(v), Scalar::Datetime(b)) => Some(v[row].cmp(b)),
        (ColumnData::Datetime(v), Scalar::Date(b)) => Some(v[row].cmp(&midnight(*b))),
        (ColumnData::Text(v), Scalar::Text(b)) => Some(v[row].as_str().cmp(b.as_str())),
        _ => {
            return Err(AppError::new(
                ErrorKind::Schema,
                format!(
                    "Boundary {boundary} is not comparable with a {} key column.",
                    data.column_type()
                ),
            ));
        }
    };
    Ok(ordering)
}

fn midnight(date: chrono::NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}
