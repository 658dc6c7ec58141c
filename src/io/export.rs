//! Dataset and report exports.
//!
//! Datasets are written with a typed header that `ingest` honours, so a
//! stored partition reloads with the same column types even when its cells
//! alone would infer differently. Reports go out as
//! pretty JSON for run artifacts and downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::Dataset;
use crate::error::{AppError, ErrorKind};

/// Write `dataset` as CSV: a `name:type` header, then one line per row.
pub fn write_dataset_csv<W: Write>(writer: W, dataset: &Dataset) -> Result<(), AppError> {
    let mut out = csv::Writer::from_writer(writer);
    let write_err = |e: csv::Error| AppError::new(ErrorKind::Io, format!("Failed to write CSV: {e}"));

    let header: Vec<String> = dataset
        .columns()
        .iter()
        .map(|c| format!("{}:{}", c.name, c.column_type()))
        .collect();
    out.write_record(&header).map_err(write_err)?;
    for row in 0..dataset.n_rows() {
        let record: Vec<String> = dataset.columns().iter().map(|c| c.data.cell_text(row)).collect();
        out.write_record(&record).map_err(write_err)?;
    }
    out.flush()
        .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to flush CSV: {e}")))?;
    Ok(())
}

/// Serialize `report` to `path` as pretty JSON.
pub fn write_report_json<T: Serialize>(path: &Path, report: &T) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            ErrorKind::Io,
            format!("Failed to create report JSON '{}': {e}", path.display()),
        )
    })?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to write report JSON: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Column, ColumnData, DriftMetrics, DriftReport};
    use crate::io::ingest::read_dataset_csv;
    use chrono::NaiveDate;

    #[test]
    fn written_csv_reloads_with_same_types() {
        let ds = Dataset::new(vec![
            Column::new("day", ColumnData::Date(vec![NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()])),
            Column::new("x", ColumnData::Float(vec![2.5])),
            Column::new("n", ColumnData::Int(vec![7])),
            Column::new("label", ColumnData::Text(vec!["has,comma".into()])),
        ])
        .unwrap();

        let mut buf = Vec::new();
        write_dataset_csv(&mut buf, &ds).unwrap();
        let back = read_dataset_csv(buf.as_slice(), "buffer").unwrap();
        assert_eq!(back, ds);
    }

    #[test]
    fn header_carries_column_types() {
        let ds = Dataset::new(vec![
            Column::new("id", ColumnData::Text(vec!["7".into()])),
            Column::new("x", ColumnData::Float(vec![f64::NAN])),
        ])
        .unwrap();
        let mut buf = Vec::new();
        write_dataset_csv(&mut buf, &ds).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().next(), Some("id:text,x:float"));

        let back = read_dataset_csv(text.as_bytes(), "buffer").unwrap();
        assert_eq!(back.column("id").unwrap().data, ColumnData::Text(vec!["7".into()]));
        assert_eq!(back.column("x").unwrap().column_type(), crate::domain::ColumnType::Float);
    }

    #[test]
    fn report_json_is_keyed_by_feature() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drift.json");
        let mut report = DriftReport::new();
        report.insert("f1".into(), DriftMetrics { psi: 0.5, ks: 0.25 });
        write_report_json(&path, &report).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["f1"]["psi"], 0.5);
        assert_eq!(value["f1"]["ks"], 0.25);
    }
}
