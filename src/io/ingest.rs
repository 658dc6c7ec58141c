//! CSV ingest and type inference.
//!
//! This module is responsible for turning a CSV payload (from a local file or a
//! remote object) into a typed `Dataset`.
//!
//! Design goals:
//! - **Strict shape**: every record must have as many fields as the header
//! - **Deterministic inference**: a column gets the first type in
//!   `int -> float -> bool -> date -> datetime -> text` that parses every
//!   non-empty cell
//! - **Nulls only where representable**: empty cells are allowed in numeric
//!   columns (they become NaN floats); anywhere else they force `text`
//! - **Declared types win**: a `name:type` header (as written by
//!   `export::write_dataset_csv`) skips inference and every cell must parse
//!   as that type

use std::io::Read;

use csv::StringRecord;

use crate::domain::{Column, ColumnData, ColumnType, Dataset, parse_date, parse_datetime};
use crate::error::{AppError, ErrorKind};

/// Parse CSV from `reader`. `source` is only used in error messages.
pub fn read_dataset_csv<R: Read>(reader: R, source: &str) -> Result<Dataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<(String, Option<ColumnType>)> = reader
        .headers()
        .map_err(|e| AppError::new(ErrorKind::Io, format!("Failed to read CSV headers from '{source}': {e}")))?
        .iter()
        .map(|h| split_typed_header(&normalize_header_name(h)))
        .collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header and lines are 1-based.
        let line = idx + 2;
        let record: StringRecord = result
            .map_err(|e| AppError::new(ErrorKind::Io, format!("CSV parse error in '{source}' line {line}: {e}")))?;
        for (col, value) in cells.iter_mut().zip(record.iter()) {
            col.push(value.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|((name, declared), raw)| {
            let data = match declared {
                Some(ty) => parse_declared(&name, ty, raw, source)?,
                None => infer_column(raw),
            };
            Ok(Column::new(name, data))
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    Dataset::new(columns)
}

/// Strip a UTF-8 byte-order mark and surrounding whitespace from a header.
fn normalize_header_name(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_string()
}

/// `amount:float` ->(`amount`, Some(Float)). Anything after the last `:` that
/// is not a canonical type tag stays part of the name.
fn split_typed_header(header: &str) -> (String, Option<ColumnType>) {
    match header.rsplit_once(':') {
        Some((name, tag)) if !name.is_empty() => match ColumnType::from_name(tag) {
            Some(ty) => (name.to_string(), Some(ty)),
            None => (header.to_string(), None),
        },
        _ => (header.to_string(), None),
    }
}

fn parse_declared(name: &str, ty: ColumnType, raw: Vec<String>, source: &str) -> Result<ColumnData, AppError> {
    let data = match ty {
        ColumnType::Int => ColumnData::Int(parse_cells(&raw, |s| s.parse::<i64>().ok(), name, ty, source)?),
        ColumnType::Float => ColumnData::Float(parse_cells(&raw, parse_nullable_float, name, ty, source)?),
        ColumnType::Bool => ColumnData::Bool(parse_cells(&raw, parse_bool, name, ty, source)?),
        ColumnType::Date => ColumnData::Date(parse_cells(&raw, parse_date, name, ty, source)?),
        ColumnType::Datetime => ColumnData::Datetime(parse_cells(&raw, parse_datetime, name, ty, source)?),
        ColumnType::Text => ColumnData::Text(raw),
    };
    Ok(data)
}

fn parse_cells<T>(
    raw: &[String],
    parse: impl Fn(&str) -> Option<T>,
    name: &str,
    ty: ColumnType,
    source: &str,
) -> Result<Vec<T>, AppError> {
    raw.iter()
        .enumerate()
        .map(|(idx, cell)| {
            parse(cell.as_str()).ok_or_else(|| {
                AppError::new(
                    ErrorKind::Schema,
                    format!("'{source}' line {}: `{name}` value '{cell}' is not a {ty}.", idx + 2),
                )
            })
        })
        .collect()
}

fn infer_column(raw: Vec<String>) -> ColumnData {
    let has_empty = raw.iter().any(|s| s.is_empty());
    let non_empty: Vec<&str> = raw.iter().map(String::as_str).filter(|s| !s.is_empty()).collect();

    if non_empty.is_empty() {
        return ColumnData::Text(raw);
    }

    if let Some(ints) = parse_all(&non_empty, |s| s.parse::<i64>().ok()) {
        if !has_empty {
            return ColumnData::Int(ints);
        }
    }
    if non_empty.iter().all(|s| parse_float(s).is_some()) {
        let floats = raw.iter().map(|s| parse_float(s).unwrap_or(f64::NAN)).collect();
        return ColumnData::Float(floats);
    }
    if has_empty {
        return ColumnData::Text(raw);
    }
    if let Some(bools) = parse_all(&non_empty, parse_bool) {
        return ColumnData::Bool(bools);
    }
    if let Some(dates) = parse_all(&non_empty, parse_date) {
        return ColumnData::Date(dates);
    }
    if let Some(stamps) = parse_all(&non_empty, parse_datetime) {
        return ColumnData::Datetime(stamps);
    }
    ColumnData::Text(raw)
}

fn parse_all<T>(cells: &[&str], parse: impl Fn(&str) -> Option<T>) -> Option<Vec<T>> {
    cells.iter().map(|s| parse(s)).collect()
}

fn parse_nullable_float(s: &str) -> Option<f64> {
    if s.is_empty() { Some(f64::NAN) } else { parse_float(s) }
}

fn parse_float(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    match s.to_ascii_lowercase().as_str() {
        "nan" => Some(f64::NAN),
        _ => s.parse::<f64>().ok(),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
