//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between the comparator and validator without conversion
//! - exported to JSON for run artifacts
//! - flattened into scalar metrics for the tracker

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorKind};

/// Semantic type tag of a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int,
    Float,
    Bool,
    Text,
    Date,
    Datetime,
}

impl ColumnType {
    pub const ALL: [ColumnType; 6] = [
        ColumnType::Int,
        ColumnType::Float,
        ColumnType::Bool,
        ColumnType::Text,
        ColumnType::Date,
        ColumnType::Datetime,
    ];

    /// Exact canonical tag only (`int`, `float`, ...); no aliases.
    pub fn from_name(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == tag)
    }

    pub fn name(self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::Bool => "bool",
            ColumnType::Text => "text",
            ColumnType::Date => "date",
            ColumnType::Datetime => "datetime",
        }
    }

    /// Parse a type tag, accepting a few common spellings.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "int" | "int64" | "integer" => Some(ColumnType::Int),
            "float" | "float64" | "double" => Some(ColumnType::Float),
            "bool" | "boolean" => Some(ColumnType::Bool),
            "text" | "str" | "string" => Some(ColumnType::Text),
            "date" => Some(ColumnType::Date),
            "datetime" | "timestamp" => Some(ColumnType::Datetime),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single comparable value, used as a partition boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    Datetime(NaiveDateTime),
    Text(String),
}

impl Scalar {
    /// Parse `raw` into a scalar suited to compare against a column of type `ty`.
    pub fn parse_for(raw: &str, ty: ColumnType) -> Result<Self, AppError> {
        let raw = raw.trim();
        let invalid = || {
            AppError::new(
                ErrorKind::Usage,
                format!("Boundary '{raw}' cannot be read as a {ty} value."),
            )
        };
        match ty {
            ColumnType::Int => raw
                .parse::<i64>()
                .map(Scalar::Int)
                .or_else(|_| raw.parse::<f64>().map(Scalar::Float))
                .map_err(|_| invalid()),
            ColumnType::Float => raw.parse::<f64>().map(Scalar::Float).map_err(|_| invalid()),
            ColumnType::Date => parse_date(raw)
                .map(Scalar::Date)
                .or_else(|| parse_datetime(raw).map(Scalar::Datetime))
                .ok_or_else(invalid),
            ColumnType::Datetime => parse_datetime(raw)
                .map(Scalar::Datetime)
                .or_else(|| parse_date(raw).map(Scalar::Date))
                .ok_or_else(invalid),
            ColumnType::Text => Ok(Scalar::Text(raw.to_string())),
            ColumnType::Bool => Err(AppError::new(
                ErrorKind::Usage,
                "A bool column cannot be used as a partition key.",
            )),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Date(d) => write!(f, "{}", d.format(DATE_FMT)),
            Scalar::Datetime(dt) => write!(f, "{}", dt.format(DATETIME_FMT)),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// Canonical output format for `date` cells.
pub const DATE_FMT: &str = "%Y-%m-%d";

/// Canonical output format for `datetime` cells. Sub-second precision is
/// written only when present.
pub const DATETIME_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parse a calendar date.
///
/// ISO dates are canonical; `YYYY/MM/DD` is accepted as well because some
/// exports use it.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    const FMTS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
    FMTS.iter().find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parse a timestamp without timezone (`T` or space separated, optional fraction).
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    const FMTS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    FMTS.iter().find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Per-feature drift statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftMetrics {
    pub psi: f64,
    pub ks: f64,
}

/// Feature name -> drift statistics.
pub type DriftReport = BTreeMap<String, DriftMetrics>;

/// Feature name -> absolute difference of partition means.
pub type LeakageReport = BTreeMap<String, f64>;

/// Column name -> type mismatch descriptor. Passing columns have no entry.
pub type SanityReport = BTreeMap<String, String>;

/// Everything a tracked monitoring run produced (written as a JSON artifact).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub boundary: Scalar,
    pub sanity: SanityReport,
    pub leakage: LeakageReport,
    pub drift: DriftReport,
}

/// Configuration of an end-to-end `dw run`.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct MonitorRunConfig {
    pub input: String,
    pub key_column: String,
    pub boundary: String,
    pub features: Vec<String>,
    pub expected_types: BTreeMap<String, ColumnType>,
    pub bins: usize,
    pub run_name: Option<String>,
}
