//! Synthetic tabular dataset generation.
//!
//! Produces a minute-frequency dataset shaped like a typical scoring table:
//!
//! - `date`: one row per minute from `start`
//! - `feature1`: `N(shift, 1)`
//! - `feature2`: uniform integer in `[0, 100)`
//! - `target`: `Bernoulli(0.5)` as 0/1
//!
//! The same seed always yields the same dataset.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Bernoulli, Normal};

use crate::domain::{Column, ColumnData, Dataset};
use crate::error::{AppError, ErrorKind};

#[derive(Debug, Clone)]
pub struct SyntheticSpec {
    pub rows: usize,
    pub seed: u64,
    pub start: NaiveDateTime,
    /// Added to the mean of `feature1` (0 for the baseline distribution).
    pub shift: f64,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        Self {
            rows: 100_000,
            seed: 42,
            start: NaiveDate::from_ymd_opt(2022, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or_default(),
            shift: 0.0,
        }
    }
}

pub fn generate_synthetic(spec: &SyntheticSpec) -> Result<Dataset, AppError> {
    if spec.rows == 0 {
        return Err(AppError::new(ErrorKind::Usage, "Row count must be > 0."));
    }
    if !spec.shift.is_finite() {
        return Err(AppError::new(ErrorKind::Usage, "Shift must be finite."));
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let normal = Normal::new(spec.shift, 1.0)
        .map_err(|e| AppError::new(ErrorKind::Usage, format!("Feature distribution error: {e}")))?;
    let coin = Bernoulli::new(0.5)
        .map_err(|e| AppError::new(ErrorKind::Usage, format!("Target distribution error: {e}")))?;

    let mut dates = Vec::with_capacity(spec.rows);
    let mut feature1 = Vec::with_capacity(spec.rows);
    let mut feature2 = Vec::with_capacity(spec.rows);
    let mut target = Vec::with_capacity(spec.rows);

    for i in 0..spec.rows {
        let ts = spec
            .start
            .checked_add_signed(Duration::minutes(i as i64))
            .ok_or_else(|| AppError::new(ErrorKind::Usage, "Synthetic date range overflows."))?;
        dates.push(ts);
        feature1.push(normal.sample(&mut rng));
        feature2.push(rng.gen_range(0..100i64));
        target.push(i64::from(coin.sample(&mut rng)));
    }

    Dataset::new(vec![
        Column::new("date", ColumnData::Datetime(dates)),
        Column::new("feature1", ColumnData::Float(feature1)),
        Column::new("feature2", ColumnData::Int(feature2)),
        Column::new("target", ColumnData::Int(target)),
    ])
}
