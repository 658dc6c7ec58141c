//! Distribution comparison: PSI, KS statistic, and per-feature drift reports.
//!
//! Conventions:
//! - the *reference* sample defines the histogram bin edges; the *comparison*
//!   sample is binned against the same edges, unmodified
//! - comparison values outside the reference range are not counted in any bin
//!   (this can understate drift when the comparison has moved far away; the KS
//!   statistic is unaffected)
//! - nothing here thresholds; `PsiBand` exists for presentation only

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::domain::{Dataset, DriftMetrics, DriftReport};
use crate::math::{Histogram, ks_two_sample};

/// Default number of histogram bins for PSI.
pub const DEFAULT_BINS: usize = 10;

/// Minimum density per bin before taking logarithms.
pub const DENSITY_FLOOR: f64 = 1e-6;

/// Population stability index of `comparison` against `reference`.
///
/// `Σ (c - r) * ln(c / r)` over bins of clipped densities. Always finite;
/// a sum that overflows saturates at `f64::MAX`.
pub fn population_stability_index(reference: &[f64], comparison: &[f64], bins: usize) -> f64 {
    let ref_hist = Histogram::from_sample(reference, bins);
    let cmp_hist = Histogram::with_edges(comparison, ref_hist.edges());

    let r = ref_hist.clipped_density(DENSITY_FLOOR);
    let c = cmp_hist.clipped_density(DENSITY_FLOOR);

    let psi: f64 = r
        .iter()
        .zip(c.iter())
        .map(|(&r, &c)| (c - r) * (c / r).ln())
        .sum();
    // Densities over a very narrow reference range can push the sum past f64.
    if psi.is_finite() { psi } else { f64::MAX }
}

/// Maximum absolute gap between the two empirical CDFs, in `[0, 1]`.
pub fn ks_statistic(reference: &[f64], comparison: &[f64]) -> f64 {
    ks_two_sample(reference, comparison)
}

/// PSI and KS for every requested feature present in both datasets.
///
/// Features that are missing on either side, non-numeric, or without any
/// finite value are skipped.
pub fn drift_report(
    reference: &Dataset,
    comparison: &Dataset,
    features: &[String],
    bins: usize,
) -> DriftReport {
    features
        .par_iter()
        .filter_map(|name| {
            let Some((r, c)) = paired_feature(reference, comparison, name) else {
                debug!(feature = %name, "skipping feature for drift report");
                return None;
            };
            let metrics = DriftMetrics {
                psi: population_stability_index(&r, &c, bins),
                ks: ks_statistic(&r, &c),
            };
            Some((name.clone(), metrics))
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

/// Finite values of `name` from both datasets, if both sides have some.
pub(crate) fn paired_feature(a: &Dataset, b: &Dataset, name: &str) -> Option<(Vec<f64>, Vec<f64>)> {
    let av = a.feature_values(name).filter(|v| !v.is_empty())?;
    let bv = b.feature_values(name).filter(|v| !v.is_empty())?;
    Some((av, bv))
}

/// Conventional PSI interpretation bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PsiBand {
    Negligible,
    Moderate,
    Significant,
}

impl PsiBand {
    pub fn classify(psi: f64) -> Self {
        if psi < 0.1 {
            PsiBand::Negligible
        } else if psi <= 0.25 {
            PsiBand::Moderate
        } else {
            PsiBand::Significant
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PsiBand::Negligible => "negligible",
            PsiBand::Moderate => "moderate",
            PsiBand::Significant => "significant",
        }
    }
}
