//! Equal-width, density-normalized histograms.
//!
//! Binning rules:
//!
//! - `bins` equal-width bins spanning `[min, max]` of the sample the edges are
//!   built from; a range too narrow for a normal bin width (including zero
//!   width) is widened by 0.5 on each side
//! - every bin is half-open `[a, b)` except the last, which is closed `[a, b]`
//! - values outside `[first_edge, last_edge]` are not counted anywhere
//! - density is `count / (in_range_total * bin_width)`, so that
//!   `Σ density * width = 1` whenever at least one value was counted

/// Bin edges plus per-bin density.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    edges: Vec<f64>,
    density: Vec<f64>,
}

impl Histogram {
    /// Build edges from `values` (finite values only) and bin them.
    pub fn from_sample(values: &[f64], bins: usize) -> Self {
        let edges = equal_width_edges(values, bins.max(1));
        Self::with_edges(values, &edges)
    }

    /// Bin `values` against existing `edges` (which must be strictly increasing).
    pub fn with_edges(values: &[f64], edges: &[f64]) -> Self {
        let n_bins = edges.len().saturating_sub(1);
        let mut counts = vec![0usize; n_bins];
        for &x in values {
            if let Some(idx) = bin_index(x, edges) {
                counts[idx] += 1;
            }
        }

        let total: usize = counts.iter().sum();
        let density = counts
            .iter()
            .zip(edges.windows(2))
            .map(|(&c, w)| {
                if total == 0 {
                    0.0
                } else {
                    c as f64 / (total as f64 * (w[1] - w[0]))
                }
            })
            .collect();

        Self {
            edges: edges.to_vec(),
            density,
        }
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn density(&self) -> &[f64] {
        &self.density
    }

    pub fn bin_count(&self) -> usize {
        self.density.len()
    }

    /// Densities with every bin raised to at least `floor`.
    pub fn clipped_density(&self, floor: f64) -> Vec<f64> {
        self.density.iter().map(|&d| d.max(floor)).collect()
    }

    /// `Σ density * width` (1.0 for a non-empty histogram, 0.0 otherwise).
    pub fn total_mass(&self) -> f64 {
        self.density
            .iter()
            .zip(self.edges.windows(2))
            .map(|(&d, w)| d * (w[1] - w[0]))
            .sum()
    }
}

fn equal_width_edges(values: &[f64], bins: usize) -> Vec<f64> {
    let (mut lo, mut hi) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if !(lo.is_finite() && hi.is_finite()) {
        // Empty sample: the unit interval keeps edges well-formed.
        lo = 0.0;
        hi = 1.0;
    }

    let n = bins as f64;
    // `hi / n - lo / n` cannot overflow even when `hi - lo` would.
    let mut step = hi / n - lo / n;
    if !step.is_normal() {
        // Half a unit, or enough ulps to separate edges at this magnitude.
        let pad = 0.5f64.max(lo.abs().max(hi.abs()) * f64::EPSILON * n);
        lo = (lo - pad).max(f64::MIN);
        hi = (hi + pad).min(f64::MAX);
        step = hi / n - lo / n;
    }

    let mut edges: Vec<f64> = (0..bins).map(|i| lo + step * i as f64).collect();
    edges.push(hi);
    edges
}

/// Bin of `x`: the last edge `<= x`, with the closing edge folded into the
/// final bin.
fn bin_index(x: f64, edges: &[f64]) -> Option<usize> {
    let n = edges.len().checked_sub(1).filter(|&n| n > 0)?;
    if !(x >= edges[0] && x <= edges[n]) {
        return None;
    }
    let above = edges.partition_point(|&e| e <= x);
    Some((above - 1).min(n - 1))
}
