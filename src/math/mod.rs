//! Mathematical utilities: histograms, empirical CDF distance, and moments.

pub mod ecdf;
pub mod histogram;

pub use ecdf::*;
pub use histogram::*;

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    // Dividing first keeps the running sum within range for extreme values.
    Some(values.iter().map(|v| v / n).sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
    }

    #[test]
    fn mean_of_values_near_float_max_is_finite() {
        assert_eq!(mean(&[f64::MAX, f64::MAX]), Some(f64::MAX));
        assert_eq!(mean(&[f64::MAX, f64::MIN]), Some(0.0));
    }
}
