// statlab-numeric/src/descriptive.rs
//! Descriptive statistics over `f64` slices.

extern crate alloc;
use alloc::vec::Vec;

/// Summary of one sample, as needed by the two-sample tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStats {
    pub n: usize,
    pub mean: f64,
    /// Sum of squared deviations from the mean.
    pub sum_sq: f64,
}

impl SampleStats {
    /// Returns `None` for an empty sample.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        let mean = mean(values)?;
        Some(Self {
            n: values.len(),
            mean,
            sum_sq: sum_of_squares(values, mean),
        })
    }

    /// Unbiased sample variance (ddof = 1). `None` when n < 2.
    pub fn sample_variance(&self) -> Option<f64> {
        if self.n < 2 {
            return None;
        }
        Some(self.sum_sq / (self.n - 1) as f64)
    }
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sum of squared deviations from `center`.
pub fn sum_of_squares(values: &[f64], center: f64) -> f64 {
    values
        .iter()
        .map(|value| {
            let diff = value - center;
            diff * diff
        })
        .sum()
}

/// Unbiased sample variance (ddof = 1), `None` for fewer than two values.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    SampleStats::from_slice(values)?.sample_variance()
}

/// Number of distinct values. `NaN`s are never produced by the callers, but
/// would each count as distinct.
pub fn distinct_count(values: &[f64]) -> usize {
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted.dedup_by(|a, b| a == b);
    sorted.len()
}

/// Minimum and maximum, `None` for an empty slice.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(values.iter().fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_sample_variance_simple_range() {
        // Values: 2, 4, 4, 4, 5, 5, 7, 9
        // Mean: 5.0, sum of squares: 32, ddof=1 variance: 32/7
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = SampleStats::from_slice(&values).unwrap();
        assert!((stats.mean - 5.0).abs() < EPSILON);
        assert!((stats.sum_sq - 32.0).abs() < EPSILON);
        assert!((stats.sample_variance().unwrap() - 32.0 / 7.0).abs() < EPSILON);
    }

    #[test]
    fn test_sample_variance_single_value() {
        assert_eq!(sample_variance(&[5.0]), None);
    }

    #[test]
    fn test_distinct_count() {
        assert_eq!(distinct_count(&[90.0, 90.0, 90.0]), 1);
        assert_eq!(distinct_count(&[1.0, 2.0, 1.0, 3.0]), 3);
        assert_eq!(distinct_count(&[]), 0);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min_max(&[3.0, -1.0, 7.5]), Some((-1.0, 7.5)));
        assert_eq!(min_max(&[]), None);
    }
}
