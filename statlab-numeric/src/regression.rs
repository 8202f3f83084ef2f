// statlab-numeric/src/regression.rs
//! Simple (one predictor) ordinary least squares.

use crate::descriptive::{mean, sum_of_squares};
use crate::{NumericError, Result};

/// A fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination of the fit on its own training data.
    pub r_squared: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fits `y` on `x` by least squares.
///
/// R² is `1 - SS_res / SS_tot`. A constant `y` has no variance to explain,
/// so R² is 1.0 when the fit is exact and 0.0 otherwise.
pub fn fit_line(x: &[f64], y: &[f64]) -> Result<LinearFit> {
    if x.len() != y.len() {
        return Err(NumericError::LengthMismatch { left: x.len(), right: y.len() });
    }
    if x.len() < 2 {
        return Err(NumericError::TooFewObservations { needed: 2, found: x.len() });
    }

    let (mean_x, mean_y) = match (mean(x), mean(y)) {
        (Some(mx), Some(my)) => (mx, my),
        _ => return Err(NumericError::TooFewObservations { needed: 2, found: 0 }),
    };

    let sxx = sum_of_squares(x, mean_x);
    if sxx == 0.0 {
        return Err(NumericError::ZeroVariance);
    }
    let sxy: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let ss_res: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| {
            let residual = yi - (slope * xi + intercept);
            residual * residual
        })
        .sum();
    let ss_tot = sum_of_squares(y, mean_y);

    let r_squared = if ss_tot == 0.0 {
        if ss_res == 0.0 { 1.0 } else { 0.0 }
    } else {
        1.0 - ss_res / ss_tot
    };

    Ok(LinearFit { slope, intercept, r_squared })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_line() {
        let fit = fit_line(&[1.0, 2.0, 3.0, 4.0], &[3.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
        assert!((fit.predict(10.0) - 21.0).abs() < 1e-12);
    }

    #[test]
    fn test_noisy_line() {
        // slope 0.6, intercept 2.2, R² = 0.6
        let fit = fit_line(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 5.0, 4.0, 5.0]).unwrap();
        assert!((fit.slope - 0.6).abs() < 1e-12);
        assert!((fit.intercept - 2.2).abs() < 1e-12);
        assert!((fit.r_squared - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_constant_y() {
        let fit = fit_line(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.r_squared, 1.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(matches!(fit_line(&[1.0], &[2.0]), Err(NumericError::TooFewObservations { .. })));
        assert_eq!(fit_line(&[2.0, 2.0], &[1.0, 3.0]), Err(NumericError::ZeroVariance));
        assert!(matches!(fit_line(&[1.0, 2.0], &[1.0]), Err(NumericError::LengthMismatch { .. })));
    }
}
