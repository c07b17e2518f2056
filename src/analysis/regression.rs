// Released under MIT License.
// Copyright (c) 2025 lamman_rs developers

//! Implementation of ordinary least-squares linear regression.

use getset::CopyGetters;
use serde::Serialize;

use crate::errors::RegressionError;

/// Result of fitting `y = slope · x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct LinearFit {
    slope: f64,
    intercept: f64,
    /// Pearson correlation coefficient.
    r_value: f64,
    /// Coefficient of determination (`r_value²`).
    r_squared: f64,
}

impl LinearFit {
    /// Evaluate the fitted line at `x`.
    #[inline(always)]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fit a straight line through the points using ordinary least squares.
///
/// ## Returns
/// - `LinearFit` if successful.
/// - `RegressionError` if fewer than two points are provided, if `x` and `y`
///   differ in length, or if all `x` values are identical.
///
/// ## Notes
/// - If all `y` values are identical, the correlation coefficient is 0.
///
/// ## Example
/// ```
/// # use lamman_rs::analysis::regression::linear_regression;
/// # use float_cmp::assert_approx_eq;
/// #
/// let x = [0.0, 1.0, 2.0, 3.0];
/// let y = [1.0, 3.0, 5.0, 7.0];
///
/// let fit = linear_regression(&x, &y).unwrap();
/// assert_approx_eq!(f64, fit.slope(), 2.0);
/// assert_approx_eq!(f64, fit.intercept(), 1.0);
/// assert_approx_eq!(f64, fit.r_squared(), 1.0);
/// ```
pub fn linear_regression(x: &[f64], y: &[f64]) -> Result<LinearFit, RegressionError> {
    if x.len() != y.len() {
        return Err(RegressionError::LengthMismatch(x.len(), y.len()));
    }

    if x.len() < 2 {
        return Err(RegressionError::NotEnoughPoints(x.len()));
    }

    let n = x.len() as f64;
    let xmean = x.iter().sum::<f64>() / n;
    let ymean = y.iter().sum::<f64>() / n;

    let (mut ssxm, mut ssym, mut ssxym) = (0.0, 0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - xmean;
        let dy = yi - ymean;
        ssxm += dx * dx;
        ssym += dy * dy;
        ssxym += dx * dy;
    }

    if ssxm == 0.0 {
        return Err(RegressionError::IdenticalX);
    }

    let slope = ssxym / ssxm;
    let intercept = ymean - slope * xmean;

    let r_value = if ssym == 0.0 {
        0.0
    } else {
        (ssxym / (ssxm * ssym).sqrt()).clamp(-1.0, 1.0)
    };

    Ok(LinearFit {
        slope,
        intercept,
        r_value,
        r_squared: r_value * r_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rand::{Rng, SeedableRng};

    #[test]
    fn exact_line() {
        let x: Vec<f64> = (0..10).map(|i| i as f64 * 0.5).collect();
        let y: Vec<f64> = x.iter().map(|x| -3.0 * x + 2.5).collect();

        let fit = linear_regression(&x, &y).unwrap();
        assert_approx_eq!(f64, fit.slope(), -3.0, epsilon = 1e-12);
        assert_approx_eq!(f64, fit.intercept(), 2.5, epsilon = 1e-12);
        assert_approx_eq!(f64, fit.r_value(), -1.0, epsilon = 1e-12);
        assert_approx_eq!(f64, fit.r_squared(), 1.0, epsilon = 1e-12);
        assert_approx_eq!(f64, fit.predict(2.0), -3.5, epsilon = 1e-12);
    }

    #[test]
    fn known_values() {
        // reference values computed with scipy.stats.linregress
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];

        let fit = linear_regression(&x, &y).unwrap();
        assert_approx_eq!(f64, fit.slope(), 0.6, epsilon = 1e-12);
        assert_approx_eq!(f64, fit.intercept(), 2.2, epsilon = 1e-12);
        assert_approx_eq!(f64, fit.r_value(), 0.7745966692414834, epsilon = 1e-12);
        assert_approx_eq!(f64, fit.r_squared(), 0.6, epsilon = 1e-12);
    }

    #[test]
    fn noisy_line() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let x: Vec<f64> = (0..500).map(|i| i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .map(|x| 0.25 * x + 10.0 + rng.gen_range(-1.0..1.0))
            .collect();

        let fit = linear_regression(&x, &y).unwrap();
        assert_approx_eq!(f64, fit.slope(), 0.25, epsilon = 1e-2);
        assert_approx_eq!(f64, fit.intercept(), 10.0, epsilon = 0.5);
        assert!(fit.r_squared() > 0.99);
    }

    #[test]
    fn constant_y() {
        let fit = linear_regression(&[1.0, 2.0, 3.0], &[4.0, 4.0, 4.0]).unwrap();
        assert_approx_eq!(f64, fit.slope(), 0.0);
        assert_approx_eq!(f64, fit.intercept(), 4.0);
        assert_approx_eq!(f64, fit.r_squared(), 0.0);
    }

    #[test]
    fn fail_not_enough_points() {
        assert_eq!(
            linear_regression(&[1.0], &[2.0]),
            Err(RegressionError::NotEnoughPoints(1))
        );
        assert_eq!(
            linear_regression(&[], &[]),
            Err(RegressionError::NotEnoughPoints(0))
        );
    }

    #[test]
    fn fail_length_mismatch() {
        assert_eq!(
            linear_regression(&[1.0, 2.0, 3.0], &[2.0, 3.0]),
            Err(RegressionError::LengthMismatch(3, 2))
        );
    }

    #[test]
    fn fail_identical_x() {
        assert_eq!(
            linear_regression(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]),
            Err(RegressionError::IdenticalX)
        );
    }
}
