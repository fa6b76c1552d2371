//! Ordinary least-squares line fitting
//!
//! Used by box counting to estimate the scaling exponent from
//! `(log size, log count)` pairs.

use num_traits::Float;

/// Result of fitting `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit<T> {
    /// Gradient of the fitted line
    pub slope: T,
    /// Value of the fitted line at `x = 0`
    pub intercept: T,
}

/// Fit a straight line through paired samples by least squares
///
/// Returns `None` when fewer than two pairs are supplied, the slices differ
/// in length, all `x` values coincide, or the result is not finite.
pub fn least_squares<T: Float>(xs: &[T], ys: &[T]) -> Option<LinearFit<T>> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let n = T::from(xs.len())?;
    let mean_x = xs.iter().fold(T::zero(), |acc, &x| acc + x) / n;
    let mean_y = ys.iter().fold(T::zero(), |acc, &y| acc + y) / n;

    let mut covariance = T::zero();
    let mut variance = T::zero();
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        covariance = covariance + dx * (y - mean_y);
        variance = variance + dx * dx;
    }

    if variance <= T::epsilon() {
        return None;
    }

    let slope = covariance / variance;
    let intercept = mean_y - slope * mean_x;

    (slope.is_finite() && intercept.is_finite()).then_some(LinearFit { slope, intercept })
}
