//! Mathematical utilities shared by the estimators

/// Least-squares line fitting
pub mod regression;

/// Replace NaN and infinities with a fallback, then clamp into `[lo, hi]`
pub fn finite_or(value: f64, fallback: f64, lo: f64, hi: f64) -> f64 {
    if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        fallback.clamp(lo, hi)
    }
}
