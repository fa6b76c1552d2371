//! Repetition score from the FFT autocorrelation

use super::Mask;
use crate::math::finite_or;
use ndarray::Array2;
use rustfft::{FftDirection, FftPlanner, num_complex::Complex};

/// Substituted for a vanishing normalization denominator
pub const NORMALIZATION_EPSILON: f64 = 1e-12;

/// Mean of the max-normalized circular autocorrelation of the mask
///
/// The autocorrelation is `ifft(fft(x) * conj(fft(x)))`. The result lies in
/// `[0, 1]`; an empty mask scores 0.
pub fn repetition_score(mask: &Mask) -> f64 {
    let (rows, cols) = mask.dim();
    if rows == 0 || cols == 0 {
        return 0.0;
    }

    let mut planner = FftPlanner::<f64>::new();
    let mut surface = mask.mapv(|on| Complex::new(if on { 1.0 } else { 0.0 }, 0.0));

    transform_2d(&mut surface, &mut planner, FftDirection::Forward);
    surface.mapv_inplace(|z| z * z.conj());
    transform_2d(&mut surface, &mut planner, FftDirection::Inverse);

    let peak = surface
        .iter()
        .map(|z| z.norm())
        .fold(0.0, f64::max)
        .max(NORMALIZATION_EPSILON);
    let mean = surface.iter().map(|z| z.norm() / peak).sum::<f64>() / (rows * cols) as f64;

    finite_or(mean, 0.0, 0.0, 1.0)
}

/// In-place separable 2D transform: every row, then every column
fn transform_2d(
    surface: &mut Array2<Complex<f64>>,
    planner: &mut FftPlanner<f64>,
    direction: FftDirection,
) {
    let (rows, cols) = surface.dim();

    let row_fft = planner.plan_fft(cols, direction);
    let mut buffer = vec![Complex::default(); cols];
    for mut row in surface.rows_mut() {
        for (slot, value) in buffer.iter_mut().zip(row.iter()) {
            *slot = *value;
        }
        row_fft.process(&mut buffer);
        for (value, slot) in row.iter_mut().zip(&buffer) {
            *value = *slot;
        }
    }

    let column_fft = planner.plan_fft(rows, direction);
    let mut buffer = vec![Complex::default(); rows];
    for mut column in surface.columns_mut() {
        for (slot, value) in buffer.iter_mut().zip(column.iter()) {
            *slot = *value;
        }
        column_fft.process(&mut buffer);
        for (value, slot) in column.iter_mut().zip(&buffer) {
            *value = *slot;
        }
    }
}
