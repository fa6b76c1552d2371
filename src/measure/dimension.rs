//! Box-counting fractal dimension and characteristic scales

use super::Mask;
use crate::math::finite_or;
use crate::math::regression::least_squares;
use ndarray::Array2;
use tracing::debug;

/// Number of dyadic box sizes examined (1, 2, 4, ...)
pub const MAX_BOX_SIZES: usize = 6;
/// Reported when too few scales are available for a fit
pub const DEFAULT_DIMENSION: f64 = 2.0;
/// Reported for an image without foreground
pub const EMPTY_DIMENSION: f64 = 0.0;
/// Upper bound of the reported dimension
pub const MAX_DIMENSION: f64 = 3.0;
/// Number of box sizes reported as characteristic scales
pub const SCALE_LEVELS: usize = 3;

/// Occupied-box counts at successive dyadic box sizes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoxCounts {
    /// Box edge lengths in pixels
    pub sizes: Vec<usize>,
    /// Number of boxes holding at least one foreground pixel
    pub counts: Vec<usize>,
}

impl BoxCounts {
    /// Count occupied boxes for `s = 1, 2, 4, ...` up to the shorter image side
    ///
    /// Each coarser grid is the 2x2 OR-pooling of the previous one, which is
    /// the same as partitioning the image truncated to a multiple of `s`.
    pub fn from_mask(mask: &Mask) -> Self {
        let (rows, cols) = mask.dim();
        let shortest = rows.min(cols);
        let mut sizes = Vec::with_capacity(MAX_BOX_SIZES);
        let mut counts = Vec::with_capacity(MAX_BOX_SIZES);

        let mut occupancy = mask.clone();
        let mut size = 1;
        while size <= shortest && sizes.len() < MAX_BOX_SIZES {
            sizes.push(size);
            counts.push(occupancy.iter().filter(|&&occupied| occupied).count());
            occupancy = pool_2x2(&occupancy);
            size *= 2;
        }

        Self { sizes, counts }
    }

    /// Whether no box at any size was occupied
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }
}

fn pool_2x2(grid: &Mask) -> Mask {
    let (rows, cols) = grid.dim();
    Array2::from_shape_fn((rows / 2, cols / 2), |(row, col)| {
        let (r, c) = (row * 2, col * 2);
        [(r, c), (r, c + 1), (r + 1, c), (r + 1, c + 1)]
            .iter()
            .any(|&index| grid.get(index).copied().unwrap_or(false))
    })
}

/// Estimate the fractal dimension as the negated slope of `log count` against `log size`
///
/// Never fails: degenerate inputs produce [`EMPTY_DIMENSION`] or
/// [`DEFAULT_DIMENSION`], and the result is clamped into `[0, 3]`.
pub fn box_counting_dimension(box_counts: &BoxCounts) -> f64 {
    if box_counts.is_empty() {
        debug!("no foreground pixels, dimension is {EMPTY_DIMENSION}");
        return EMPTY_DIMENSION;
    }

    let (log_sizes, log_counts): (Vec<f64>, Vec<f64>) = box_counts
        .sizes
        .iter()
        .zip(&box_counts.counts)
        .filter(|&(_, &count)| count > 0)
        .map(|(&size, &count)| ((size as f64).ln(), (count as f64).ln()))
        .unzip();

    match least_squares(&log_sizes, &log_counts) {
        Some(fit) => finite_or(-fit.slope, DEFAULT_DIMENSION, 0.0, MAX_DIMENSION),
        None => {
            debug!(
                scales = log_sizes.len(),
                "box-counting fit unavailable, using default dimension"
            );
            DEFAULT_DIMENSION
        }
    }
}

/// Foreground area covered by occupied boxes at the first few sizes
pub fn characteristic_scales(box_counts: &BoxCounts) -> Vec<f64> {
    box_counts
        .sizes
        .iter()
        .zip(&box_counts.counts)
        .take(SCALE_LEVELS)
        .map(|(&size, &count)| (count * size * size) as f64)
        .collect()
}
