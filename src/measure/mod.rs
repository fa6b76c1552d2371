//! Invariant measurement: raster image in, fixed-shape invariant vector out
//!
//! The pipeline is luminance, Otsu binarization with optional opening, then
//! independent estimators for dimension, connectivity, repetition, symmetry
//! and branching. Every estimator substitutes its documented default rather
//! than failing, so only undecodable or empty images produce errors.

/// Luminance conversion, thresholding and opening
pub mod binarize;
/// Branch angle and ratio estimation
pub mod branching;
/// Box-counting dimension and characteristic scales
pub mod dimension;
/// Invariant vector and symmetry vocabulary
pub mod invariants;
/// FFT autocorrelation repetition score
pub mod spectral;
/// Rotational symmetry classification
pub mod symmetry;
/// Components, skeleton and junctions
pub mod topology;

pub use invariants::{Branching, InvariantVector, SymmetryClass};

use crate::io::configuration::MeasurementConfig;
use crate::io::error::Result;
use crate::io::image::ensure_measurable;
use image::DynamicImage;
use ndarray::Array2;
use tracing::debug;

/// Binary foreground mask indexed `(row, col)`
pub type Mask = Array2<bool>;

/// Measure an image with the default settings
///
/// # Errors
///
/// Returns an error if the image has no pixels
pub fn measure(image: &DynamicImage) -> Result<InvariantVector> {
    measure_with(image, MeasurementConfig::default())
}

/// Measure an image
///
/// # Errors
///
/// Returns an error if the image has no pixels
pub fn measure_with(image: &DynamicImage, config: MeasurementConfig) -> Result<InvariantVector> {
    ensure_measurable(image)?;
    let gray = binarize::luminance(image);
    let mask = binarize::binarize(&gray, config.denoise);
    Ok(measure_mask(&mask))
}

/// Compute every invariant of an already binarized image
pub fn measure_mask(mask: &Mask) -> InvariantVector {
    let box_counts = dimension::BoxCounts::from_mask(mask);
    let invariants = InvariantVector {
        dimensionality: dimension::box_counting_dimension(&box_counts),
        scales: dimension::characteristic_scales(&box_counts),
        connectivity: topology::count_components(mask),
        repetition_score: spectral::repetition_score(mask),
        symmetry_approx: symmetry::detect_symmetry(mask),
        branching: branching::analyze_branching(mask),
    };

    debug!(
        dimensionality = invariants.dimensionality,
        connectivity = invariants.connectivity,
        repetition = invariants.repetition_score,
        symmetry = %invariants.symmetry_approx,
        "measured invariants"
    );
    invariants
}

/// Fraction of foreground pixels
pub fn foreground_density(mask: &Mask) -> f64 {
    if mask.is_empty() {
        return 0.0;
    }
    mask.iter().filter(|&&on| on).count() as f64 / mask.len() as f64
}
