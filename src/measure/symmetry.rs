//! Rotational symmetry classification
//!
//! The thresholds here feed straight into the classifier's rule table
//! (C3 for Sierpinski, C6/C12 for Koch), so they move together.

use super::Mask;
use super::invariants::SymmetryClass;
use ndarray::Array2;

/// Rotation angles tried, in degrees, in tie-breaking order
pub const CANDIDATE_ANGLES: [u32; 6] = [30, 45, 60, 90, 120, 180];
/// Score above which the best angle names the symmetry directly
pub const STRONG_MATCH: f64 = 0.85;
/// Score above which partial evidence is accepted for C3/C4
pub const PARTIAL_MATCH: f64 = 0.80;

/// Similarity between a mask and its rotation for one angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationScore {
    /// Rotation angle in degrees
    pub angle: u32,
    /// `1 - sum|original - rotated| / (pixels * 255)`
    pub score: f64,
}

/// Rotate about the image centre with nearest-neighbour sampling
///
/// The centre falls between the two middle pixels on even sides, so a mask
/// symmetric about its geometric centre maps onto itself. Pixels that map
/// from outside the source are background.
pub fn rotate_nearest(mask: &Mask, degrees: f64) -> Mask {
    let (rows, cols) = mask.dim();
    let centre_row = (rows as f64 - 1.0) / 2.0;
    let centre_col = (cols as f64 - 1.0) / 2.0;
    let (sin, cos) = degrees.to_radians().sin_cos();

    Array2::from_shape_fn((rows, cols), |(row, col)| {
        let dx = col as f64 - centre_col;
        let dy = row as f64 - centre_row;
        // Inverse mapping: sample the source at the point rotated back
        let source_col = cos.mul_add(dx, sin * dy) + centre_col;
        let source_row = (-sin).mul_add(dx, cos * dy) + centre_row;
        let (r, c) = (source_row.round(), source_col.round());
        if r < 0.0 || c < 0.0 {
            return false;
        }
        mask.get((r as usize, c as usize)).copied().unwrap_or(false)
    })
}

/// Agreement between a mask and a transformed copy on the 0..255 scale
pub fn agreement(original: &Mask, transformed: &Mask) -> f64 {
    let pixels = original.len();
    if pixels == 0 {
        return 0.0;
    }
    let differing = original
        .iter()
        .zip(transformed.iter())
        .filter(|(a, b)| a != b)
        .count();
    let difference = differing as f64 * 255.0;
    1.0 - difference / (pixels as f64 * 255.0)
}

/// Scores for every candidate angle in [`CANDIDATE_ANGLES`] order
pub fn rotation_scores(mask: &Mask) -> Vec<RotationScore> {
    CANDIDATE_ANGLES
        .iter()
        .map(|&angle| RotationScore {
            angle,
            score: agreement(mask, &rotate_nearest(mask, f64::from(angle))),
        })
        .collect()
}

/// Map candidate scores to a symmetry token
///
/// The best angle wins when it exceeds [`STRONG_MATCH`] (earliest angle on
/// ties); otherwise 60° and 120° together imply C3, 90° alone implies C4,
/// and anything else is C1.
pub fn classify_scores(scores: &[RotationScore]) -> SymmetryClass {
    let mut best: Option<RotationScore> = None;
    for candidate in scores {
        if best.is_none_or(|current| candidate.score > current.score) {
            best = Some(*candidate);
        }
    }

    if let Some(best) = best {
        if best.score > STRONG_MATCH {
            if let Some(class) = SymmetryClass::from_rotation_angle(best.angle) {
                return class;
            }
        }
    }

    let score_at = |angle: u32| {
        scores
            .iter()
            .find(|s| s.angle == angle)
            .map_or(0.0, |s| s.score)
    };

    if score_at(60) > PARTIAL_MATCH && score_at(120) > PARTIAL_MATCH {
        SymmetryClass::C3
    } else if score_at(90) > PARTIAL_MATCH {
        SymmetryClass::C4
    } else {
        SymmetryClass::C1
    }
}

/// Best-matching rotational symmetry of a mask
pub fn detect_symmetry(mask: &Mask) -> SymmetryClass {
    classify_scores(&rotation_scores(mask))
}
