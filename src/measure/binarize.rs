//! Luminance conversion, Otsu thresholding and morphological cleanup

use super::Mask;
use image::DynamicImage;
use ndarray::Array2;

/// Convert any decoded image into a single 8-bit luminance plane
///
/// Colour images use the standard luma weights; alpha is discarded.
/// Single-channel images are copied unchanged.
pub fn luminance(image: &DynamicImage) -> Array2<u8> {
    let gray = image.to_luma8();
    let (width, height) = (gray.width() as usize, gray.height() as usize);
    let mut plane = Array2::zeros((height, width));
    for (x, y, pixel) in gray.enumerate_pixels() {
        if let Some(value) = plane.get_mut((y as usize, x as usize)) {
            *value = pixel.0[0];
        }
    }
    plane
}

/// Global threshold maximizing between-class variance of the histogram
///
/// Pixels strictly brighter than the returned level are foreground. A
/// single-level image yields its own level, leaving no foreground.
pub fn otsu_threshold(gray: &Array2<u8>) -> u8 {
    let mut histogram = [0u64; 256];
    for &value in gray {
        if let Some(bin) = histogram.get_mut(value as usize) {
            *bin += 1;
        }
    }

    let total: u64 = histogram.iter().sum();
    let weighted_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut threshold = gray.iter().copied().min().unwrap_or(0);
    let mut best_variance = 0.0;
    let mut background_weight = 0u64;
    let mut background_sum = 0.0;

    for (level, &count) in histogram.iter().enumerate() {
        background_weight += count;
        if background_weight == 0 {
            continue;
        }
        let foreground_weight = total - background_weight;
        if foreground_weight == 0 {
            break;
        }

        background_sum += level as f64 * count as f64;
        let background_mean = background_sum / background_weight as f64;
        let foreground_mean = (weighted_total - background_sum) / foreground_weight as f64;
        let separation = background_mean - foreground_mean;
        let variance =
            background_weight as f64 * foreground_weight as f64 * separation * separation;

        if variance > best_variance {
            best_variance = variance;
            threshold = level as u8;
        }
    }

    threshold
}

/// Threshold a luminance plane into a foreground mask
pub fn threshold(gray: &Array2<u8>, level: u8) -> Mask {
    gray.mapv(|value| value > level)
}

/// Otsu binarization, optionally followed by a 3x3 opening
pub fn binarize(gray: &Array2<u8>, denoise: bool) -> Mask {
    let mask = threshold(gray, otsu_threshold(gray));
    if denoise { open_3x3(&mask) } else { mask }
}

/// Erosion followed by dilation with a 3x3 square element
///
/// Removes specks narrower than three pixels while keeping larger shapes.
pub fn open_3x3(mask: &Mask) -> Mask {
    // Erosion treats the outside as foreground and dilation as background,
    // so shapes touching the border are not eaten away.
    let eroded = filter_3x3(mask, true, |window| window.iter().all(|&v| v));
    filter_3x3(&eroded, false, |window| window.iter().any(|&v| v))
}

fn filter_3x3<F>(mask: &Mask, outside: bool, reduce: F) -> Mask
where
    F: Fn(&[bool; 9]) -> bool,
{
    let (rows, cols) = mask.dim();
    Array2::from_shape_fn((rows, cols), |(row, col)| {
        let mut window = [outside; 9];
        for (slot, (dr, dc)) in window.iter_mut().zip(WINDOW_OFFSETS) {
            let r = row as isize + dr;
            let c = col as isize + dc;
            if r >= 0 && c >= 0 {
                if let Some(&value) = mask.get((r as usize, c as usize)) {
                    *slot = value;
                }
            }
        }
        reduce(&window)
    })
}

const WINDOW_OFFSETS: [(isize, isize); 9] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 0),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];
