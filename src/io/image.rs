//! Source image decoding

use crate::io::error::{ObserverError, Result};
use image::DynamicImage;
use std::path::Path;

/// Decode an image file into memory
///
/// # Errors
///
/// Returns an error if:
/// - The path does not exist
/// - The file cannot be decoded as an image
/// - The decoded image has a zero dimension
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ObserverError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let image = image::open(path).map_err(|e| ObserverError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    ensure_measurable(&image)?;
    Ok(image)
}

/// Reject images that have no pixels
///
/// # Errors
///
/// Returns an error if either dimension is zero
pub fn ensure_measurable(image: &DynamicImage) -> Result<()> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ObserverError::InvalidImage {
            reason: format!("image has no pixels ({}x{})", image.width(), image.height()),
        });
    }
    Ok(())
}
