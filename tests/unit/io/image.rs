//! Tests for source image loading and measurability checks

#[cfg(test)]
mod tests {
    use fractal_observer::ObserverError;
    use fractal_observer::io::image::{ensure_measurable, load_image};
    use image::{DynamicImage, GrayImage, Luma};
    use std::fs;
    use tempfile::TempDir;

    // Tests a written PNG loads with its dimensions
    // Verified by swapping width and height
    #[test]
    fn test_load_png() {
        let Ok(dir) = TempDir::new() else {
            panic!("temp dir");
        };
        let path = dir.path().join("input.png");
        let mut gray = GrayImage::new(12, 7);
        gray.put_pixel(3, 3, Luma([200]));
        assert!(gray.save(&path).is_ok());

        let Ok(image) = load_image(&path) else {
            panic!("image should load");
        };
        assert_eq!((image.width(), image.height()), (12, 7));
    }

    // Tests missing files are input errors
    // Verified by attempting to decode first
    #[test]
    fn test_missing_file() {
        let result = load_image("definitely/not/here.png");
        assert!(matches!(result, Err(ObserverError::InputNotFound { .. })));
        assert!(result.err().is_some_and(|e| e.is_input_error()));
    }

    // Tests undecodable files are input errors
    // Verified by mapping decode failures to file system errors
    #[test]
    fn test_undecodable_file() {
        let Ok(dir) = TempDir::new() else {
            panic!("temp dir");
        };
        let path = dir.path().join("broken.png");
        assert!(fs::write(&path, b"not an image").is_ok());

        let result = load_image(&path);
        assert!(matches!(result, Err(ObserverError::ImageLoad { .. })));
    }

    // Tests images without pixels are rejected
    // Verified by checking only the width
    #[test]
    fn test_ensure_measurable() {
        assert!(ensure_measurable(&DynamicImage::new_luma8(3, 3)).is_ok());
        assert!(matches!(
            ensure_measurable(&DynamicImage::new_luma8(4, 0)),
            Err(ObserverError::InvalidImage { .. })
        ));
    }
}
