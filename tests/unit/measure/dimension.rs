//! Tests for box counting, the dimension estimate and characteristic scales

#[cfg(test)]
mod tests {
    use fractal_observer::measure::dimension::{
        BoxCounts, DEFAULT_DIMENSION, EMPTY_DIMENSION, MAX_BOX_SIZES, box_counting_dimension,
        characteristic_scales,
    };
    use ndarray::Array2;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    // Tests box sizes double up to the shorter side and stop at the cap
    // Verified by iterating past the shorter side
    #[test]
    fn test_box_sizes() {
        let counts = BoxCounts::from_mask(&Array2::from_elem((5, 40), true));
        assert_eq!(counts.sizes, vec![1, 2, 4]);

        let counts = BoxCounts::from_mask(&Array2::from_elem((256, 256), true));
        assert_eq!(counts.sizes.len(), MAX_BOX_SIZES);
        assert_eq!(counts.sizes.last().copied(), Some(32));
    }

    // Tests counts truncate the image to a multiple of the box size
    // Verified by rounding partial boxes up
    #[test]
    fn test_counts_truncate_partial_boxes() {
        let counts = BoxCounts::from_mask(&Array2::from_elem((6, 6), true));
        assert_eq!(counts.counts, vec![36, 9, 1]);
    }

    // Tests a filled square has dimension two
    // Verified by returning the positive slope
    #[test]
    fn test_filled_square_dimension() {
        let counts = BoxCounts::from_mask(&Array2::from_elem((64, 64), true));
        let dimension = box_counting_dimension(&counts);
        assert!((dimension - 2.0).abs() < 1e-9, "got {dimension}");
    }

    // Tests a one-pixel line has dimension one
    // Verified by fitting counts without logarithms
    #[test]
    fn test_line_dimension() {
        let mask = Array2::from_shape_fn((64, 64), |(r, _)| r == 0);
        let dimension = box_counting_dimension(&BoxCounts::from_mask(&mask));
        assert!((dimension - 1.0).abs() < 1e-9, "got {dimension}");
    }

    // Tests an empty image reports the empty dimension
    // Verified by fitting zero counts
    #[test]
    fn test_empty_dimension() {
        let counts = BoxCounts::from_mask(&Array2::from_elem((32, 32), false));
        assert!(counts.is_empty());
        assert!((box_counting_dimension(&counts) - EMPTY_DIMENSION).abs() < f64::EPSILON);
    }

    // Tests fewer than two usable scales fall back to the default
    // Verified by fitting a single point
    #[test]
    fn test_single_scale_uses_default() {
        let counts = BoxCounts::from_mask(&Array2::from_elem((1, 1), true));
        assert!((box_counting_dimension(&counts) - DEFAULT_DIMENSION).abs() < f64::EPSILON);

        let counts = BoxCounts {
            sizes: vec![1, 2],
            counts: vec![4, 0],
        };
        assert!((box_counting_dimension(&counts) - DEFAULT_DIMENSION).abs() < f64::EPSILON);
    }

    // Tests random masks always give a finite dimension within range
    // Verified by removing the final clamp
    #[test]
    fn test_random_masks_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..40 {
            let rows = rng.random_range(1..80);
            let cols = rng.random_range(1..80);
            let density = rng.random_range(0.0..1.0);
            let mask = Array2::from_shape_fn((rows, cols), |_| rng.random_bool(density));

            let dimension = box_counting_dimension(&BoxCounts::from_mask(&mask));
            assert!(dimension.is_finite());
            assert!((0.0..=3.0).contains(&dimension), "got {dimension}");
        }
    }

    // Tests scales report covered area at the first three sizes
    // Verified by reporting raw counts
    #[test]
    fn test_characteristic_scales() {
        let counts = BoxCounts::from_mask(&Array2::from_elem((16, 16), true));
        assert_eq!(characteristic_scales(&counts), vec![256.0, 256.0, 256.0]);

        let mut sparse = Array2::from_elem((16, 16), false);
        if let Some(pixel) = sparse.get_mut((0, 0)) {
            *pixel = true;
        }
        let counts = BoxCounts::from_mask(&sparse);
        assert_eq!(characteristic_scales(&counts), vec![1.0, 4.0, 16.0]);
    }
}
