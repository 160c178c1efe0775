//! Test utilities for randomwalk-seg
//!
//! This module provides common fixtures for testing the segmentation code.
//! It is only compiled when running tests.

use crate::{Image, Mask, Matrix, MASK_FOREGROUND};
use image::Luma;

/// Creates a square grayscale image with a bright disc on a dark background.
///
/// Pixels with `(x - cx)² + (y - cy)² <= radius²` get intensity 60,
/// every other pixel 180.
///
/// # Arguments
/// * `size` - Width and height of the image
/// * `cx`, `cy` - Center of the disc
/// * `radius` - Radius of the disc
pub fn create_disc_image(size: u32, cx: u32, cy: u32, radius: u32) -> Image<Luma<u8>> {
    Image::from_fn(size, size, |x, y| {
        if in_disc(x, y, cx, cy, radius) {
            Luma([60])
        } else {
            Luma([180])
        }
    })
}

/// True when `(x, y)` lies inside the disc of [`create_disc_image`]
pub fn in_disc(x: u32, y: u32, cx: u32, cy: u32, radius: u32) -> bool {
    let dx = i64::from(x) - i64::from(cx);
    let dy = i64::from(y) - i64::from(cy);
    dx * dx + dy * dy <= i64::from(radius * radius)
}

/// Creates a square mask of `side` x `side` foreground pixels starting at (`offset`, `offset`).
///
/// # Arguments
/// * `size` - Width and height of the mask
/// * `offset` - Top-left corner of the square
/// * `side` - Side length of the square
pub fn create_square_mask(size: u32, offset: u32, side: u32) -> Mask {
    let inside = |v: u32| v >= offset && v < offset + side;
    Mask::from_fn(size, size, |x, y| {
        if inside(x) && inside(y) {
            Luma([MASK_FOREGROUND])
        } else {
            Luma([0])
        }
    })
}

/// Compares two fields sample by sample with a tolerance.
///
/// # Returns
/// `true` if dimensions match and every sample differs by at most `tolerance`
pub fn fields_approx_equal(expected: &Matrix, actual: &Matrix, tolerance: f64) -> bool {
    if expected.dimensions() != actual.dimensions() {
        return false;
    }
    expected
        .as_slice()
        .iter()
        .zip(actual.as_slice())
        .all(|(e, a)| (e - a).abs() <= tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_disc_image_with_valid_input_creates_image() {
        let image = create_disc_image(11, 5, 5, 3);
        assert_eq!(image.dimensions(), (11, 11));
        assert_eq!(image.get_pixel(5, 5), &Luma([60]));
        assert_eq!(image.get_pixel(5, 2), &Luma([60]));
        assert_eq!(image.get_pixel(3, 3), &Luma([60]));
        assert_eq!(image.get_pixel(2, 2), &Luma([180]));
        assert_eq!(image.get_pixel(0, 0), &Luma([180]));
    }

    #[test]
    fn create_square_mask_with_valid_input_creates_mask() {
        let mask = create_square_mask(6, 2, 3);
        let count = mask.pixels().filter(|p| p[0] == MASK_FOREGROUND).count();
        assert_eq!(count, 9);
        assert_eq!(mask.get_pixel(2, 2)[0], MASK_FOREGROUND);
        assert_eq!(mask.get_pixel(4, 4)[0], MASK_FOREGROUND);
        assert_eq!(mask.get_pixel(5, 4)[0], 0);
    }

    #[test]
    fn fields_approx_equal_with_tolerant_comparison_returns_true() {
        let a = Matrix::filled(2, 2, 1.0);
        let b = Matrix::filled(2, 2, 1.05);
        assert!(fields_approx_equal(&a, &b, 0.1));
        assert!(!fields_approx_equal(&a, &b, 0.01));
        assert!(!fields_approx_equal(&a, &Matrix::filled(2, 3, 1.0), 1.0));
    }
}
