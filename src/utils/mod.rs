//! Internal utility functions for randomwalk-seg.
//!
//! This module contains validation helpers shared by the matrix, seed and solver code.

use crate::error::{MatrixError, SegmentationError};

/// Validates that an image has non-zero dimensions.
///
/// # Arguments
///
/// * `width` - The width of the image
/// * `height` - The height of the image
///
/// # Returns
///
/// `Ok(())` if the dimensions are valid, otherwise `SegmentationError::EmptyImage`
pub fn validate_non_empty_image(width: u32, height: u32) -> Result<(), SegmentationError> {
    if width == 0 || height == 0 {
        Err(SegmentationError::EmptyImage)
    } else {
        Ok(())
    }
}

/// Validates that two matrices or images have matching dimensions.
///
/// # Arguments
///
/// * `expected` - The dimensions (width, height) of the receiver
/// * `actual` - The dimensions (width, height) of the other operand
///
/// # Returns
///
/// `Ok(())` if the dimensions match, otherwise `MatrixError::DimensionMismatch`
pub fn validate_matching_dimensions(
    expected: (u32, u32),
    actual: (u32, u32),
) -> Result<(), MatrixError> {
    if expected != actual {
        Err(MatrixError::DimensionMismatch { expected, actual })
    } else {
        Ok(())
    }
}

/// Checks that a parameter is a finite number, optionally strictly positive.
pub fn validate_finite(name: &str, value: f64, positive: bool) -> Result<(), SegmentationError> {
    if !value.is_finite() || (positive && value <= 0.0) {
        let requirement = if positive {
            "a finite positive number"
        } else {
            "a finite number"
        };
        return Err(SegmentationError::InvalidParameter(format!(
            "{name} must be {requirement}, got {value}"
        )));
    }
    Ok(())
}
