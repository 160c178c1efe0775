use image::ColorType;
use thiserror::Error;

/// Error type for dense matrix operations
///
/// Covers the failures of the elementwise and coordinate-based
/// operations on [`crate::Matrix`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// Two matrices that are combined elementwise have different sizes
    #[error("Matrix dimensions mismatch: expected {expected:?}, actual {actual:?}")]
    DimensionMismatch {
        /// Expected dimensions (width, height)
        expected: (u32, u32),
        /// Actual dimensions (width, height)
        actual: (u32, u32),
    },

    /// A raw buffer does not hold exactly `width * height` values
    #[error("Buffer holds {actual} values, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    /// The value list of a bulk assignment fits neither broadcast nor one-to-one
    ///
    /// A bulk assignment accepts exactly one value (broadcast to every
    /// coordinate) or exactly one value per coordinate.
    #[error("Invalid argument: {values} values cannot be assigned to {coords} coordinates")]
    InvalidArgument { coords: usize, values: usize },

    /// A coordinate lies outside the matrix
    #[error("Coordinate ({x}, {y}) is outside the {width}x{height} matrix")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

/// Error type for seed decoding and validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedError {
    /// The seed image is not an 8-bit true-color (RGB) image
    #[error("Seed image must be 8-bit RGB, got {color:?}")]
    NotTrueColor { color: ColorType },

    /// No foreground seed was provided
    #[error("Segmentation requires at least one foreground seed")]
    EmptyForeground,

    /// No background seed was provided
    #[error("Segmentation requires at least one background seed")]
    EmptyBackground,

    /// A seed coordinate lies outside the image
    #[error("Seed ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

/// Error type for segmentation runs
///
/// This is the error returned by the solver and the stack driver. Seed
/// and matrix failures are wrapped so callers can match on the cause.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentationError {
    /// The input image has a zero dimension
    #[error("Image dimensions must be non-zero")]
    EmptyImage,

    /// Invalid parameter provided to the solver
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Seed validation failed
    #[error(transparent)]
    Seeds(#[from] SeedError),

    /// A matrix operation failed
    #[error(transparent)]
    Matrix(#[from] MatrixError),

    /// The seed stack does not provide one seed set per frame
    #[error("Stack has {frames} frames but {seeds} seed sets")]
    StackLengthMismatch { frames: usize, seeds: usize },

    /// Segmentation of a single frame in a stack failed
    #[error("Frame {index}: {source}")]
    Frame {
        index: usize,
        #[source]
        source: Box<SegmentationError>,
    },
}
