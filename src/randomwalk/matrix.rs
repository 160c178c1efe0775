use crate::error::MatrixError;
use crate::randomwalk::seeds::Coord;
use crate::utils::validate_matching_dimensions;
use crate::{Image, Mask, MASK_BACKGROUND, MASK_FOREGROUND};
use image::{ImageBuffer, Luma, Primitive};
use itertools::iproduct;

/// Direction of a one-cell circular shift
///
/// The contents of the matrix move one cell toward the named direction and
/// the cell that falls off one edge re-enters at the opposite edge.
/// Seen from a fixed cell `(x, y)`:
///
/// - `Right` reads `(x - 1, y)`
/// - `Left` reads `(x + 1, y)`
/// - `Top` reads `(x, y + 1)`
/// - `Bottom` reads `(x, y - 1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Left,
    Top,
    Bottom,
}

impl Direction {
    /// All four directions in the order right, left, top, bottom
    pub const ALL: [Self; 4] = [Self::Right, Self::Left, Self::Top, Self::Bottom];

    /// The direction that undoes a shift in this direction
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Right => Self::Left,
            Self::Left => Self::Right,
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }
}

/// Dense row-major matrix of `f64` samples
///
/// Indexing follows the `image` crate: `x` is the column, `y` the row.
/// All fields of the diffusion scheme (gradients, weights, probabilities)
/// are stored in this type. `f64` is required because the conductance
/// weights are exponentials that overflow `f32` with the default parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    width: u32,
    height: u32,
}

impl Matrix {
    /// Creates a zero-filled matrix
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0.0)
    }

    /// Creates a matrix with every cell set to `value`
    #[must_use]
    pub fn filled(width: u32, height: u32, value: f64) -> Self {
        Self {
            data: vec![value; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Wraps a row-major buffer
    ///
    /// # Errors
    ///
    /// * `MatrixError::BufferSize` - if `data.len() != width * height`
    pub fn from_vec(width: u32, height: u32, data: Vec<f64>) -> Result<Self, MatrixError> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(MatrixError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates a matrix by evaluating `f(x, y)` for every cell in row-major order
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> f64,
    {
        let data = iproduct!(0..height, 0..width)
            .map(|(y, x)| f(x, y))
            .collect();
        Self {
            data,
            width,
            height,
        }
    }

    /// Converts a single-channel image into a matrix of real samples
    ///
    /// Sample values are taken as-is, without normalization to `[0, 1]`.
    #[must_use]
    pub fn from_luma<T>(image: &Image<Luma<T>>) -> Self
    where
        T: Primitive + Into<f64>,
    {
        let (width, height) = image.dimensions();
        let data = image.pixels().map(|&Luma([value])| value.into()).collect();
        Self {
            data,
            width,
            height,
        }
    }

    /// Converts the matrix into an `f32` grayscale image, e.g. to inspect a probability field
    #[must_use]
    pub fn to_luma(&self) -> Image<Luma<f32>> {
        ImageBuffer::from_fn(self.width, self.height, |x, y| {
            Luma([self.get(x, y) as f32])
        })
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns (width, height)
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Row-major view of the samples
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable row-major view of the samples
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    #[inline]
    const fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Returns the sample at `(x, y)`
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the matrix, like `ImageBuffer::get_pixel`.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> f64 {
        assert!(x < self.width && y < self.height, "index out of bounds");
        self.data[self.offset(x, y)]
    }

    /// Sets the sample at `(x, y)`
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the matrix.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: f64) {
        assert!(x < self.width && y < self.height, "index out of bounds");
        let offset = self.offset(x, y);
        self.data[offset] = value;
    }

    /// Applies `f` to every sample and returns the result
    #[must_use]
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            data: self.data.iter().map(|&v| f(v)).collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// Applies `f` to every sample in place
    pub fn map_in_place<F>(&mut self, f: F)
    where
        F: Fn(f64) -> f64,
    {
        self.data.iter_mut().for_each(|v| *v = f(*v));
    }

    /// Multiplies every sample by `factor`
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        self.map(|v| v * factor)
    }

    /// Elementwise natural exponential
    #[must_use]
    pub fn exp(&self) -> Self {
        self.map(f64::exp)
    }

    /// Elementwise square
    #[must_use]
    pub fn square(&self) -> Self {
        self.map(|v| v * v)
    }

    /// Divides every sample by `divisor`
    #[must_use]
    pub fn divide_by(&self, divisor: f64) -> Self {
        self.map(|v| v / divisor)
    }

    /// Combines `other` into `self` sample by sample: `self = f(self, other)`
    ///
    /// # Errors
    ///
    /// * `MatrixError::DimensionMismatch` - if the two matrices differ in size
    pub fn combine_in_place<F>(&mut self, other: &Self, f: F) -> Result<(), MatrixError>
    where
        F: Fn(f64, f64) -> f64,
    {
        validate_matching_dimensions(self.dimensions(), other.dimensions())?;
        self.data
            .iter_mut()
            .zip(&other.data)
            .for_each(|(a, &b)| *a = f(*a, b));
        Ok(())
    }

    /// Returns a copy shifted by one cell in `direction`, wrapping around the edges
    #[must_use]
    pub fn shift_circular(&self, direction: Direction) -> Self {
        let (width, height) = self.dimensions();
        Self::from_fn(width, height, |x, y| {
            let (sx, sy) = match direction {
                Direction::Right => ((x + width - 1) % width, y),
                Direction::Left => ((x + 1) % width, y),
                Direction::Top => (x, (y + 1) % height),
                Direction::Bottom => (x, (y + height - 1) % height),
            };
            self.data[self.offset(sx, sy)]
        })
    }

    /// Global maximum; NaN samples are ignored
    #[must_use]
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Global minimum; NaN samples are ignored
    #[must_use]
    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    fn checked_offset(&self, coord: Coord) -> Result<usize, MatrixError> {
        if coord.x >= self.width || coord.y >= self.height {
            return Err(MatrixError::OutOfBounds {
                x: coord.x,
                y: coord.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self.offset(coord.x, coord.y))
    }

    /// Reads the samples at a list of coordinates
    ///
    /// # Errors
    ///
    /// * `MatrixError::OutOfBounds` - if any coordinate is outside the matrix
    pub fn get_at(&self, coords: &[Coord]) -> Result<Vec<f64>, MatrixError> {
        coords
            .iter()
            .map(|&coord| self.checked_offset(coord).map(|i| self.data[i]))
            .collect()
    }

    /// Writes values at a list of coordinates
    ///
    /// `values` must hold either a single value, which is written to every
    /// coordinate, or exactly one value per coordinate.
    ///
    /// # Errors
    ///
    /// * `MatrixError::InvalidArgument` - if the value count fits neither rule
    /// * `MatrixError::OutOfBounds` - if any coordinate is outside the matrix
    pub fn set_at(&mut self, coords: &[Coord], values: &[f64]) -> Result<(), MatrixError> {
        match values {
            [value] => {
                for &coord in coords {
                    let i = self.checked_offset(coord)?;
                    self.data[i] = *value;
                }
            }
            _ if values.len() == coords.len() => {
                for (&coord, &value) in coords.iter().zip(values) {
                    let i = self.checked_offset(coord)?;
                    self.data[i] = value;
                }
            }
            _ => {
                return Err(MatrixError::InvalidArgument {
                    coords: coords.len(),
                    values: values.len(),
                })
            }
        }
        Ok(())
    }

    /// Mean of the samples at a list of coordinates
    ///
    /// Returns NaN for an empty list.
    ///
    /// # Errors
    ///
    /// * `MatrixError::OutOfBounds` - if any coordinate is outside the matrix
    pub fn mean_at(&self, coords: &[Coord]) -> Result<f64, MatrixError> {
        let values = self.get_at(coords)?;
        let sum: f64 = values.iter().sum();
        Ok(sum / values.len() as f64)
    }

    /// Per-sample `self > other` as a binary mask
    ///
    /// Ties and comparisons involving NaN yield background.
    ///
    /// # Errors
    ///
    /// * `MatrixError::DimensionMismatch` - if the two matrices differ in size
    pub fn greater_than(&self, other: &Self) -> Result<Mask, MatrixError> {
        validate_matching_dimensions(self.dimensions(), other.dimensions())?;
        Ok(ImageBuffer::from_fn(self.width, self.height, |x, y| {
            let i = self.offset(x, y);
            if self.data[i] > other.data[i] {
                Luma([MASK_FOREGROUND])
            } else {
                Luma([MASK_BACKGROUND])
            }
        }))
    }
}
