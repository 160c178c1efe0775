use crate::error::SeedError;
use crate::Image;
use image::{DynamicImage, Rgb};

/// Integer pixel coordinate
///
/// `x` is the column and `y` the row, the same convention as
/// `ImageBuffer::get_pixel(x, y)`. Every seed list in this crate uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    /// Column
    pub x: u32,
    /// Row
    pub y: u32,
}

impl Coord {
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl From<(u32, u32)> for Coord {
    /// Converts an `(x, y)` pair
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

/// Foreground and background seed coordinates
///
/// Seeds act as pinned boundary conditions for the diffusion. The two
/// lists are expected to be disjoint but this is not enforced; a
/// coordinate present in both ends up pinned as background, because
/// background pinning is applied last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedSet {
    foreground: Vec<Coord>,
    background: Vec<Coord>,
}

impl SeedSet {
    #[must_use]
    pub fn new(foreground: Vec<Coord>, background: Vec<Coord>) -> Self {
        Self {
            foreground,
            background,
        }
    }

    /// Decodes seeds from an RGB image by exact color match
    ///
    /// Pixels equal to `foreground_color` become foreground seeds, pixels
    /// equal to `background_color` become background seeds and every other
    /// pixel stays unseeded. Coordinates are listed in row-major order.
    #[must_use]
    pub fn from_rgb(
        image: &Image<Rgb<u8>>,
        foreground_color: Rgb<u8>,
        background_color: Rgb<u8>,
    ) -> Self {
        let mut seeds = Self::default();
        for (x, y, pixel) in image.enumerate_pixels() {
            if *pixel == foreground_color {
                seeds.foreground.push(Coord::new(x, y));
            } else if *pixel == background_color {
                seeds.background.push(Coord::new(x, y));
            }
        }
        seeds
    }

    /// Decodes seeds from a decoded image of unknown color type
    ///
    /// # Errors
    ///
    /// * `SeedError::NotTrueColor` - if the image is not 8-bit RGB
    pub fn from_color_image(
        image: &DynamicImage,
        foreground_color: Rgb<u8>,
        background_color: Rgb<u8>,
    ) -> Result<Self, SeedError> {
        match image {
            DynamicImage::ImageRgb8(rgb) => {
                Ok(Self::from_rgb(rgb, foreground_color, background_color))
            }
            other => Err(SeedError::NotTrueColor {
                color: other.color(),
            }),
        }
    }

    #[must_use]
    pub fn foreground(&self) -> &[Coord] {
        &self.foreground
    }

    #[must_use]
    pub fn background(&self) -> &[Coord] {
        &self.background
    }

    /// True when neither list holds a coordinate
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.foreground.is_empty() && self.background.is_empty()
    }

    /// Checks that both lists are non-empty and every seed lies inside a `width` x `height` image
    ///
    /// # Errors
    ///
    /// * `SeedError::EmptyForeground` / `SeedError::EmptyBackground`
    /// * `SeedError::OutOfBounds`
    pub fn validate(&self, width: u32, height: u32) -> Result<(), SeedError> {
        if self.foreground.is_empty() {
            return Err(SeedError::EmptyForeground);
        }
        if self.background.is_empty() {
            return Err(SeedError::EmptyBackground);
        }
        if let Some(c) = self
            .foreground
            .iter()
            .chain(&self.background)
            .find(|c| c.x >= width || c.y >= height)
        {
            return Err(SeedError::OutOfBounds {
                x: c.x,
                y: c.y,
                width,
                height,
            });
        }
        Ok(())
    }
}
