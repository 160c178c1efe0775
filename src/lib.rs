mod error;
mod randomwalk;
#[cfg(test)]
mod test_utils;
mod utils;

use image::{ImageBuffer, Luma, Pixel};

pub use error::{MatrixError, SeedError, SegmentationError};
pub use randomwalk::gradient::GradientField;
pub use randomwalk::matrix::{Direction, Matrix};
pub use randomwalk::params::{Params, DEFAULT_INTENSITY_NORM};
pub use randomwalk::propagate::{Connectivity, SeedPropagator, DEFAULT_PROPAGATION_ITERATIONS};
pub use randomwalk::seeds::{Coord, SeedSet};
pub use randomwalk::solver::{DiffusionFields, DiffusionSolver, RandomWalkSegment};
pub use randomwalk::stack::StackSegmenter;

pub type Image<P> = ImageBuffer<P, Vec<<P as Pixel>::Subpixel>>;

/// Binary segmentation mask
pub type Mask = Image<Luma<u8>>;

/// Mask value of foreground pixels
pub const MASK_FOREGROUND: u8 = 255;

/// Mask value of background pixels
pub const MASK_BACKGROUND: u8 = 0;
