use crate::error::SegmentationError;
use crate::randomwalk::params::Params;
use crate::randomwalk::propagate::SeedPropagator;
use crate::randomwalk::seeds::SeedSet;
use crate::randomwalk::solver::RandomWalkSegment;
use crate::{Image, Mask};
use image::{Luma, Primitive};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Frame-by-frame segmentation of an image stack
///
/// Two modes are supported:
///
/// - [`StackSegmenter::segment_propagated`]: seeds of frame `i` are derived
///   from the mask of frame `i - 1`, so frames run strictly in order.
/// - [`StackSegmenter::segment_seeded`]: every frame has its own seed set and
///   frames are independent. With the `rayon` feature they run in parallel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StackSegmenter {
    params: Params,
    propagator: SeedPropagator,
}

impl StackSegmenter {
    #[must_use]
    pub const fn new(params: Params, propagator: SeedPropagator) -> Self {
        Self { params, propagator }
    }

    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    #[must_use]
    pub const fn propagator(&self) -> &SeedPropagator {
        &self.propagator
    }

    /// Segments `frames` in order, seeding each frame from the previous mask
    ///
    /// `initial_seeds` seed the first frame.
    ///
    /// # Errors
    ///
    /// * `SegmentationError::Frame` - wraps the failure of the first frame that fails,
    ///   e.g. when a propagated mask leaves no foreground seed
    pub fn segment_propagated<T>(
        &self,
        frames: &[Image<Luma<T>>],
        initial_seeds: SeedSet,
    ) -> Result<Vec<Mask>, SegmentationError>
    where
        T: Primitive + Into<f64>,
    {
        let (masks, _) = frames.iter().enumerate().try_fold(
            (Vec::with_capacity(frames.len()), initial_seeds),
            |(mut masks, seeds), (index, frame)| {
                log::debug!("segmenting frame {index} with propagated seeds");
                let mask = frame
                    .random_walk_segment(&seeds, &self.params)
                    .map_err(|source| frame_error(index, source))?;
                let next = self.propagator.propagate(&mask);
                masks.push(mask);
                Ok::<_, SegmentationError>((masks, next))
            },
        )?;
        Ok(masks)
    }

    /// Segments `frames` with one seed set per frame
    ///
    /// # Errors
    ///
    /// * `SegmentationError::StackLengthMismatch` - if `seeds.len() != frames.len()`
    /// * `SegmentationError::Frame` - wraps the failure of a frame
    pub fn segment_seeded<T>(
        &self,
        frames: &[Image<Luma<T>>],
        seeds: &[SeedSet],
    ) -> Result<Vec<Mask>, SegmentationError>
    where
        T: Primitive + Into<f64> + Send + Sync,
    {
        if frames.len() != seeds.len() {
            return Err(SegmentationError::StackLengthMismatch {
                frames: frames.len(),
                seeds: seeds.len(),
            });
        }

        let segment = |(index, (frame, seeds)): (usize, (&Image<Luma<T>>, &SeedSet))| {
            log::debug!("segmenting frame {index} with its own seeds");
            frame
                .random_walk_segment(seeds, &self.params)
                .map_err(|source| frame_error(index, source))
        };

        #[cfg(feature = "rayon")]
        let masks = frames
            .par_iter()
            .zip(seeds.par_iter())
            .enumerate()
            .map(segment)
            .collect();

        #[cfg(not(feature = "rayon"))]
        let masks = frames.iter().zip(seeds).enumerate().map(segment).collect();

        masks
    }
}

fn frame_error(index: usize, source: SegmentationError) -> SegmentationError {
    SegmentationError::Frame {
        index,
        source: Box::new(source),
    }
}
