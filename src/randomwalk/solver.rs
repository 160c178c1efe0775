use crate::error::{MatrixError, SegmentationError};
use crate::randomwalk::gradient::GradientField;
use crate::randomwalk::matrix::{Direction, Matrix};
use crate::randomwalk::params::Params;
use crate::randomwalk::seeds::SeedSet;
use crate::utils::validate_non_empty_image;
use crate::{Image, Mask};
use image::{Luma, Primitive};

/// Seeded random-walk segmentation of a single-channel image
///
/// Builds the foreground and background probability fields by iterating a
/// seed-pinned diffusion-reaction recurrence for `params.iterations` steps
/// and returns the mask `foreground > background`.
///
/// # Examples
///
/// ```rust
/// use randomwalk_seg::{Coord, Params, RandomWalkSegment, SeedSet, MASK_FOREGROUND};
/// use image::{GrayImage, Luma};
///
/// let image = GrayImage::from_fn(12, 8, |x, _| if x < 6 { Luma([50]) } else { Luma([200]) });
/// let seeds = SeedSet::new(
///     vec![Coord::new(2, 3), Coord::new(2, 5)],
///     vec![Coord::new(9, 3), Coord::new(9, 5)],
/// );
/// let params = Params { iterations: 300, ..Params::default() };
///
/// let mask = image.random_walk_segment(&seeds, &params).unwrap();
/// assert_eq!(mask.get_pixel(2, 3)[0], MASK_FOREGROUND);
/// ```
pub trait RandomWalkSegment {
    /// Segments the image from the given seeds
    ///
    /// # Errors
    ///
    /// * `SegmentationError::Seeds` - if a seed list is empty or a seed is outside the image
    /// * `SegmentationError::EmptyImage` - if the image has a zero dimension
    /// * `SegmentationError::InvalidParameter` - if `params` fails validation
    fn random_walk_segment(
        &self,
        seeds: &SeedSet,
        params: &Params,
    ) -> Result<Mask, SegmentationError>;
}

impl<T> RandomWalkSegment for Image<Luma<T>>
where
    T: Primitive + Into<f64>,
{
    fn random_walk_segment(
        &self,
        seeds: &SeedSet,
        params: &Params,
    ) -> Result<Mask, SegmentationError> {
        // seed errors come before any conversion work
        seeds.validate(self.width(), self.height())?;
        DiffusionSolver::from_luma(self, *params)?.run(seeds)
    }
}

/// Foreground and background probability fields at the end of a run
#[derive(Debug, Clone, PartialEq)]
pub struct DiffusionFields {
    foreground: Matrix,
    background: Matrix,
}

impl DiffusionFields {
    #[must_use]
    pub const fn foreground(&self) -> &Matrix {
        &self.foreground
    }

    #[must_use]
    pub const fn background(&self) -> &Matrix {
        &self.background
    }

    /// Splits into (foreground, background)
    #[must_use]
    pub fn into_parts(self) -> (Matrix, Matrix) {
        (self.foreground, self.background)
    }

    /// Binary mask of `foreground > background`; ties go to background
    ///
    /// # Errors
    ///
    /// Never fails for fields produced by [`DiffusionSolver::solve`].
    pub fn mask(&self) -> Result<Mask, SegmentationError> {
        Ok(self.foreground.greater_than(&self.background)?)
    }
}

/// Per-direction conductance weights of one class (foreground or background)
///
/// Holds `exp(alpha * deviation + beta * gradient)` after construction and
/// the actual divisors `w_dir * avg_axis` after [`ClassWeights::into_divisors`].
#[derive(Debug, Clone, PartialEq)]
struct ClassWeights {
    right: Matrix,
    left: Matrix,
    top: Matrix,
    bottom: Matrix,
}

impl ClassWeights {
    fn new(
        image: &Matrix,
        gradient: &GradientField,
        mean: f64,
        params: &Params,
    ) -> Result<Self, MatrixError> {
        let (alpha, beta, norm) = (params.alpha, params.beta, params.intensity_norm);
        let deviation = image.map(|v| {
            let d = v - mean;
            d * d / norm
        });

        let weight = |direction: Direction| -> Result<Matrix, MatrixError> {
            let mut w = deviation.clone();
            w.combine_in_place(gradient.get(direction), |dev, grad| {
                (alpha * dev + beta * grad).exp()
            })?;
            Ok(w)
        };

        Ok(Self {
            right: weight(Direction::Right)?,
            left: weight(Direction::Left)?,
            top: weight(Direction::Top)?,
            bottom: weight(Direction::Bottom)?,
        })
    }

    /// Multiplies each weight by the mean weight of its axis
    fn into_divisors(mut self) -> Result<Self, MatrixError> {
        let mut avg_x = self.left.clone();
        avg_x.combine_in_place(&self.right, |l, r| (l + r) / 2.0)?;
        let mut avg_y = self.top.clone();
        avg_y.combine_in_place(&self.bottom, |t, b| (t + b) / 2.0)?;

        self.right.combine_in_place(&avg_x, |w, a| w * a)?;
        self.left.combine_in_place(&avg_x, |w, a| w * a)?;
        self.top.combine_in_place(&avg_y, |w, a| w * a)?;
        self.bottom.combine_in_place(&avg_y, |w, a| w * a)?;
        Ok(self)
    }

    /// Stability bound `D = 0.25 * min(divisors)`
    fn stability_bound(&self) -> f64 {
        let min = self
            .right
            .min()
            .min(self.left.min())
            .min(self.top.min())
            .min(self.bottom.min());
        0.25 * min
    }
}

/// Random-walk diffusion solver for one image
///
/// The gradient field is computed once at construction; every call to
/// [`DiffusionSolver::solve`] allocates its own fields, so a solver can be
/// reused for several seed sets.
#[derive(Debug, Clone)]
pub struct DiffusionSolver {
    image: Matrix,
    gradient: GradientField,
    params: Params,
}

impl DiffusionSolver {
    /// Creates a solver for `image`
    ///
    /// # Errors
    ///
    /// * `SegmentationError::EmptyImage` - if the image has a zero dimension
    /// * `SegmentationError::InvalidParameter` - if `params` fails validation
    pub fn new(image: Matrix, params: Params) -> Result<Self, SegmentationError> {
        validate_non_empty_image(image.width(), image.height())?;
        params.validate()?;
        let gradient = GradientField::new(&image);
        Ok(Self {
            image,
            gradient,
            params,
        })
    }

    /// Creates a solver from a single-channel image
    ///
    /// # Errors
    ///
    /// Same as [`DiffusionSolver::new`].
    pub fn from_luma<T>(image: &Image<Luma<T>>, params: Params) -> Result<Self, SegmentationError>
    where
        T: Primitive + Into<f64>,
    {
        Self::new(Matrix::from_luma(image), params)
    }

    #[must_use]
    pub const fn gradient(&self) -> &GradientField {
        &self.gradient
    }

    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    #[must_use]
    pub const fn image(&self) -> &Matrix {
        &self.image
    }

    /// Runs the recurrence and returns the binary mask
    ///
    /// # Errors
    ///
    /// * `SegmentationError::Seeds` - if a seed list is empty or a seed is outside the image
    pub fn run(&self, seeds: &SeedSet) -> Result<Mask, SegmentationError> {
        self.solve(seeds)?.mask()
    }

    /// Runs the recurrence and returns both probability fields
    ///
    /// Each iteration:
    ///
    /// 1. pins the seeds (`FG = 1, BG = 0` at foreground seeds and the
    ///    reverse at background seeds)
    /// 2. updates FG from its four neighbors, with reaction against the
    ///    current BG
    /// 3. updates BG the same way with its own weights, with reaction
    ///    against FG as it stood at the end of the previous iteration
    /// 4. stores the new FG as that lagged copy
    ///
    /// Values are not clipped; parameters that make the explicit scheme
    /// unstable lead to infinite or NaN fields, which the mask reports as
    /// background.
    ///
    /// # Errors
    ///
    /// * `SegmentationError::Seeds` - if a seed list is empty or a seed is outside the image
    pub fn solve(&self, seeds: &SeedSet) -> Result<DiffusionFields, SegmentationError> {
        let (width, height) = self.image.dimensions();
        seeds.validate(width, height)?;

        let params = &self.params;
        let mean_fg = self.image.mean_at(seeds.foreground())?;
        let mean_bg = self.image.mean_at(seeds.background())?;

        let fg_divisors =
            ClassWeights::new(&self.image, &self.gradient, mean_fg, params)?.into_divisors()?;
        let bg_divisors =
            ClassWeights::new(&self.image, &self.gradient, mean_bg, params)?.into_divisors()?;
        // the bound comes from the foreground weights and serves both classes
        let d = fg_divisors.stability_bound();

        log::debug!(
            "random walk {}x{}: mean fg {:.3}, mean bg {:.3}, D {:e}, {} iterations",
            width,
            height,
            mean_fg,
            mean_bg,
            d,
            params.iterations
        );

        let mut fg = Matrix::new(width, height);
        let mut bg = Matrix::new(width, height);
        let mut fg_last = Matrix::new(width, height);

        for _ in 0..params.iterations {
            fg.set_at(seeds.foreground(), &[1.0])?;
            fg.set_at(seeds.background(), &[0.0])?;
            bg.set_at(seeds.foreground(), &[0.0])?;
            bg.set_at(seeds.background(), &[1.0])?;

            diffuse_react(&mut fg, &fg_divisors, &bg, d, params);
            diffuse_react(&mut bg, &bg_divisors, &fg_last, d, params);
            fg_last.clone_from(&fg);
        }

        let finite = |m: &Matrix| m.as_slice().iter().all(|v| v.is_finite());
        if !finite(&fg) || !finite(&bg) {
            log::warn!(
                "random walk produced non-finite probabilities (dt {}, gamma0 {}, {} iterations)",
                params.dt,
                params.gamma0,
                params.iterations
            );
        }

        Ok(DiffusionFields {
            foreground: fg,
            background: bg,
        })
    }
}

/// One explicit Euler step of the diffusion-reaction update, in place
///
/// `partner` is the other class's field used in the reaction term.
fn diffuse_react(
    field: &mut Matrix,
    divisors: &ClassWeights,
    partner: &Matrix,
    d: f64,
    params: &Params,
) {
    let right = field.shift_circular(Direction::Right);
    let left = field.shift_circular(Direction::Left);
    let top = field.shift_circular(Direction::Top);
    let bottom = field.shift_circular(Direction::Bottom);

    let (r, l, t, b) = (
        right.as_slice(),
        left.as_slice(),
        top.as_slice(),
        bottom.as_slice(),
    );
    let (wr, wl, wt, wb) = (
        divisors.right.as_slice(),
        divisors.left.as_slice(),
        divisors.top.as_slice(),
        divisors.bottom.as_slice(),
    );
    let p = partner.as_slice();
    let (dt, gamma0) = (params.dt, params.gamma0);

    for (i, value) in field.as_mut_slice().iter_mut().enumerate() {
        let v = *value;
        let laplacian =
            (r[i] - v) / wr[i] - (v - l[i]) / wl[i] + (t[i] - v) / wt[i] - (v - b[i]) / wb[i];
        *value = v + dt * (d * laplacian - gamma0 * v * p[i]);
    }
}
