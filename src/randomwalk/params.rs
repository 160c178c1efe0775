use crate::error::SegmentationError;
use crate::utils::validate_finite;

/// Squared 8-bit intensity range, the default divisor of the intensity-deviation term
pub const DEFAULT_INTENSITY_NORM: f64 = 255.0 * 255.0;

/// Parameters of the diffusion-reaction scheme
///
/// # Examples
///
/// ```rust
/// use randomwalk_seg::Params;
///
/// let params = Params {
///     iterations: 500,
///     ..Params::default()
/// };
/// assert!(params.validate().is_ok());
/// assert_eq!(params.alpha, 400.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Params {
    /// Weight of the squared deviation from the seed mean intensity
    pub alpha: f64,
    /// Weight of the normalized squared image gradient
    pub beta: f64,
    /// Coupling of the FG/BG reaction term
    pub gamma0: f64,
    /// Second coupling constant; carried for compatibility, never read by the solver
    pub gamma1: f64,
    /// Number of explicit Euler steps
    pub iterations: u32,
    /// Euler step size
    pub dt: f64,
    /// Relative convergence limit; carried for compatibility, never read by the solver
    pub relim: f64,
    /// Divisor of the intensity-deviation term
    ///
    /// Defaults to `255²`, which assumes 8-bit samples whatever the actual
    /// sample type. Changing it changes the numeric output.
    pub intensity_norm: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            alpha: 400.0,
            beta: 50.0,
            gamma0: 100.0,
            gamma1: 300.0,
            iterations: 10_000,
            dt: 0.1,
            relim: 8e-3,
            intensity_norm: DEFAULT_INTENSITY_NORM,
        }
    }
}

impl Params {
    /// Checks the values the solver actually reads
    ///
    /// # Errors
    ///
    /// * `SegmentationError::InvalidParameter` - if `iterations` is zero, `dt` or
    ///   `intensity_norm` is not a finite positive number, or `alpha`, `beta`,
    ///   `gamma0` is not finite
    pub fn validate(&self) -> Result<(), SegmentationError> {
        if self.iterations == 0 {
            return Err(SegmentationError::InvalidParameter(
                "iterations must be at least 1".to_string(),
            ));
        }
        validate_finite("alpha", self.alpha, false)?;
        validate_finite("beta", self.beta, false)?;
        validate_finite("gamma0", self.gamma0, false)?;
        validate_finite("dt", self.dt, true)?;
        validate_finite("intensity_norm", self.intensity_norm, true)?;
        Ok(())
    }
}
