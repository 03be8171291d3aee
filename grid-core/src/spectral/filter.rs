//! Gaussian wavenumber-domain filtering.

use std::f64::consts::PI;

use crate::error::{GridFourierError, Result};
use crate::grid::Grid;
use crate::spectral::plan::TransformPlan;
use crate::spectral::wavenumber::wavenumber;

/// Default characteristic filter width, in grid length-units.
pub const DEFAULT_FILTER_WIDTH: f64 = 100_000.0;

/// Gaussian filter settings derived from a characteristic width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    width: f64,
    k_ref: f64,
}

impl FilterConfig {
    /// Create a filter for the given characteristic width.
    ///
    /// The reference wavenumber is `k_ref = 2 pi / width`.
    pub fn new(width: f64) -> Result<Self> {
        if !(width > 0.0) {
            return Err(GridFourierError::config(format!(
                "filter width must be positive, got {width}"
            )));
        }
        Ok(Self {
            width,
            k_ref: 2.0 * PI / width,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn k_ref(&self) -> f64 {
        self.k_ref
    }

    /// Attenuation at wavenumber `k`: `exp(-(k / k_ref)^2)`.
    ///
    /// Real-valued and symmetric, so the filter is zero-phase: it scales
    /// magnitudes and never alters phase.
    pub fn response(&self, k: f64) -> f64 {
        (-(k / self.k_ref).powi(2)).exp()
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_FILTER_WIDTH,
            k_ref: 2.0 * PI / DEFAULT_FILTER_WIDTH,
        }
    }
}

/// Scale every frequency bin of the transformed grid by the Gaussian
/// response at its wavenumber, attenuating real and imaginary components
/// identically, in place.
pub fn apply(grid: &mut Grid, plan: &TransformPlan, config: &FilterConfig) -> Result<()> {
    plan.verify_store(grid)?;

    for (bin, cell) in grid.samples_mut().chunks_exact_mut(2).enumerate() {
        let gain = config.response(wavenumber(2 * bin, plan));
        cell[0] *= gain;
        cell[1] *= gain;
    }
    Ok(())
}
