//! Grid Fourier Core - Wavenumber-Domain Grid Filtering
//!
//! Load or synthesize a regular 2D grid, inject a unit impulse, and filter
//! it in the frequency domain through a forward/inverse 2D transform.

pub mod error;
pub mod grid;
pub mod pipeline;
pub mod spectral;

pub use error::{GridFourierError, Result};
pub use grid::{Grid, GridGeometry, Region, Registration, SpikeLocation};
pub use pipeline::{run, PipelineConfig};
pub use spectral::{Direction, FilterConfig, TransformPlan, DEFAULT_FILTER_WIDTH};
