//! Spectral domain: planning, transforms, wavenumbers, and filtering

pub mod fft;
pub mod filter;
pub mod plan;
pub mod wavenumber;

pub use filter::{FilterConfig, DEFAULT_FILTER_WIDTH};
pub use plan::{Direction, TransformPlan};
pub use wavenumber::wavenumber;
