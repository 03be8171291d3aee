//! Error types for the grid filtering pipeline.

use thiserror::Error;

/// Errors surfaced by any stage of a filtering run.
///
/// Every variant is terminal for the run that raised it; nothing is retried
/// and no output is written after a failure.
#[derive(Error, Debug)]
pub enum GridFourierError {
    /// Missing or invalid grid source or geometry parameters.
    #[error("input error: {0}")]
    Input(String),

    /// The requested impulse location lies outside the grid.
    #[error("impulse location row {row}, col {col} is outside the grid ({ny} rows x {nx} cols)")]
    SpikeOutOfBounds {
        row: usize,
        col: usize,
        nx: usize,
        ny: usize,
    },

    /// Unrecognized transform modifier, bad direction, or invalid filter settings.
    #[error("configuration error: {0}")]
    Config(String),

    /// The transform plan is inconsistent with the grid's backing store.
    #[error("transform error: {0}")]
    Transform(String),

    /// The output destination could not be written.
    #[error("output error: {0}")]
    Output(String),
}

impl GridFourierError {
    /// Create an Input error.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a Transform error.
    pub fn transform(msg: impl Into<String>) -> Self {
        Self::Transform(msg.into())
    }

    /// Create an Output error.
    pub fn output(msg: impl Into<String>) -> Self {
        Self::Output(msg.into())
    }
}

/// Result type for all pipeline operations.
pub type Result<T> = std::result::Result<T, GridFourierError>;
