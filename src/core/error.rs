// src/core/error.rs

use thiserror::Error;

/// Result type alias using the explorer's error type
pub type Result<T> = std::result::Result<T, ExplorerError>;

/// Contract violations surfaced to the caller.
///
/// Numerical edge cases (zero leading coefficient, coincident estimates,
/// non-convergence) are never reported here; they have defined fallbacks.
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// A coefficient handed to the solver was NaN or infinite
    #[error("Non-finite coefficient at position {position}")]
    NonFiniteCoefficient {
        /// Power of z the coefficient belongs to
        position: usize,
    },

    /// The coefficient palette has no entries
    #[error("Coefficient palette is empty")]
    EmptyPalette,

    /// Degree must be at least 1 to have roots
    #[error("Invalid degree {0}: must be at least 1")]
    InvalidDegree(usize),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The worker pool could not be built
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}
