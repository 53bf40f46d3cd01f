//! Error types shared across the crate.
//!
//! Construction-time failures (bad parameters, mismatched dimensions) are
//! fatal and reported before any matrix is built or any propagation step is
//! taken. Per-step normalization drift below [`NORM_ABORT`][crate::evolve::NORM_ABORT]
//! is collected, not thrown; only drift past that bound surfaces here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid lattice or cavity parameters; raised before any matrix
    /// construction.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// A state or operator is incompatible with the expected composite
    /// Hilbert-space dimension.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// The time grid contains no points.
    #[error("time grid must contain at least one point")]
    EmptyGrid,

    /// The time grid is not uniformly spaced; the single-step propagator
    /// assumes a fixed step.
    #[error("time grid spacing deviates by {deviation:e} at step {step}; \
             resample to a uniform grid")]
    NonUniformGrid { step: usize, deviation: f64 },

    /// Per-step probability normalization drifted past the hard abort bound.
    #[error("probability normalization drifted by {deviation:e} at step {step}")]
    NormDrift { step: usize, deviation: f64 },

    /// Input series too short to produce a meaningful frequency axis.
    #[error("time series of length {len} is too short for spectral analysis")]
    ShortSeries { len: usize },

    /// Malformed parameter file.
    #[error("config: {0}")]
    Config(String),

    #[error("linear algebra error: {0}")]
    Linalg(#[from] ndarray_linalg::error::LinalgError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
