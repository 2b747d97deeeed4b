//! Error types for field construction and engine setup.
//!
//! Runtime stepping never fails: out-of-bounds access, exhausted history and
//! unsuccessful reversal are reported as values, not errors.

use thiserror::Error;

/// Errors raised when building or validating a voxel field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Edge length must be at least 1.
    #[error("invalid resolution: {resolution}")]
    InvalidResolution { resolution: i16 },

    /// Cell buffer length does not equal resolution³.
    #[error("cell buffer has {actual} cells, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Errors raised when constructing a [`CaEngine`](crate::automaton::CaEngine).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Field(#[from] FieldError),

    /// 2×2×2 partitioning of a torus needs an even edge length.
    #[error("margolus partitioning needs an even resolution, got {resolution}")]
    OddResolution { resolution: i16 },

    #[error("failed to build stepping thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
