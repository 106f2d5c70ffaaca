//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TarnError {
    /// Malformed argument given at construction or call time.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A non-empty dataset was required.
    #[error("Empty input: a non-empty dataset is required")]
    EmptyInput,

    /// Fewer episodes or transitions than requested.
    #[error("Insufficient data: requested {requested}, available {available}")]
    InsufficientData {
        /// Number of items requested by the caller.
        requested: usize,
        /// Number of items found in the input.
        available: usize,
    },

    /// The covariance matrix is not symmetric positive-definite.
    #[error("Invalid covariance matrix: {0}")]
    InvalidCovariance(String),

    /// State normalization was requested, but mean and std were never given.
    #[error("State normalization is enabled, but mean and std are not set")]
    NormalizationNotConfigured,

    /// The operation is not supported by the object.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// An array does not have the expected shape.
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape.
        expected: Vec<usize>,
        /// Actual shape.
        got: Vec<usize>,
    },
}
