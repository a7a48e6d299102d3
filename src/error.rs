//! Crate-wide error type

use thiserror::Error;

/// Errors produced by the hotelsort pipeline
#[derive(Error, Debug)]
pub enum HotelSortError {
    /// Data loading or manipulation failed
    #[error("Data error: {0}")]
    DataError(String),

    /// Input failed a validation check
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A required column is missing from the dataset
    #[error("Column not found: {0}")]
    FeatureNotFound(String),

    /// Array dimensions do not line up
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    /// Model used before fitting
    #[error("Model is not fitted")]
    ModelNotFitted,

    /// Model fitting failed
    #[error("Training error: {0}")]
    TrainingError(String),

    /// Model artifact could not be written or read
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Underlying polars failure
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Underlying I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, HotelSortError>;
