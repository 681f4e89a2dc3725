//! Error types for the fare prediction engine

use thiserror::Error;

/// Errors that can occur in the prediction engine
#[derive(Error, Debug)]
pub enum FareCoreError {
    /// Trip failed boundary validation
    #[error("Invalid trip: {0}")]
    InvalidTrip(String),

    /// Encoded row does not match the width the forest was trained on
    #[error("Feature vector has {actual} values, model expects {expected}")]
    FeatureMismatch { expected: usize, actual: usize },

    /// Model structure failed validation
    #[error("Model validation failed: {0}")]
    ValidationFailed(String),

    /// Persisted artifact does not match its recorded hash
    #[error("Artifact integrity check failed: expected {expected}, found {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    /// Artifact written by an incompatible format version
    #[error("Unsupported artifact format version: {0}")]
    UnsupportedFormat(u32),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Binary (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, FareCoreError>;
