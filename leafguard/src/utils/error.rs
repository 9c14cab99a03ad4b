//! Error Handling Module
//!
//! Defines custom error types for the Leafguard library.
//! Uses thiserror for ergonomic error definitions.
//!
//! Note that a low-confidence prediction and a background/non-leaf detection
//! are *not* errors: they are normal `PredictionOutcome` variants the caller
//! branches on. Likewise a class name missing from the disease table is
//! recovered locally with a fallback record and never surfaces here.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for Leafguard operations
#[derive(Error, Debug)]
pub enum LeafguardError {
    /// Error decoding an uploaded or on-disk image
    #[error("Failed to decode image at '{0}': {1}")]
    Decode(PathBuf, String),

    /// Configuration error (missing model or label file at startup is fatal)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error with the class label map
    #[error("Label map error: {0}")]
    Labels(String),

    /// Error with model loading or the forward pass
    #[error("Model error: {0}")]
    Model(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience Result type for Leafguard operations
pub type Result<T> = std::result::Result<T, LeafguardError>;
