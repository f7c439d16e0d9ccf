//! Error types for pointlod.

use thiserror::Error;

/// The main error type for pointlod operations.
#[derive(Error, Debug)]
pub enum PointLodError {
    /// Build parameters were rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The optimizer was used before a successful build.
    #[error("optimizer not initialized - call build() first")]
    NotInitialized,

    /// The optimizer was used after it was disposed.
    #[error("optimizer has been disposed")]
    Disposed,

    /// The external renderer reported a failure.
    #[error("render error: {0}")]
    RenderError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for pointlod operations.
pub type Result<T> = std::result::Result<T, PointLodError>;
