//! Error types for pixel operations.

use thiserror::Error;

/// Error type for pixel operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Buffer construction or tiling failed.
    #[error(transparent)]
    Image(#[from] tonekit_core::Error),

    /// Images have incompatible sizes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for pixel operations.
pub type OpsResult<T> = Result<T, OpsError>;
