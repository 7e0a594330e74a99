//! Error types for parameter handling and operator rendering.

use crate::param::ParamKind;
use thiserror::Error;

/// Error type for the hue/saturation operator.
#[derive(Error, Debug)]
pub enum AdjustError {
    /// A pixel stage failed (buffer sizes, tile bounds).
    #[error(transparent)]
    Ops(#[from] tonekit_ops::OpsError),

    /// The parameter was never registered with this set.
    #[error("parameter {0} is not registered")]
    UnknownParameter(ParamKind),

    /// A slider configuration is inconsistent or cannot be stored.
    #[error("invalid slider config for {kind}: {reason}")]
    InvalidConfig {
        /// Parameter being configured
        kind: ParamKind,
        /// What is wrong with it
        reason: String,
    },

    /// A parameter value is NaN or infinite.
    #[error("non-finite value {value} for {kind}")]
    NonFinite {
        /// Parameter being set
        kind: ParamKind,
        /// Rejected value
        value: f32,
    },

    /// Unrecognized operator version name.
    #[error("unknown operation version '{0}'")]
    UnknownVersion(String),

    /// Unrecognized parameter name.
    #[error("unknown parameter '{0}'")]
    UnknownParameterName(String),
}

impl AdjustError {
    /// Creates an [`AdjustError::InvalidConfig`].
    pub fn invalid_config(kind: ParamKind, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            kind,
            reason: reason.into(),
        }
    }
}

/// Result type for the hue/saturation operator.
pub type AdjustResult<T> = Result<T, AdjustError>;
