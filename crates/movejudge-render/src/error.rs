//! Error types for the render pipeline.

use std::path::PathBuf;

use movejudge_dxx::DxxError;
use thiserror::Error;

use crate::trajectory::{Angle, Channel};

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while rendering a moving source.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// The dry signal ends before an excerpt the sweep needs.
    #[error("dry signal too short at step {step}: need {required} samples, have {available}")]
    DryTooShort {
        /// Trajectory step whose excerpt is out of range.
        step: usize,
        /// Sample index one past the end of the excerpt.
        required: usize,
        /// Length of the dry signal.
        available: usize,
    },

    /// A transfer function with no samples.
    #[error("transfer function for angle {angle} is empty")]
    EmptyTransferFunction {
        /// Angle of the offending transfer function.
        angle: Angle,
    },

    /// The dry signal could not be read.
    #[error("failed to read dry signal {path}: {source}")]
    Input {
        /// Path of the dry signal.
        path: PathBuf,
        /// Underlying codec error.
        source: DxxError,
    },

    /// A transfer function could not be read.
    #[error("failed to load transfer function {angle}/{channel} from {path}: {source}")]
    TransferFunction {
        /// Requested angle.
        angle: Angle,
        /// Requested channel.
        channel: Channel,
        /// Resolved file path.
        path: PathBuf,
        /// Underlying codec error.
        source: DxxError,
    },

    /// The result could not be written.
    #[error("failed to write {path}: {source}")]
    Output {
        /// Destination path.
        path: PathBuf,
        /// Underlying codec error.
        source: DxxError,
    },

    /// A broken internal invariant. Indicates a defect, not bad input.
    #[error("internal invariant violated: {message}")]
    Invariant {
        /// What went wrong.
        message: String,
    },
}

impl RenderError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an invariant violation error.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant {
            message: message.into(),
        }
    }

    /// Stable error code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            RenderError::InvalidParameter { .. } => "RENDER_001",
            RenderError::DryTooShort { .. } => "RENDER_002",
            RenderError::EmptyTransferFunction { .. } => "RENDER_003",
            RenderError::Input { .. } => "RENDER_004",
            RenderError::TransferFunction { .. } => "RENDER_005",
            RenderError::Output { .. } => "RENDER_006",
            RenderError::Invariant { .. } => "RENDER_007",
        }
    }

    /// Error category for grouping related errors.
    pub fn category(&self) -> &'static str {
        match self {
            RenderError::InvalidParameter { .. }
            | RenderError::DryTooShort { .. }
            | RenderError::EmptyTransferFunction { .. } => "config",
            RenderError::Input { .. } | RenderError::TransferFunction { .. } => "input",
            RenderError::Output { .. } => "output",
            RenderError::Invariant { .. } => "internal",
        }
    }

    /// Returns true for defects in this crate rather than problems with the
    /// caller's data or environment.
    pub fn is_internal(&self) -> bool {
        matches!(self, RenderError::Invariant { .. })
    }
}
