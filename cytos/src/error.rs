//! Error types for mask and feature operations.

use thiserror::Error;

use crate::geometry::{BoundingBox, Extent};

/// Which side of a voxel-removal step a connectivity check ran on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Before,
    After,
}

/// Errors that can occur while deriving masks or calculating features.
///
/// `Clone` so that a failed computation can be memoized by the calculation
/// cache like any other result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("{operation}: a containing extent is required when the outside is not treated as on")]
    MissingContainingExtent { operation: &'static str },

    #[error("Shell: at least one of dilation or erosion iterations must be positive")]
    NoShellIterations,

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Mask bounding box {bbox} does not lie inside the containing extent {extent}")]
    MaskOutsideExtent { bbox: BoundingBox, extent: Extent },

    #[error("Extent mismatch: expected {expected}, got {actual}")]
    ExtentMismatch { expected: Extent, actual: Extent },

    #[error("Calculation failed: {0}")]
    Calculation(String),

    #[error("Mask {index} is not connected {phase} removing intersecting voxels")]
    Disconnected { index: usize, phase: Phase },

    #[error("Channel {index} is not present in the stack ({available} channels available)")]
    MissingChannel { index: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// True for the configuration-error class, which is detected eagerly before
    /// any voxel is touched.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::MissingContainingExtent { .. }
                | Error::NoShellIterations
                | Error::InvalidParameter { .. }
                | Error::MaskOutsideExtent { .. }
                | Error::ExtentMismatch { .. }
        )
    }
}
