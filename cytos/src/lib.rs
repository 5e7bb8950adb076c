//! Cytos - voxel object masks and feature calculation for cell image analysis.
//!
//! The crate provides:
//! - Object masks: binary voxel regions positioned by a bounding box
//! - Morphology (dilation, erosion, closing, opening, shells)
//! - Connected-component labeling and mask splitting
//! - Outlines and surface face counts
//! - Second-moment shape analysis and intensity histograms
//! - Scalar features evaluated through a memoizing session
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use cytos::{ErodeConfig, Feature, FeatureInput, FeatureSession, Region, Statistic};
//!
//! let session = FeatureSession::new();
//! let input = FeatureInput::new(&mask, &stack);
//! let mean = Feature::Intensity {
//!     channel: 0,
//!     region: Region::Eroded(ErodeConfig::new(2)),
//!     statistic: Statistic::Mean,
//!     exclude_zero: true,
//!     empty_value: f64::NAN,
//! }
//! .calculate(&input, &session)?;
//! ```

pub mod cache;
pub mod channel;
pub mod config;
mod error;
mod evaluate;
pub mod features;
pub mod geometry;
pub mod histogram;
pub mod labeling;
pub mod mask;
pub mod moments;
pub mod morphology;
mod neighborhood;
pub mod outline;
pub mod provider;
mod session;
pub mod voxel;

// ============================================================================
// Core types
// ============================================================================

pub use error::{Error, Phase, Result};
pub use geometry::{Axis, BoundingBox, Extent};
pub use mask::{ObjectCollection, ObjectMask};
pub use neighborhood::Connectivity;
pub use voxel::{BinaryValues, Voxel, VoxelBuffer, VoxelKind};

// ============================================================================
// Configuration
// ============================================================================

pub use config::{
    CloseConfig, DilateConfig, ErodeConfig, LabelConfig, OutlineConfig, ShellConfig,
    SurfaceConfig,
};
pub use morphology::AcceptCondition;

// ============================================================================
// Channels
// ============================================================================

pub use channel::{Channel, ChannelStack, NrgStack, Voxels};

// ============================================================================
// Features
// ============================================================================

pub use cache::FeatureCalculationCache;
pub use evaluate::evaluate_objects;
pub use features::{Feature, FeatureInput, FeatureList, Region, Statistic};
pub use histogram::Histogram;
pub use moments::{EigenPair, MomentsResult};
pub use session::FeatureSession;

// ============================================================================
// Providers
// ============================================================================

pub use provider::{
    FromCollection, MaskOperation, MaskProvider, MaskTransform, Pipeline, ThresholdChannel,
};
