//! Scalar features of an object mask measured against a channel stack.
//!
//! Features are plain enum values; [`Feature::calculate`] dispatches to a small
//! function per family. Every derived mask or statistic is requested through the
//! [`FeatureSession`], so features that share a computation share its result.

mod axis;
mod intensity;
mod surface;


pub use intensity::{Region, Statistic};

use serde::{Deserialize, Serialize};

use crate::channel::ChannelStack;
use crate::config::{OutlineConfig, SurfaceConfig};
use crate::error::Result;
use crate::geometry::Axis;
use crate::mask::ObjectMask;
use crate::session::FeatureSession;

/// What a feature is calculated on.
#[derive(Clone, Copy)]
pub struct FeatureInput<'a> {
    pub mask: &'a ObjectMask,
    pub stack: &'a dyn ChannelStack,
}

impl<'a> FeatureInput<'a> {
    pub fn new(mask: &'a ObjectMask, stack: &'a dyn ChannelStack) -> Self {
        Self { mask, stack }
    }
}

impl std::fmt::Debug for FeatureInput<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureInput")
            .field("bbox", self.mask.bbox())
            .field("num_channels", &self.stack.num_channels())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Feature {
    /// Number of on voxels.
    NumVoxels,
    /// On voxels times the physical voxel volume of the stack.
    Volume,
    /// Mean on-voxel coordinate along `axis`; NaN for an empty mask.
    CenterOfGravity { axis: Axis },
    /// Size of the bounding box along `axis`.
    BoundingBoxExtent { axis: Axis },
    /// Length of principal axis `index` (0 is the major axis).
    AxisLength { index: usize, suppress_z: bool },
    /// Major over minor axis length.
    AxisRatio { suppress_z: bool },
    /// In-plane orientation of principal axis `index`, degrees in `[0, 180)`.
    AxisAngle { index: usize },
    Eccentricity { suppress_z: bool },
    Intensity {
        channel: usize,
        region: Region,
        statistic: Statistic,
        exclude_zero: bool,
        /// Reported when the region contains no counted voxel.
        empty_value: f64,
    },
    NumBorderVoxels(OutlineConfig),
    SurfaceVoxelFaces(SurfaceConfig),
    /// `2 * sqrt(pi * area) / perimeter` of the maximum projection; 1 for a disc.
    ShapeRegularity,
}

impl Feature {
    pub fn calculate(&self, input: &FeatureInput<'_>, session: &FeatureSession) -> Result<f64> {
        let mask = input.mask;
        let value = match self {
            Feature::NumVoxels => mask.num_on_voxels() as f64,
            Feature::Volume => {
                let (_, resolution) = input.stack.dimensions();
                mask.num_on_voxels() as f64 * resolution.x * resolution.y * resolution.z
            }
            Feature::CenterOfGravity { axis } => mask
                .center_of_gravity()
                .map_or(f64::NAN, |c| c[axis.index()]),
            Feature::BoundingBoxExtent { axis } => mask.extent().as_ivec()[axis.index()] as f64,
            Feature::AxisLength { index, suppress_z } => {
                axis::axis_length(mask, session, *index, *suppress_z)?
            }
            Feature::AxisRatio { suppress_z } => axis::axis_ratio(mask, session, *suppress_z)?,
            Feature::AxisAngle { index } => axis::axis_angle(mask, session, *index)?,
            Feature::Eccentricity { suppress_z } => {
                axis::eccentricity(mask, session, *suppress_z)?
            }
            Feature::Intensity {
                channel,
                region,
                statistic,
                exclude_zero,
                empty_value,
            } => intensity::intensity(
                input,
                session,
                *channel,
                region,
                statistic,
                *exclude_zero,
                *empty_value,
            )?,
            Feature::NumBorderVoxels(config) => {
                session.outline(mask, config)?.num_on_voxels() as f64
            }
            Feature::SurfaceVoxelFaces(config) => surface::surface_voxel_faces(mask, config),
            Feature::ShapeRegularity => surface::shape_regularity(mask, session)?,
        };
        tracing::trace!(feature = %self, value, "calculated feature");
        Ok(value)
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let plane = |suppress_z: &bool| if *suppress_z { "_xy" } else { "" };
        match self {
            Feature::NumVoxels => write!(f, "num_voxels"),
            Feature::Volume => write!(f, "volume"),
            Feature::CenterOfGravity { axis } => write!(f, "center_of_gravity_{axis}"),
            Feature::BoundingBoxExtent { axis } => write!(f, "bbox_extent_{axis}"),
            Feature::AxisLength { index, suppress_z } => {
                write!(f, "axis_length_{index}{}", plane(suppress_z))
            }
            Feature::AxisRatio { suppress_z } => write!(f, "axis_ratio{}", plane(suppress_z)),
            Feature::AxisAngle { index } => write!(f, "axis_angle_{index}"),
            Feature::Eccentricity { suppress_z } => {
                write!(f, "eccentricity{}", plane(suppress_z))
            }
            Feature::Intensity {
                channel,
                region,
                statistic,
                ..
            } => write!(f, "intensity_{statistic}_{region}_ch{channel}"),
            Feature::NumBorderVoxels(config) => {
                write!(f, "num_border_voxels{}", if config.use_3d { "_3d" } else { "" })
            }
            Feature::SurfaceVoxelFaces(config) => write!(
                f,
                "surface_voxel_faces{}",
                if config.mip { "_mip" } else { "" }
            ),
            Feature::ShapeRegularity => write!(f, "shape_regularity"),
        }
    }
}

/// Several features evaluated in one session against one input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureList {
    features: Vec<Feature>,
}

impl FeatureList {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Column names, one per feature.
    pub fn names(&self) -> Vec<String> {
        self.features.iter().map(ToString::to_string).collect()
    }

    /// Values in feature order. The first failing feature aborts the list.
    pub fn calculate(&self, input: &FeatureInput<'_>, session: &FeatureSession) -> Result<Vec<f64>> {
        self.features
            .iter()
            .map(|feature| feature.calculate(input, session))
            .collect()
    }
}

impl From<Vec<Feature>> for FeatureList {
    fn from(features: Vec<Feature>) -> Self {
        Self::new(features)
    }
}
