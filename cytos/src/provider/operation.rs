use std::sync::Arc;

use strum_macros::Display;

use crate::config::{
    CloseConfig, DilateConfig, ErodeConfig, LabelConfig, OutlineConfig, ShellConfig,
};
use crate::error::Result;
use crate::labeling::{label, split_by_objects};
use crate::mask::ObjectCollection;
use crate::morphology::{close, dilate, erode, open, shell};
use crate::neighborhood::Connectivity;
use crate::outline::outline;

use super::{MaskTransform, remove_intersecting_voxels};

/// Built-in collection transforms. Per-mask operations map every mask to one
/// result; labeling and splitting may produce any number per input mask.
#[derive(Debug, Clone, Display)]
pub enum MaskOperation {
    Dilate(DilateConfig),
    Erode(ErodeConfig),
    Close(CloseConfig),
    Open(CloseConfig),
    Shell(ShellConfig),
    Outline(OutlineConfig),
    /// Maximum projection along z.
    Flatten,
    ConnectedComponents(LabelConfig),
    /// Split every mask by the pieces covered by each splitter.
    SplitBy {
        splitters: Arc<ObjectCollection>,
        config: LabelConfig,
    },
    /// Remove voxels claimed by more than one mask. With `check`, every mask
    /// must be connected under that connectivity before and after.
    RemoveIntersectingVoxels { check: Option<Connectivity> },
    FilterBySize { min: usize, max: Option<usize> },
}

impl MaskTransform for MaskOperation {
    fn apply(&self, input: ObjectCollection) -> Result<ObjectCollection> {
        let before = input.len();
        let out = match self {
            MaskOperation::Dilate(config) => input.try_map(|m| dilate(m, config))?,
            MaskOperation::Erode(config) => input.try_map(|m| erode(m, config))?,
            MaskOperation::Close(config) => input.try_map(|m| close(m, config))?,
            MaskOperation::Open(config) => input.try_map(|m| open(m, config))?,
            MaskOperation::Shell(config) => input.try_map(|m| shell(m, config))?,
            MaskOperation::Outline(config) => input.try_map(|m| outline(m, config))?,
            MaskOperation::Flatten => input.iter().map(|m| m.flatten_z()).collect(),
            MaskOperation::ConnectedComponents(config) => {
                input.iter().flat_map(|m| label(m, config)).collect()
            }
            MaskOperation::SplitBy { splitters, config } => input
                .iter()
                .flat_map(|m| split_by_objects(m, splitters, config))
                .collect(),
            MaskOperation::RemoveIntersectingVoxels { check } => {
                let mut masks = input;
                remove_intersecting_voxels(&mut masks, *check)?;
                masks
            }
            MaskOperation::FilterBySize { min, max } => input.filter_by_size(*min, *max),
        };
        tracing::debug!(
            operation = %self,
            before,
            after = out.len(),
            "transformed masks"
        );
        Ok(out)
    }
}
