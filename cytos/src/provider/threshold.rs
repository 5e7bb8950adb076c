use std::sync::Arc;

use crate::channel::ChannelStack;
use crate::config::LabelConfig;
use crate::error::Result;
use crate::labeling::label;
use crate::mask::ObjectCollection;

use super::MaskProvider;

/// Masks from the voxels of one channel at or above `level`.
///
/// Without `label` the whole thresholded volume is a single mask; with it the
/// thresholded voxels are split into connected components.
#[derive(Clone)]
pub struct ThresholdChannel {
    pub stack: Arc<dyn ChannelStack>,
    pub channel: usize,
    pub level: f64,
    pub label: Option<LabelConfig>,
}

impl std::fmt::Debug for ThresholdChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThresholdChannel")
            .field("channel", &self.channel)
            .field("level", &self.level)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl MaskProvider for ThresholdChannel {
    fn create(&self) -> Result<ObjectCollection> {
        let mask = self.stack.channel(self.channel)?.threshold(self.level);
        tracing::debug!(
            channel = self.channel,
            level = self.level,
            on = mask.num_on_voxels(),
            "thresholded channel"
        );
        Ok(match &self.label {
            Some(config) => label(&mask, config),
            None => ObjectCollection::from(vec![mask]),
        })
    }
}
