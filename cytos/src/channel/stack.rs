use glam::DVec3;

use crate::error::{Error, Result};
use crate::geometry::Extent;

use super::Channel;

/// Read-only access to a multi-channel intensity volume.
///
/// `Send + Sync` so one stack can be measured from several sessions at once.
pub trait ChannelStack: Send + Sync {
    fn num_channels(&self) -> usize;

    /// # Errors
    /// [`Error::MissingChannel`] if `index` is out of range.
    fn channel(&self, index: usize) -> Result<&Channel>;

    /// Extent shared by all channels and their voxel spacing.
    fn dimensions(&self) -> (Extent, DVec3);
}

/// A set of same-sized channels.
#[derive(Debug, Clone, PartialEq)]
pub struct NrgStack {
    channels: Vec<Channel>,
    extent: Extent,
    resolution: DVec3,
}

impl NrgStack {
    /// Every channel must have the extent of the first. The stack takes the
    /// first channel's resolution.
    pub fn new(channels: Vec<Channel>) -> Result<Self> {
        let Some(first) = channels.first() else {
            return Err(Error::invalid("channels", "a stack needs at least one channel"));
        };
        let extent = first.extent();
        let resolution = first.resolution();
        if let Some(other) = channels.iter().find(|c| c.extent() != extent) {
            return Err(Error::ExtentMismatch {
                expected: extent,
                actual: other.extent(),
            });
        }
        Ok(Self {
            channels,
            extent,
            resolution,
        })
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }
}

impl ChannelStack for NrgStack {
    fn num_channels(&self) -> usize {
        self.channels.len()
    }

    fn channel(&self, index: usize) -> Result<&Channel> {
        self.channels.get(index).ok_or(Error::MissingChannel {
            index,
            available: self.channels.len(),
        })
    }

    fn dimensions(&self) -> (Extent, DVec3) {
        (self.extent, self.resolution)
    }
}
