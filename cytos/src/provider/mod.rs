//! Mask providers: the surface through which an outer layer obtains and
//! transforms object collections.
//!
//! A [`MaskProvider`] creates a collection from nothing (a stored collection,
//! a thresholded channel); a [`MaskTransform`] derives one collection from
//! another. [`Pipeline`] chains one provider with any number of transforms.

mod intersecting;
mod operation;
mod threshold;


pub use intersecting::{remove_intersecting_voxels, remove_intersecting_voxels_copy};
pub use operation::MaskOperation;
pub use threshold::ThresholdChannel;

use crate::error::Result;
use crate::mask::ObjectCollection;

pub trait MaskProvider: Send + Sync {
    fn create(&self) -> Result<ObjectCollection>;
}

pub trait MaskTransform: Send + Sync {
    /// Takes ownership of `input`; transforms that need the original keep
    /// their own duplicate.
    fn apply(&self, input: ObjectCollection) -> Result<ObjectCollection>;
}

/// Provides a stored collection, duplicated on every call.
#[derive(Debug, Clone, Default)]
pub struct FromCollection {
    masks: ObjectCollection,
}

impl FromCollection {
    pub fn new(masks: impl Into<ObjectCollection>) -> Self {
        Self {
            masks: masks.into(),
        }
    }
}

impl MaskProvider for FromCollection {
    fn create(&self) -> Result<ObjectCollection> {
        Ok(self.masks.duplicate())
    }
}

/// A provider followed by transforms applied in order.
pub struct Pipeline {
    source: Box<dyn MaskProvider>,
    transforms: Vec<Box<dyn MaskTransform>>,
}

impl Pipeline {
    pub fn new(source: impl MaskProvider + 'static) -> Self {
        Self {
            source: Box::new(source),
            transforms: Vec::new(),
        }
    }

    pub fn then(mut self, transform: impl MaskTransform + 'static) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("transforms", &self.transforms.len())
            .finish_non_exhaustive()
    }
}

impl MaskProvider for Pipeline {
    fn create(&self) -> Result<ObjectCollection> {
        let mut masks = self.source.create()?;
        for (step, transform) in self.transforms.iter().enumerate() {
            masks = transform.apply(masks)?;
            tracing::trace!(step, masks = masks.len(), "applied mask transform");
        }
        Ok(masks)
    }
}
