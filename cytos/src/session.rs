//! Cached access to the derived masks and statistics features share.

use std::sync::Arc;

use crate::cache::{CacheKey, CachedValue, FeatureCalculationCache, Operation};
use crate::channel::Channel;
use crate::config::{DilateConfig, ErodeConfig, OutlineConfig, ShellConfig};
use crate::error::Result;
use crate::histogram::{self, Histogram};
use crate::mask::ObjectMask;
use crate::moments::{self, MomentsResult};
use crate::morphology;
use crate::outline;

/// One evaluation of a feature set against one input image state.
///
/// Histogram entries are keyed by channel index, so a session must only ever
/// be used with one channel stack.
#[derive(Debug, Default)]
pub struct FeatureSession {
    cache: FeatureCalculationCache,
}

impl FeatureSession {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cache(&self) -> &FeatureCalculationCache {
        &self.cache
    }

    /// Session for a modified input: starts with an empty cache.
    pub fn duplicate(&self) -> FeatureSession {
        FeatureSession {
            cache: self.cache.duplicate(),
        }
    }

    fn cached_mask(
        &self,
        operation: Operation,
        mask: &ObjectMask,
        compute: impl FnOnce() -> Result<ObjectMask>,
    ) -> Result<Arc<ObjectMask>> {
        self.cache
            .get_or_compute(CacheKey::new(operation, mask), || {
                compute().map(|m| CachedValue::Mask(Arc::new(m)))
            })?
            .into_mask()
    }

    pub fn dilated(&self, mask: &ObjectMask, config: &DilateConfig) -> Result<Arc<ObjectMask>> {
        self.cached_mask(Operation::Dilate(config.clone()), mask, || {
            morphology::dilate(mask, config)
        })
    }

    pub fn eroded(&self, mask: &ObjectMask, config: &ErodeConfig) -> Result<Arc<ObjectMask>> {
        self.cached_mask(Operation::Erode(config.clone()), mask, || {
            morphology::erode(mask, config)
        })
    }

    /// Shell assembled from the cached dilation and erosion, so a shell and an
    /// erosion with matching parameters share one erosion.
    pub fn shell(&self, mask: &ObjectMask, config: &ShellConfig) -> Result<Arc<ObjectMask>> {
        self.cached_mask(Operation::Shell(config.clone()), mask, || {
            config.validate_for(mask.bbox())?;
            let outer = if config.dilation_iterations > 0 {
                self.dilated(mask, &config.dilate_config())?.duplicate()
            } else {
                mask.duplicate()
            };
            let inner = if config.erosion_iterations > 0 {
                Some(self.eroded(mask, &config.erode_config())?)
            } else {
                None
            };
            Ok(morphology::ring_from_parts(
                mask,
                config,
                outer,
                inner.as_deref(),
            ))
        })
    }

    pub fn outline(&self, mask: &ObjectMask, config: &OutlineConfig) -> Result<Arc<ObjectMask>> {
        self.cached_mask(Operation::Outline(config.clone()), mask, || {
            outline::outline(mask, config)
        })
    }

    pub fn flattened(&self, mask: &ObjectMask) -> Result<Arc<ObjectMask>> {
        self.cached_mask(Operation::Flatten, mask, || Ok(mask.flatten_z()))
    }

    pub fn moments(&self, mask: &ObjectMask, suppress_z: bool) -> Result<Arc<MomentsResult>> {
        self.cache
            .get_or_compute(
                CacheKey::new(Operation::Moments { suppress_z }, mask),
                || {
                    moments::compute_second_moments(mask, suppress_z)
                        .map(|m| CachedValue::Moments(Arc::new(m)))
                },
            )?
            .into_moments()
    }

    pub fn histogram(
        &self,
        channel_index: usize,
        channel: &Channel,
        mask: &ObjectMask,
        exclude_zero: bool,
    ) -> Result<Arc<Histogram>> {
        let operation = Operation::Histogram {
            channel: channel_index,
            exclude_zero,
        };
        self.cache
            .get_or_compute(CacheKey::new(operation, mask), || {
                histogram::build(channel, mask, exclude_zero)
                    .map(|h| CachedValue::Histogram(Arc::new(h)))
            })?
            .into_histogram()
    }
}
