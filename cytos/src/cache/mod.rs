//! Per-session memoization of derived masks and statistics.
//!
//! Each key owns a slot guarded by its own lock. The map lock is only held to
//! find or insert the slot, so unrelated computations (including nested ones,
//! such as a shell asking for an erosion) proceed independently while two
//! lookups of the same key wait for a single computation.

mod key;
#[cfg(test)]
mod tests;

pub use key::{CacheKey, CachedValue, MaskIdentity, Operation};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::FnvBuildHasher;
use hashbrown::HashMap;
use parking_lot::Mutex;

use crate::error::Result;

type Slot = Arc<Mutex<Option<Result<CachedValue>>>>;

#[derive(Debug, Default)]
pub struct FeatureCalculationCache {
    slots: Mutex<HashMap<CacheKey, Slot, FnvBuildHasher>>,
    executions: AtomicUsize,
    hits: AtomicUsize,
}

impl FeatureCalculationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the memoized result for `key`, running `compute` if this is the
    /// first lookup. Failures are memoized too.
    pub fn get_or_compute(
        &self,
        key: CacheKey,
        compute: impl FnOnce() -> Result<CachedValue>,
    ) -> Result<CachedValue> {
        let operation = key.operation.name();
        let slot = {
            let mut slots = self.slots.lock();
            slots.entry(key).or_default().clone()
        };

        let mut entry = slot.lock();
        if let Some(result) = entry.as_ref() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(operation, "cache hit");
            return result.clone();
        }

        self.executions.fetch_add(1, Ordering::Relaxed);
        let result = compute();
        if let Err(err) = &result {
            tracing::debug!(operation, %err, "cached computation failed");
        }
        *entry = Some(result.clone());
        result
    }

    /// Number of times a compute function actually ran.
    #[inline]
    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A cache for a derived session. Entries are not shared with `self`.
    pub fn duplicate(&self) -> FeatureCalculationCache {
        FeatureCalculationCache::new()
    }

    pub fn clear(&self) {
        self.slots.lock().clear();
    }
}
