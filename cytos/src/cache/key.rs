use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::config::{DilateConfig, ErodeConfig, OutlineConfig, ShellConfig};
use crate::error::{Error, Result};
use crate::geometry::BoundingBox;
use crate::histogram::Histogram;
use crate::mask::ObjectMask;
use crate::moments::MomentsResult;

/// Content identity of a mask. Hashing uses the FNV fingerprint alone;
/// equality also compares the voxels, so two masks whose fingerprints collide
/// still get separate entries.
#[derive(Debug, Clone)]
pub struct MaskIdentity {
    fingerprint: u64,
    mask: Arc<ObjectMask>,
}

impl MaskIdentity {
    pub fn of(mask: &ObjectMask) -> Self {
        Self::with_fingerprint(Arc::new(mask.clone()), mask.fingerprint())
    }

    pub(crate) fn with_fingerprint(mask: Arc<ObjectMask>, fingerprint: u64) -> Self {
        Self { fingerprint, mask }
    }

    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn bbox(&self) -> &BoundingBox {
        self.mask.bbox()
    }
}

impl PartialEq for MaskIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
            && (Arc::ptr_eq(&self.mask, &other.mask) || *self.mask == *other.mask)
    }
}

// Mask voxels are bytes, so content equality is total.
impl Eq for MaskIdentity {}

impl Hash for MaskIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.fingerprint);
    }
}

/// A derived computation together with every parameter it depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    Dilate(DilateConfig),
    Erode(ErodeConfig),
    Shell(ShellConfig),
    Outline(OutlineConfig),
    Flatten,
    Moments { suppress_z: bool },
    Histogram { channel: usize, exclude_zero: bool },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Dilate(_) => "dilate",
            Operation::Erode(_) => "erode",
            Operation::Shell(_) => "shell",
            Operation::Outline(_) => "outline",
            Operation::Flatten => "flatten",
            Operation::Moments { .. } => "moments",
            Operation::Histogram { .. } => "histogram",
        }
    }
}

/// Cache key: equal keys are guaranteed to produce equal results.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub operation: Operation,
    pub input: MaskIdentity,
}

impl CacheKey {
    pub fn new(operation: Operation, input: &ObjectMask) -> Self {
        Self::from_identity(operation, MaskIdentity::of(input))
    }

    pub fn from_identity(operation: Operation, input: MaskIdentity) -> Self {
        Self { operation, input }
    }
}

/// A memoized result. Large values are shared, not copied, on lookup.
#[derive(Debug, Clone)]
pub enum CachedValue {
    Mask(Arc<ObjectMask>),
    Moments(Arc<MomentsResult>),
    Histogram(Arc<Histogram>),
    Scalar(f64),
}

fn mismatch(expected: &str, value: &CachedValue) -> Error {
    Error::Calculation(format!(
        "cache entry holds {}, expected {expected}",
        value.kind()
    ))
}

impl CachedValue {
    fn kind(&self) -> &'static str {
        match self {
            CachedValue::Mask(_) => "a mask",
            CachedValue::Moments(_) => "moments",
            CachedValue::Histogram(_) => "a histogram",
            CachedValue::Scalar(_) => "a scalar",
        }
    }

    pub fn into_mask(self) -> Result<Arc<ObjectMask>> {
        match self {
            CachedValue::Mask(mask) => Ok(mask),
            other => Err(mismatch("a mask", &other)),
        }
    }

    pub fn into_moments(self) -> Result<Arc<MomentsResult>> {
        match self {
            CachedValue::Moments(moments) => Ok(moments),
            other => Err(mismatch("moments", &other)),
        }
    }

    pub fn into_histogram(self) -> Result<Arc<Histogram>> {
        match self {
            CachedValue::Histogram(hist) => Ok(hist),
            other => Err(mismatch("a histogram", &other)),
        }
    }

    pub fn into_scalar(self) -> Result<f64> {
        match self {
            CachedValue::Scalar(value) => Ok(value),
            other => Err(mismatch("a scalar", &other)),
        }
    }
}
