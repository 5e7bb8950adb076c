//! Bit-packed 3D flag volume.
//!
//! One bit per voxel instead of one byte. Used for visited flags in flood
//! fills where a full `VoxelBuffer<u8>` would be 8x larger.

use glam::IVec3;

use crate::geometry::Extent;

const BITS_PER_WORD: usize = 64;

/// Packed boolean volume addressed by linear plane-major offset or by point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitVolume {
    words: Vec<u64>,
    extent: Extent,
    len: usize,
}

impl BitVolume {
    pub fn new_filled(extent: Extent, value: bool) -> Self {
        let len = extent.volume();
        let fill = if value { !0u64 } else { 0u64 };
        Self {
            words: vec![fill; len.div_ceil(BITS_PER_WORD)],
            extent,
            len,
        }
    }

    pub fn new_default(extent: Extent) -> Self {
        Self::new_filled(extent, false)
    }

    #[inline]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        debug_assert!(idx < self.len);
        (self.words[idx / BITS_PER_WORD] >> (idx % BITS_PER_WORD)) & 1 != 0
    }

    #[inline]
    pub fn set(&mut self, idx: usize, value: bool) {
        debug_assert!(idx < self.len);
        let bit = 1u64 << (idx % BITS_PER_WORD);
        if value {
            self.words[idx / BITS_PER_WORD] |= bit;
        } else {
            self.words[idx / BITS_PER_WORD] &= !bit;
        }
    }

    #[inline]
    pub fn get_point(&self, point: IVec3) -> bool {
        self.get(self.extent.offset(point))
    }

    #[inline]
    pub fn set_point(&mut self, point: IVec3, value: bool) {
        let idx = self.extent.offset(point);
        self.set(idx, value);
    }

    /// Set the bit and report whether it was previously clear.
    #[inline]
    pub fn insert(&mut self, point: IVec3) -> bool {
        let idx = self.extent.offset(point);
        let was_set = self.get(idx);
        if !was_set {
            self.set(idx, true);
        }
        !was_set
    }

    /// Number of set bits. Padding bits past `len` are never set by `set`, but
    /// a `new_filled(_, true)` volume has them, so they are masked out here.
    pub fn count_ones(&self) -> usize {
        let full_words = self.len / BITS_PER_WORD;
        let mut count: usize = self.words[..full_words]
            .iter()
            .map(|w| w.count_ones() as usize)
            .sum();
        let rem = self.len % BITS_PER_WORD;
        if rem != 0 {
            count += (self.words[full_words] & ((1u64 << rem) - 1)).count_ones() as usize;
        }
        count
    }
}
