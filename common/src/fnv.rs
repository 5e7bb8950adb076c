//! Deterministic FNV-1a hashing.
//!
//! `DefaultHasher` is randomly seeded per process, so two runs produce different
//! hashes for the same voxel content. FNV-1a is seed-free, which makes it usable
//! as a content fingerprint and as the hasher of memoization tables.

use std::hash::{BuildHasherDefault, Hasher};

const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a 64-bit hasher with fixed seed.
#[derive(Debug, Clone, Copy)]
pub struct FnvHasher(u64);

/// `BuildHasher` for hash maps keyed by small structural keys.
pub type FnvBuildHasher = BuildHasherDefault<FnvHasher>;

impl FnvHasher {
    pub fn new() -> Self {
        Self(OFFSET_BASIS)
    }

    /// Hash a byte slice in one call.
    pub fn hash_bytes(bytes: &[u8]) -> u64 {
        let mut hasher = Self::new();
        hasher.write(bytes);
        hasher.finish()
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FnvHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(PRIME);
        }
    }
}
