//! Dense voxel storage: one contiguous buffer per z-plane.

mod binary;
mod bit_volume;
mod buffer;

pub use binary::BinaryValues;
pub use bit_volume::BitVolume;
pub use buffer::VoxelBuffer;

use num_traits::{AsPrimitive, Bounded};

/// Element data type of a voxel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum VoxelKind {
    U8,
    U16,
    I32,
    F32,
}

/// Scalar stored in a [`VoxelBuffer`].
pub trait Voxel:
    Copy + Default + PartialEq + PartialOrd + Send + Sync + Bounded + AsPrimitive<f64> + 'static
{
    const KIND: VoxelKind;

    /// Saturating conversion from a floating point value.
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_voxel {
    ($t:ty, $kind:ident) => {
        impl Voxel for $t {
            const KIND: VoxelKind = VoxelKind::$kind;

            #[inline]
            fn from_f64(value: f64) -> Self {
                // `as` from float saturates and maps NaN to zero.
                value as $t
            }
        }
    };
}

impl_voxel!(u8, U8);
impl_voxel!(u16, U16);
impl_voxel!(i32, I32);
impl_voxel!(f32, F32);
