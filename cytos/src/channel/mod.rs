//! Intensity channels and the read-only channel stack features measure against.

mod stack;

pub use stack::{ChannelStack, NrgStack};

use glam::{DVec3, IVec3};

use crate::geometry::{BoundingBox, Extent};
use crate::mask::ObjectMask;
use crate::voxel::{Voxel, VoxelBuffer, VoxelKind};

/// Typed voxel storage of a channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Voxels {
    U8(VoxelBuffer<u8>),
    U16(VoxelBuffer<u16>),
    I32(VoxelBuffer<i32>),
    F32(VoxelBuffer<f32>),
}

macro_rules! impl_from_buffer {
    ($t:ty, $variant:ident) => {
        impl From<VoxelBuffer<$t>> for Voxels {
            fn from(buffer: VoxelBuffer<$t>) -> Self {
                Voxels::$variant(buffer)
            }
        }
    };
}

impl_from_buffer!(u8, U8);
impl_from_buffer!(u16, U16);
impl_from_buffer!(i32, I32);
impl_from_buffer!(f32, F32);

/// Run `$body` with `$buf` bound to the typed buffer.
macro_rules! with_buffer {
    ($voxels:expr, $buf:ident => $body:expr) => {
        match $voxels {
            Voxels::U8($buf) => $body,
            Voxels::U16($buf) => $body,
            Voxels::I32($buf) => $body,
            Voxels::F32($buf) => $body,
        }
    };
}

#[inline]
fn read<T: Voxel>(buffer: &VoxelBuffer<T>, point: IVec3) -> f64 {
    buffer.get(point).as_()
}

fn buffer_max<T: Voxel>(buffer: &VoxelBuffer<T>) -> Option<f64> {
    buffer.min_max().map(|(_, hi)| hi.as_())
}

/// One intensity volume with its physical voxel spacing.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    voxels: Voxels,
    resolution: DVec3,
}

impl Channel {
    pub fn new(voxels: impl Into<Voxels>, resolution: DVec3) -> Self {
        Self {
            voxels: voxels.into(),
            resolution,
        }
    }

    /// Channel with unit spacing.
    pub fn from_buffer<T: Voxel>(buffer: VoxelBuffer<T>) -> Self
    where
        VoxelBuffer<T>: Into<Voxels>,
    {
        Self::new(buffer, DVec3::ONE)
    }

    #[inline]
    pub fn voxels(&self) -> &Voxels {
        &self.voxels
    }

    pub fn kind(&self) -> VoxelKind {
        match &self.voxels {
            Voxels::U8(_) => VoxelKind::U8,
            Voxels::U16(_) => VoxelKind::U16,
            Voxels::I32(_) => VoxelKind::I32,
            Voxels::F32(_) => VoxelKind::F32,
        }
    }

    pub fn extent(&self) -> Extent {
        with_buffer!(&self.voxels, b => b.extent())
    }

    /// Physical size of one voxel along each axis.
    #[inline]
    pub fn resolution(&self) -> DVec3 {
        self.resolution
    }

    /// Physical volume of one voxel.
    #[inline]
    pub fn voxel_volume(&self) -> f64 {
        self.resolution.x * self.resolution.y * self.resolution.z
    }

    /// Intensity at a point of the channel as `f64`.
    #[inline]
    pub fn value(&self, point: IVec3) -> f64 {
        with_buffer!(&self.voxels, b => read(b, point))
    }

    /// Intensity at `point`, `None` outside the channel.
    #[inline]
    pub fn try_value(&self, point: IVec3) -> Option<f64> {
        self.extent().contains(point).then(|| self.value(point))
    }

    /// Largest intensity present, `None` for an empty channel.
    pub fn max_value(&self) -> Option<f64> {
        with_buffer!(&self.voxels, b => buffer_max(b))
    }

    /// Mask over the whole channel, on where the intensity is at least `level`.
    pub fn threshold(&self, level: f64) -> ObjectMask {
        let bbox = BoundingBox::from_extent(self.extent());
        with_buffer!(&self.voxels, b => {
            ObjectMask::from_fn(bbox, |p| read(b, p) >= level)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Channel {
        let extent = Extent::new(4, 2, 1);
        Channel::new(
            VoxelBuffer::from_vec(extent, (0..8u16).map(|v| v * 10).collect()),
            DVec3::new(0.5, 0.5, 2.0),
        )
    }

    #[test]
    fn test_value_and_kind() {
        let channel = ramp();
        assert_eq!(channel.kind(), VoxelKind::U16);
        assert_eq!(channel.value(IVec3::new(1, 1, 0)), 50.0);
        assert_eq!(channel.try_value(IVec3::new(4, 0, 0)), None);
        assert_eq!(channel.max_value(), Some(70.0));
        assert_eq!(channel.voxel_volume(), 0.5);
    }

    #[test]
    fn test_threshold() {
        let mask = ramp().threshold(40.0);
        assert_eq!(mask.num_on_voxels(), 4);
        assert!(mask.is_on(IVec3::new(0, 1, 0)));
        assert!(!mask.is_on(IVec3::new(3, 0, 0)));
    }

    #[test]
    fn test_float_channel() {
        let channel = Channel::from_buffer(VoxelBuffer::new_filled(Extent::new(2, 2, 2), 1.5f32));
        assert_eq!(channel.kind(), VoxelKind::F32);
        assert_eq!(channel.value(IVec3::ONE), 1.5);
        assert_eq!(channel.resolution(), DVec3::ONE);
    }
}
