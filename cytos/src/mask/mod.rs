//! Binary object masks positioned by a bounding box.
//!
//! An [`ObjectMask`] exclusively owns its voxel buffer. Operations that derive
//! a new mask return a new value; the few that mutate take `&mut self`, so a
//! caller that must keep the source calls [`ObjectMask::duplicate`] first.

mod collection;
mod ops;


pub use collection::ObjectCollection;

use std::hash::Hasher;

use common::FnvHasher;
use glam::{DVec3, IVec3};

use crate::error::{Error, Result};
use crate::geometry::{BoundingBox, Extent, PointBounds};
use crate::voxel::{BinaryValues, VoxelBuffer};

/// A binary region of interest: on/off voxels inside a bounding box.
///
/// Invariant: `voxels.extent() == bbox.extent()`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMask {
    bbox: BoundingBox,
    voxels: VoxelBuffer<u8>,
    binary: BinaryValues,
}

impl ObjectMask {
    /// All-off mask covering `bbox`.
    pub fn new(bbox: BoundingBox) -> Self {
        Self::new_filled(bbox, false)
    }

    pub fn new_filled(bbox: BoundingBox, on: bool) -> Self {
        let binary = BinaryValues::default();
        Self {
            bbox,
            voxels: VoxelBuffer::new_filled(bbox.extent(), binary.value(on)),
            binary,
        }
    }

    /// Wrap an existing buffer. Values other than `binary.on` read as off.
    pub fn from_buffer(
        bbox: BoundingBox,
        voxels: VoxelBuffer<u8>,
        binary: BinaryValues,
    ) -> Result<Self> {
        if voxels.extent() != bbox.extent() {
            return Err(Error::ExtentMismatch {
                expected: bbox.extent(),
                actual: voxels.extent(),
            });
        }
        Ok(Self {
            bbox,
            voxels,
            binary,
        })
    }

    /// Mask over `bbox` whose voxel at local point `p` is on iff `is_on(p)`.
    pub fn from_fn(bbox: BoundingBox, mut is_on: impl FnMut(IVec3) -> bool) -> Self {
        let mut mask = Self::new(bbox);
        let extent = bbox.extent();
        for z in 0..extent.z() {
            for y in 0..extent.y() {
                for x in 0..extent.x() {
                    let p = IVec3::new(x, y, z);
                    if is_on(p) {
                        mask.set_on(p);
                    }
                }
            }
        }
        mask
    }

    /// Tightest mask containing the given global points, `None` if there are none.
    pub fn from_points(points: &[IVec3]) -> Option<Self> {
        let mut bounds = PointBounds::empty();
        for &p in points {
            bounds.include(p);
        }
        let bbox = bounds.to_bbox()?;
        let mut mask = Self::new(bbox);
        for &p in points {
            mask.set_on(p - bbox.corner_min());
        }
        Some(mask)
    }

    #[inline]
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    #[inline]
    pub fn extent(&self) -> Extent {
        self.bbox.extent()
    }

    #[inline]
    pub fn binary_values(&self) -> BinaryValues {
        self.binary
    }

    #[inline]
    pub fn voxels(&self) -> &VoxelBuffer<u8> {
        &self.voxels
    }

    /// Raw buffer access. Writing values other than on/off leaves them reading as off.
    #[inline]
    pub fn voxels_mut(&mut self) -> &mut VoxelBuffer<u8> {
        &mut self.voxels
    }

    pub fn into_parts(self) -> (BoundingBox, VoxelBuffer<u8>, BinaryValues) {
        (self.bbox, self.voxels, self.binary)
    }

    /// Explicit deep copy, for call sites about to mutate a mask they must keep.
    #[inline]
    pub fn duplicate(&self) -> ObjectMask {
        self.clone()
    }

    /// Voxel state at a point in the mask's local frame.
    #[inline]
    pub fn is_on(&self, local: IVec3) -> bool {
        self.voxels.get(local) == self.binary.on
    }

    /// Voxel state at a global point; off outside the bounding box.
    #[inline]
    pub fn is_on_global(&self, global: IVec3) -> bool {
        let local = global - self.bbox.corner_min();
        self.extent().contains(local) && self.is_on(local)
    }

    #[inline]
    pub fn set(&mut self, local: IVec3, on: bool) {
        self.voxels.set(local, self.binary.value(on));
    }

    #[inline]
    pub fn set_on(&mut self, local: IVec3) {
        self.voxels.set(local, self.binary.on);
    }

    #[inline]
    pub fn set_off(&mut self, local: IVec3) {
        self.voxels.set(local, self.binary.off);
    }

    pub fn num_on_voxels(&self) -> usize {
        self.voxels.count_equal(self.binary.on)
    }

    /// True when no voxel is on. Cheaper than `num_on_voxels() == 0`.
    pub fn is_empty(&self) -> bool {
        !self.voxels.any_equal(self.binary.on)
    }

    /// On voxels in local coordinates, plane-major order.
    pub fn on_points_local(&self) -> impl Iterator<Item = IVec3> + '_ {
        let on = self.binary.on;
        self.voxels
            .iter_points()
            .filter_map(move |(p, v)| (v == on).then_some(p))
    }

    /// On voxels in global coordinates, plane-major order.
    pub fn on_points(&self) -> impl Iterator<Item = IVec3> + '_ {
        let corner = self.bbox.corner_min();
        self.on_points_local().map(move |p| p + corner)
    }

    /// Mean global coordinate of the on voxels.
    pub fn center_of_gravity(&self) -> Option<DVec3> {
        let mut sum = DVec3::ZERO;
        let mut count = 0usize;
        for p in self.on_points() {
            sum += p.as_dvec3();
            count += 1;
        }
        (count > 0).then(|| sum / count as f64)
    }

    /// Tightest global box around the on voxels.
    pub fn tight_bbox(&self) -> Option<BoundingBox> {
        let mut bounds = PointBounds::empty();
        for p in self.on_points() {
            bounds.include(p);
        }
        bounds.to_bbox()
    }

    /// Copy cropped to the tight box, `None` if the mask is empty.
    pub fn shrink_to_tight(&self) -> Option<ObjectMask> {
        let tight = self.tight_bbox()?;
        if tight == self.bbox {
            return Some(self.duplicate());
        }
        self.crop_to(&tight)
    }

    /// Logical OR across z into the single plane `z = 0`.
    pub fn flatten_z(&self) -> ObjectMask {
        let extent = self.extent();
        let on = self.binary.on;
        let mut plane = vec![self.binary.off; extent.area_xy()];
        for src in self.voxels.planes() {
            for (dst, &v) in plane.iter_mut().zip(src) {
                if v == on {
                    *dst = on;
                }
            }
        }
        ObjectMask {
            bbox: self.bbox.flatten_z(),
            voxels: VoxelBuffer::from_planes(extent.flatten_z(), vec![plane]),
            binary: self.binary,
        }
    }

    /// One local z-plane as a single-plane mask at its global z.
    pub fn extract_slice(&self, z: i32) -> ObjectMask {
        ObjectMask {
            bbox: self.bbox.slice_z(self.bbox.corner_min().z + z),
            voxels: self.voxels.extract_slice(z as usize),
            binary: self.binary,
        }
    }

    pub fn shift_by(&self, shift: IVec3) -> ObjectMask {
        ObjectMask {
            bbox: self.bbox.shift_by(shift),
            voxels: self.voxels.clone(),
            binary: self.binary,
        }
    }

    /// Same voxels, bounding box expressed in the frame of `frame`.
    pub fn relative_to(&self, frame: &BoundingBox) -> ObjectMask {
        ObjectMask {
            bbox: self.bbox.relative_to(frame),
            voxels: self.voxels.clone(),
            binary: self.binary,
        }
    }

    /// Copy into a larger bounding box; new voxels are off.
    pub fn expand_to(&self, bbox: &BoundingBox) -> Result<ObjectMask> {
        if !bbox.contains(&self.bbox) {
            return Err(Error::invalid(
                "bbox",
                format!("{bbox} does not contain the mask box {}", self.bbox),
            ));
        }
        let mut voxels = VoxelBuffer::new_filled(bbox.extent(), self.binary.off);
        self.voxels.copy_region_to(
            &BoundingBox::from_extent(self.extent()),
            &mut voxels,
            self.bbox.relative_position_to(bbox),
        );
        Ok(ObjectMask {
            bbox: *bbox,
            voxels,
            binary: self.binary,
        })
    }

    /// The part of the mask inside `bbox` (global), `None` if they do not overlap.
    pub fn crop_to(&self, bbox: &BoundingBox) -> Option<ObjectMask> {
        let region = self.bbox.intersection(bbox)?;
        Some(ObjectMask {
            bbox: region,
            voxels: self.voxels.extract_region(&region.relative_to(&self.bbox)),
            binary: self.binary,
        })
    }

    /// The part of the mask inside a volume of size `extent` at the origin.
    pub fn clip_to(&self, extent: &Extent) -> Option<ObjectMask> {
        self.crop_to(&BoundingBox::from_extent(*extent))
    }

    /// Swap on and off inside the bounding box.
    pub fn invert(&self) -> ObjectMask {
        let mut out = self.duplicate();
        out.invert_in_place();
        out
    }

    pub fn invert_in_place(&mut self) {
        let on = self.binary.on;
        let off = self.binary.off;
        for z in 0..self.extent().z() as usize {
            for v in self.voxels.plane_mut(z) {
                *v = if *v == on { off } else { on };
            }
        }
    }

    /// Copy with different on/off byte values.
    pub fn with_binary_values(&self, binary: BinaryValues) -> ObjectMask {
        let on = self.binary.on;
        ObjectMask {
            bbox: self.bbox,
            voxels: self.voxels.map(|v| binary.value(v == on)),
            binary,
        }
    }

    /// Deterministic content hash over box, on/off values and voxels.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FnvHasher::new();
        let min = self.bbox.corner_min();
        let size = self.extent().as_ivec();
        for v in [min.x, min.y, min.z, size.x, size.y, size.z] {
            hasher.write(&v.to_le_bytes());
        }
        hasher.write(&[self.binary.on, self.binary.off]);
        for plane in self.voxels.planes() {
            hasher.write(plane);
        }
        hasher.finish()
    }
}
