use glam::IVec3;

use crate::geometry::{BoundingBox, Extent};

use super::Voxel;

/// A 3D array of voxels stored as one row-major buffer per z-plane.
///
/// Within a plane, `(x, y)` lives at `y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelBuffer<T> {
    planes: Vec<Vec<T>>,
    extent: Extent,
}

impl<T: Voxel> VoxelBuffer<T> {
    pub fn new_filled(extent: Extent, value: T) -> Self {
        let area = extent.area_xy();
        Self {
            planes: (0..extent.z()).map(|_| vec![value; area]).collect(),
            extent,
        }
    }

    pub fn new_default(extent: Extent) -> Self {
        Self::new_filled(extent, T::default())
    }

    /// # Panics
    /// If the number of planes or any plane length does not match `extent`.
    pub fn from_planes(extent: Extent, planes: Vec<Vec<T>>) -> Self {
        assert_eq!(
            planes.len(),
            extent.z() as usize,
            "plane count must equal extent z"
        );
        for plane in &planes {
            assert_eq!(
                plane.len(),
                extent.area_xy(),
                "plane length must equal width * height"
            );
        }
        Self { planes, extent }
    }

    /// Build from a single plane-major vector of `extent.volume()` values.
    pub fn from_vec(extent: Extent, values: Vec<T>) -> Self {
        assert_eq!(
            values.len(),
            extent.volume(),
            "values length must equal extent volume"
        );
        let area = extent.area_xy().max(1);
        let planes = if extent.area_xy() == 0 {
            (0..extent.z()).map(|_| Vec::new()).collect()
        } else {
            values.chunks(area).map(<[T]>::to_vec).collect()
        };
        Self::from_planes(extent, planes)
    }

    #[inline]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    #[inline]
    pub fn plane(&self, z: usize) -> &[T] {
        &self.planes[z]
    }

    #[inline]
    pub fn plane_mut(&mut self, z: usize) -> &mut [T] {
        &mut self.planes[z]
    }

    #[inline]
    pub fn planes(&self) -> &[Vec<T>] {
        &self.planes
    }

    #[inline]
    pub fn get(&self, point: IVec3) -> T {
        debug_assert!(self.extent.contains(point), "{point} outside {}", self.extent);
        self.planes[point.z as usize][self.extent.offset_xy(point.x, point.y)]
    }

    #[inline]
    pub fn set(&mut self, point: IVec3, value: T) {
        debug_assert!(self.extent.contains(point), "{point} outside {}", self.extent);
        let offset = self.extent.offset_xy(point.x, point.y);
        self.planes[point.z as usize][offset] = value;
    }

    /// Value at `point`, or `None` outside the buffer.
    #[inline]
    pub fn try_get(&self, point: IVec3) -> Option<T> {
        self.extent.contains(point).then(|| self.get(point))
    }

    pub fn fill(&mut self, value: T) {
        for plane in &mut self.planes {
            plane.fill(value);
        }
    }

    pub fn count_equal(&self, value: T) -> usize {
        self.planes
            .iter()
            .map(|plane| plane.iter().filter(|&&v| v == value).count())
            .sum()
    }

    pub fn any_equal(&self, value: T) -> bool {
        self.planes.iter().any(|plane| plane.contains(&value))
    }

    /// Copy `region` (in this buffer's local frame) into `dest` with its corner at `dest_corner`.
    ///
    /// # Panics
    /// If either the source region or the destination region is out of bounds.
    pub fn copy_region_to(&self, region: &BoundingBox, dest: &mut VoxelBuffer<T>, dest_corner: IVec3) {
        assert!(
            region.inside_extent(&self.extent),
            "source region {region} outside {}",
            self.extent
        );
        let dest_region = BoundingBox::new(dest_corner, region.extent());
        assert!(
            dest_region.inside_extent(&dest.extent),
            "destination region {dest_region} outside {}",
            dest.extent
        );

        let width = region.extent().x() as usize;
        let src_min = region.corner_min();
        for dz in 0..region.extent().z() {
            let src_plane = &self.planes[(src_min.z + dz) as usize];
            let dst_plane = &mut dest.planes[(dest_corner.z + dz) as usize];
            for dy in 0..region.extent().y() {
                let src_start = self.extent.offset_xy(src_min.x, src_min.y + dy);
                let dst_start = dest.extent.offset_xy(dest_corner.x, dest_corner.y + dy);
                dst_plane[dst_start..dst_start + width]
                    .copy_from_slice(&src_plane[src_start..src_start + width]);
            }
        }
    }

    /// Sub-buffer covering `region` (local frame).
    pub fn extract_region(&self, region: &BoundingBox) -> VoxelBuffer<T> {
        let mut out = VoxelBuffer::new_default(region.extent());
        self.copy_region_to(region, &mut out, IVec3::ZERO);
        out
    }

    /// Single plane as a one-plane buffer.
    pub fn extract_slice(&self, z: usize) -> VoxelBuffer<T> {
        VoxelBuffer {
            planes: vec![self.planes[z].clone()],
            extent: self.extent.flatten_z(),
        }
    }

    /// Per-(x, y) maximum over all planes.
    pub fn max_projection(&self) -> VoxelBuffer<T> {
        let mut out = match self.planes.first() {
            Some(first) => first.clone(),
            None => vec![T::default(); self.extent.area_xy()],
        };
        for plane in self.planes.iter().skip(1) {
            for (o, &v) in out.iter_mut().zip(plane) {
                if v > *o {
                    *o = v;
                }
            }
        }
        VoxelBuffer {
            planes: vec![out],
            extent: self.extent.flatten_z(),
        }
    }

    /// Iterate `(point, value)` in plane-major order.
    pub fn iter_points(&self) -> impl Iterator<Item = (IVec3, T)> + '_ {
        let extent = self.extent;
        self.planes.iter().enumerate().flat_map(move |(z, plane)| {
            plane
                .iter()
                .enumerate()
                .map(move |(offset, &v)| (extent.point_xy(offset, z as i32), v))
        })
    }

    /// Minimum and maximum value, `None` for an empty buffer.
    pub fn min_max(&self) -> Option<(T, T)> {
        let mut values = self.planes.iter().flat_map(|p| p.iter().copied());
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| {
            (if v < lo { v } else { lo }, if v > hi { v } else { hi })
        }))
    }

    /// Element-wise conversion to another voxel type.
    pub fn map<U: Voxel>(&self, f: impl Fn(T) -> U) -> VoxelBuffer<U> {
        VoxelBuffer {
            planes: self
                .planes
                .iter()
                .map(|p| p.iter().map(|&v| f(v)).collect())
                .collect(),
            extent: self.extent,
        }
    }
}
