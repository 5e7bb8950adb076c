//! Axis-aligned bounding box positioning a voxel region in a larger space.

use std::fmt;

use glam::{DVec3, IVec3};

use super::Extent;

/// Axis-aligned box of voxels: a minimum corner plus an extent.
///
/// Bounds are inclusive: a voxel `p` is inside when
/// `corner_min <= p <= corner_max` component-wise, with
/// `corner_max = corner_min + extent - 1`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub struct BoundingBox {
    corner_min: IVec3,
    extent: Extent,
}

impl BoundingBox {
    #[inline]
    pub const fn new(corner_min: IVec3, extent: Extent) -> Self {
        Self { corner_min, extent }
    }

    /// Box covering an entire volume, anchored at the origin.
    #[inline]
    pub fn from_extent(extent: Extent) -> Self {
        Self::new(IVec3::ZERO, extent)
    }

    /// Box spanning two inclusive corners.
    ///
    /// # Panics
    /// If `max < min - 1` on any axis.
    #[inline]
    pub fn from_corners(min: IVec3, max: IVec3) -> Self {
        Self::new(min, Extent::from_ivec(max - min + IVec3::ONE))
    }

    #[inline]
    pub fn corner_min(&self) -> IVec3 {
        self.corner_min
    }

    /// Inclusive maximum corner.
    #[inline]
    pub fn corner_max(&self) -> IVec3 {
        self.corner_min + self.extent.as_ivec() - IVec3::ONE
    }

    /// Exclusive upper corner.
    #[inline]
    pub fn corner_end(&self) -> IVec3 {
        self.corner_min + self.extent.as_ivec()
    }

    #[inline]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    #[inline]
    pub fn volume(&self) -> usize {
        self.extent.volume()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.extent.is_empty()
    }

    #[inline]
    pub fn contains_point(&self, point: IVec3) -> bool {
        point.cmpge(self.corner_min).all() && point.cmplt(self.corner_end()).all()
    }

    /// True if `other` lies entirely inside this box.
    #[inline]
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.corner_min.cmpge(self.corner_min).all()
            && other.corner_end().cmple(self.corner_end()).all()
    }

    /// True if this box lies entirely inside a volume of size `extent` at the origin.
    #[inline]
    pub fn inside_extent(&self, extent: &Extent) -> bool {
        BoundingBox::from_extent(*extent).contains(self)
    }

    /// Overlapping region, or `None` when the boxes are disjoint.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let min = self.corner_min.max(other.corner_min);
        let end = self.corner_end().min(other.corner_end());
        if end.cmpgt(min).all() {
            Some(BoundingBox::new(min, Extent::from_ivec(end - min)))
        } else {
            None
        }
    }

    #[inline]
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.intersection(other).is_some()
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let min = self.corner_min.min(other.corner_min);
        let end = self.corner_end().max(other.corner_end());
        BoundingBox::new(min, Extent::from_ivec(end - min))
    }

    /// Position of this box's corner in the local frame of `other`.
    #[inline]
    pub fn relative_position_to(&self, other: &BoundingBox) -> IVec3 {
        self.corner_min - other.corner_min
    }

    /// This box expressed in the local frame of `other`.
    #[inline]
    pub fn relative_to(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(self.relative_position_to(other), self.extent)
    }

    #[inline]
    pub fn shift_by(&self, shift: IVec3) -> BoundingBox {
        BoundingBox::new(self.corner_min + shift, self.extent)
    }

    /// Same corner, different extent.
    #[inline]
    pub fn with_extent(&self, extent: Extent) -> BoundingBox {
        BoundingBox::new(self.corner_min, extent)
    }

    /// Grow by `by` voxels on both sides of each axis, then clip to the
    /// containing volume if one is given.
    pub fn grow(&self, by: IVec3, containing: Option<&Extent>) -> BoundingBox {
        let grown = BoundingBox::new(self.corner_min - by, self.extent.grow(by));
        match containing {
            Some(extent) => grown.clip_to(extent).unwrap_or(BoundingBox::new(
                grown.corner_min.max(IVec3::ZERO),
                Extent::default(),
            )),
            None => grown,
        }
    }

    /// Shrink the lower faces by `lower` and the upper faces by `upper` voxels.
    /// An axis shrunk past its size collapses to zero length.
    pub fn shrink_faces(&self, lower: IVec3, upper: IVec3) -> BoundingBox {
        let size = self.extent.as_ivec();
        let new_size = (size - lower - upper).max(IVec3::ZERO);
        let corner = self.corner_min + lower.min(size);
        BoundingBox::new(corner, Extent::from_ivec(new_size))
    }

    /// Part of this box inside a volume of size `extent` at the origin.
    #[inline]
    pub fn clip_to(&self, extent: &Extent) -> Option<BoundingBox> {
        self.intersection(&BoundingBox::from_extent(*extent))
    }

    /// Collapse to the single plane `z = 0`.
    #[inline]
    pub fn flatten_z(&self) -> BoundingBox {
        BoundingBox::new(
            IVec3::new(self.corner_min.x, self.corner_min.y, 0),
            self.extent.flatten_z(),
        )
    }

    /// The single plane at global `z`.
    #[inline]
    pub fn slice_z(&self, z: i32) -> BoundingBox {
        BoundingBox::new(
            IVec3::new(self.corner_min.x, self.corner_min.y, z),
            self.extent.flatten_z(),
        )
    }

    /// Geometric centre in voxel-centre coordinates.
    #[inline]
    pub fn midpoint(&self) -> DVec3 {
        self.corner_min.as_dvec3() + self.extent.as_ivec().as_dvec3() * 0.5
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{},{})+{}",
            self.corner_min.x, self.corner_min.y, self.corner_min.z, self.extent
        )
    }
}

/// Accumulates points into the tightest enclosing box.
///
/// Starts with inverted bounds so that the first `include()` sets them.
#[derive(Debug, Clone, Copy)]
pub struct PointBounds {
    min: IVec3,
    max: IVec3,
}

impl PointBounds {
    #[inline]
    pub const fn empty() -> Self {
        Self {
            min: IVec3::MAX,
            max: IVec3::MIN,
        }
    }

    #[inline]
    pub fn include(&mut self, point: IVec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    #[inline]
    pub fn to_bbox(&self) -> Option<BoundingBox> {
        (!self.is_empty()).then(|| BoundingBox::from_corners(self.min, self.max))
    }
}

impl Default for PointBounds {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x: i32, y: i32, z: i32, sx: i32, sy: i32, sz: i32) -> BoundingBox {
        BoundingBox::new(IVec3::new(x, y, z), Extent::new(sx, sy, sz))
    }

    #[test]
    fn test_corner_max_is_inclusive() {
        let b = bbox(2, 3, 0, 4, 5, 1);
        assert_eq!(b.corner_max(), IVec3::new(5, 7, 0));
        assert_eq!(b.corner_end(), IVec3::new(6, 8, 1));
    }

    #[test]
    fn test_single_voxel() {
        let b = bbox(3, 5, 2, 1, 1, 1);
        assert_eq!(b.corner_max(), b.corner_min());
        assert_eq!(b.volume(), 1);
        assert!(b.contains_point(IVec3::new(3, 5, 2)));
    }

    #[test]
    fn test_intersection() {
        let a = bbox(0, 0, 0, 5, 5, 1);
        let b = bbox(3, 2, 0, 5, 5, 1);
        assert_eq!(a.intersection(&b), Some(bbox(3, 2, 0, 2, 3, 1)));
        assert_eq!(b.intersection(&a), a.intersection(&b));
    }

    #[test]
    fn test_intersection_disjoint_and_touching() {
        let a = bbox(0, 0, 0, 5, 5, 1);
        // Shares no voxel: starts right after a ends.
        assert_eq!(a.intersection(&bbox(5, 0, 0, 2, 2, 1)), None);
        assert_eq!(a.intersection(&bbox(0, 0, 1, 2, 2, 1)), None);
        // Shares the last column.
        assert_eq!(
            a.intersection(&bbox(4, 0, 0, 2, 2, 1)),
            Some(bbox(4, 0, 0, 1, 2, 1))
        );
    }

    #[test]
    fn test_contains_box() {
        let outer = bbox(0, 0, 0, 10, 10, 3);
        assert!(outer.contains(&bbox(2, 2, 1, 8, 8, 2)));
        assert!(!outer.contains(&bbox(2, 2, 1, 9, 8, 2)));
        assert!(outer.contains(&outer));
    }

    #[test]
    fn test_relative_position() {
        let inner = bbox(7, 8, 2, 2, 2, 1);
        let outer = bbox(5, 5, 0, 10, 10, 3);
        assert_eq!(inner.relative_position_to(&outer), IVec3::new(2, 3, 2));
        assert_eq!(inner.relative_to(&outer), bbox(2, 3, 2, 2, 2, 1));
    }

    #[test]
    fn test_grow_unclipped_may_go_negative() {
        let b = bbox(1, 1, 0, 3, 3, 1);
        assert_eq!(b.grow(IVec3::new(2, 2, 0), None), bbox(-1, -1, 0, 7, 7, 1));
    }

    #[test]
    fn test_grow_clipped() {
        let b = bbox(1, 1, 0, 3, 3, 1);
        let extent = Extent::new(6, 5, 1);
        assert_eq!(
            b.grow(IVec3::new(2, 2, 1), Some(&extent)),
            bbox(0, 0, 0, 6, 5, 1)
        );
    }

    #[test]
    fn test_shrink_faces() {
        let b = bbox(0, 0, 0, 5, 5, 1);
        assert_eq!(
            b.shrink_faces(IVec3::new(1, 1, 0), IVec3::new(1, 1, 0)),
            bbox(1, 1, 0, 3, 3, 1)
        );
        // Only the upper x face.
        assert_eq!(
            b.shrink_faces(IVec3::ZERO, IVec3::new(2, 0, 0)),
            bbox(0, 0, 0, 3, 5, 1)
        );
        assert!(b
            .shrink_faces(IVec3::new(3, 0, 0), IVec3::new(3, 0, 0))
            .is_empty());
    }

    #[test]
    fn test_flatten_z() {
        let b = bbox(2, 3, 4, 5, 6, 7);
        assert_eq!(b.flatten_z(), bbox(2, 3, 0, 5, 6, 1));
        assert_eq!(b.slice_z(6), bbox(2, 3, 6, 5, 6, 1));
    }

    #[test]
    fn test_union() {
        let a = bbox(0, 0, 0, 2, 2, 1);
        let b = bbox(5, 1, 2, 1, 4, 1);
        assert_eq!(a.union(&b), bbox(0, 0, 0, 6, 5, 3));
    }

    #[test]
    fn test_point_bounds() {
        let mut bounds = PointBounds::empty();
        assert!(bounds.to_bbox().is_none());
        bounds.include(IVec3::new(5, 3, 1));
        assert_eq!(bounds.to_bbox(), Some(bbox(5, 3, 1, 1, 1, 1)));
        bounds.include(IVec3::new(2, 7, 0));
        bounds.include(IVec3::new(8, 1, 1));
        assert_eq!(bounds.to_bbox(), Some(bbox(2, 1, 0, 7, 7, 2)));
    }

    #[test]
    fn test_midpoint() {
        let b = bbox(0, 0, 0, 4, 2, 1);
        assert_eq!(b.midpoint(), DVec3::new(2.0, 1.0, 0.5));
    }
}
