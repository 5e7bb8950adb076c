//! Set operations between masks placed in the same global frame.

use glam::IVec3;

use crate::geometry::BoundingBox;

use super::ObjectMask;

/// Visit every global point in `region`, passing the local point in `a` and in `b`.
fn for_each_in_overlap(
    region: &BoundingBox,
    a: &BoundingBox,
    b: &BoundingBox,
    mut f: impl FnMut(IVec3, IVec3),
) {
    let a_off = region.relative_position_to(a);
    let b_off = region.relative_position_to(b);
    let extent = region.extent();
    for z in 0..extent.z() {
        for y in 0..extent.y() {
            for x in 0..extent.x() {
                let p = IVec3::new(x, y, z);
                f(p + a_off, p + b_off);
            }
        }
    }
}

impl ObjectMask {
    /// Voxels on in both masks, as a mask over the overlap of the two boxes.
    ///
    /// `None` when the boxes are disjoint. A non-`None` result may still have
    /// no on voxels.
    pub fn intersect(&self, other: &ObjectMask) -> Option<ObjectMask> {
        let region = self.bbox.intersection(&other.bbox)?;
        let mut out = ObjectMask::new(region);
        let to_out = self.bbox.relative_position_to(&region);
        for_each_in_overlap(&region, &self.bbox, &other.bbox, |pa, pb| {
            if self.is_on(pa) && other.is_on(pb) {
                out.set_on(pa + to_out);
            }
        });
        Some(out)
    }

    pub fn count_intersecting_voxels(&self, other: &ObjectMask) -> usize {
        let Some(region) = self.bbox.intersection(&other.bbox) else {
            return 0;
        };
        let mut count = 0;
        for_each_in_overlap(&region, &self.bbox, &other.bbox, |pa, pb| {
            if self.is_on(pa) && other.is_on(pb) {
                count += 1;
            }
        });
        count
    }

    pub fn has_intersecting_voxels(&self, other: &ObjectMask) -> bool {
        let Some(region) = self.bbox.intersection(&other.bbox) else {
            return false;
        };
        let a_off = region.relative_position_to(&self.bbox);
        let b_off = region.relative_position_to(&other.bbox);
        let extent = region.extent();
        for z in 0..extent.z() {
            for y in 0..extent.y() {
                for x in 0..extent.x() {
                    let p = IVec3::new(x, y, z);
                    if self.is_on(p + a_off) && other.is_on(p + b_off) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Union of several masks over the union of their boxes, `None` for no input.
    pub fn merge<'a>(masks: impl IntoIterator<Item = &'a ObjectMask>) -> Option<ObjectMask> {
        let masks: Vec<&ObjectMask> = masks.into_iter().collect();
        let bbox = masks
            .iter()
            .map(|m| m.bbox)
            .reduce(|acc, b| acc.union(&b))?;
        let mut out = ObjectMask::new(bbox);
        for mask in masks {
            let offset = mask.bbox.relative_position_to(&bbox);
            for p in mask.on_points_local() {
                out.set_on(p + offset);
            }
        }
        Some(out)
    }

    /// Switch off every voxel that is on in `other`. Returns how many changed.
    pub fn subtract(&mut self, other: &ObjectMask) -> usize {
        let Some(region) = self.bbox.intersection(&other.bbox) else {
            return 0;
        };
        let mut removed = Vec::new();
        for_each_in_overlap(&region, &self.bbox, &other.bbox, |pa, pb| {
            if self.is_on(pa) && other.is_on(pb) {
                removed.push(pa);
            }
        });
        for &p in &removed {
            self.set_off(p);
        }
        removed.len()
    }

    /// Copying form of [`ObjectMask::subtract`].
    pub fn subtracted(&self, other: &ObjectMask) -> ObjectMask {
        let mut out = self.duplicate();
        out.subtract(other);
        out
    }

    /// Switch off every voxel that is off in `other` or outside its box.
    pub(crate) fn retain_where_on(&mut self, other: &ObjectMask) {
        let corner = self.bbox.corner_min();
        let extent = self.extent();
        for z in 0..extent.z() {
            for y in 0..extent.y() {
                for x in 0..extent.x() {
                    let p = IVec3::new(x, y, z);
                    if self.is_on(p) && !other.is_on_global(p + corner) {
                        self.set_off(p);
                    }
                }
            }
        }
    }
}
