use std::ops::{Deref, DerefMut};

use glam::IVec3;

use crate::geometry::BoundingBox;

use super::ObjectMask;

/// Ordered collection of object masks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectCollection {
    masks: Vec<ObjectMask>,
}

impl ObjectCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            masks: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, mask: ObjectMask) {
        self.masks.push(mask);
    }

    pub fn into_vec(self) -> Vec<ObjectMask> {
        self.masks
    }

    /// Deep copy, for call sites about to mutate masks they must keep.
    pub fn duplicate(&self) -> ObjectCollection {
        self.clone()
    }

    /// Union of all bounding boxes, `None` for an empty collection.
    pub fn bbox(&self) -> Option<BoundingBox> {
        self.masks
            .iter()
            .map(|m| *m.bbox())
            .reduce(|acc, b| acc.union(&b))
    }

    pub fn total_on_voxels(&self) -> usize {
        self.masks.iter().map(ObjectMask::num_on_voxels).sum()
    }

    /// Copy keeping only masks with at least `min` on voxels (and at most `max`, if given).
    pub fn filter_by_size(&self, min: usize, max: Option<usize>) -> ObjectCollection {
        self.masks
            .iter()
            .filter(|m| {
                let n = m.num_on_voxels();
                n >= min && max.map_or(true, |max| n <= max)
            })
            .cloned()
            .collect()
    }

    pub fn shift_by(&self, shift: IVec3) -> ObjectCollection {
        self.masks.iter().map(|m| m.shift_by(shift)).collect()
    }

    /// Apply `f` to every mask, collecting the results in order.
    pub fn try_map<E>(
        &self,
        f: impl FnMut(&ObjectMask) -> Result<ObjectMask, E>,
    ) -> Result<ObjectCollection, E> {
        self.masks.iter().map(f).collect()
    }
}

impl Deref for ObjectCollection {
    type Target = [ObjectMask];

    fn deref(&self) -> &Self::Target {
        &self.masks
    }
}

impl DerefMut for ObjectCollection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.masks
    }
}

impl From<Vec<ObjectMask>> for ObjectCollection {
    fn from(masks: Vec<ObjectMask>) -> Self {
        Self { masks }
    }
}

impl FromIterator<ObjectMask> for ObjectCollection {
    fn from_iter<I: IntoIterator<Item = ObjectMask>>(iter: I) -> Self {
        Self {
            masks: iter.into_iter().collect(),
        }
    }
}

impl Extend<ObjectMask> for ObjectCollection {
    fn extend<I: IntoIterator<Item = ObjectMask>>(&mut self, iter: I) {
        self.masks.extend(iter);
    }
}

impl IntoIterator for ObjectCollection {
    type Item = ObjectMask;
    type IntoIter = std::vec::IntoIter<ObjectMask>;

    fn into_iter(self) -> Self::IntoIter {
        self.masks.into_iter()
    }
}

impl<'a> IntoIterator for &'a ObjectCollection {
    type Item = &'a ObjectMask;
    type IntoIter = std::slice::Iter<'a, ObjectMask>;

    fn into_iter(self) -> Self::IntoIter {
        self.masks.iter()
    }
}
