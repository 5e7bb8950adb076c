//! Voxel connectivity for morphology, labeling and outline extraction.

use glam::IVec3;

use crate::geometry::Extent;
use crate::mask::ObjectMask;

/// Which voxels count as touching.
///
/// In 2D the neighborhood stays inside one z-plane; in 3D it spans the
/// planes above and below.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
    strum_macros::Display,
)]
pub enum Connectivity {
    /// (x±1, y) and (x, y±1).
    #[default]
    Four,
    /// All 8 in-plane neighbors, diagonals included.
    Eight,
    /// Face neighbors in 3D.
    Six,
    /// Face, edge and corner neighbors in 3D.
    TwentySix,
}

const FOUR: [IVec3; 4] = [
    IVec3::new(-1, 0, 0),
    IVec3::new(1, 0, 0),
    IVec3::new(0, -1, 0),
    IVec3::new(0, 1, 0),
];

const EIGHT: [IVec3; 8] = [
    IVec3::new(-1, -1, 0),
    IVec3::new(0, -1, 0),
    IVec3::new(1, -1, 0),
    IVec3::new(-1, 0, 0),
    IVec3::new(1, 0, 0),
    IVec3::new(-1, 1, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(1, 1, 0),
];

const SIX: [IVec3; 6] = [
    IVec3::new(-1, 0, 0),
    IVec3::new(1, 0, 0),
    IVec3::new(0, -1, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(0, 0, -1),
    IVec3::new(0, 0, 1),
];

const fn twenty_six() -> [IVec3; 26] {
    let mut out = [IVec3::ZERO; 26];
    let mut i = 0;
    let mut z = -1;
    while z <= 1 {
        let mut y = -1;
        while y <= 1 {
            let mut x = -1;
            while x <= 1 {
                if x != 0 || y != 0 || z != 0 {
                    out[i] = IVec3::new(x, y, z);
                    i += 1;
                }
                x += 1;
            }
            y += 1;
        }
        z += 1;
    }
    out
}

const TWENTY_SIX: [IVec3; 26] = twenty_six();

impl Connectivity {
    /// Pick the connectivity from the `(use_3d, big_neighborhood)` flag pair.
    #[inline]
    pub fn new(use_3d: bool, big_neighborhood: bool) -> Self {
        match (use_3d, big_neighborhood) {
            (false, false) => Connectivity::Four,
            (false, true) => Connectivity::Eight,
            (true, false) => Connectivity::Six,
            (true, true) => Connectivity::TwentySix,
        }
    }

    #[inline]
    pub fn is_3d(self) -> bool {
        matches!(self, Connectivity::Six | Connectivity::TwentySix)
    }

    /// Includes diagonal neighbors.
    #[inline]
    pub fn is_big(self) -> bool {
        matches!(self, Connectivity::Eight | Connectivity::TwentySix)
    }

    /// The same connectivity restricted to one plane.
    #[inline]
    pub fn to_2d(self) -> Self {
        Connectivity::new(false, self.is_big())
    }

    #[inline]
    pub fn offsets(self) -> &'static [IVec3] {
        match self {
            Connectivity::Four => &FOUR,
            Connectivity::Eight => &EIGHT,
            Connectivity::Six => &SIX,
            Connectivity::TwentySix => &TWENTY_SIX,
        }
    }
}

/// How neighbors outside a mask's bounding box are read.
///
/// A neighbor inside the containing extent but outside the box is off. A
/// neighbor beyond the containing extent reads as `outside_on`. Without a
/// containing extent every neighbor outside the box is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BorderRule {
    pub containing_extent: Option<Extent>,
    pub outside_on: bool,
}

impl BorderRule {
    pub fn new(containing_extent: Option<Extent>, outside_on: bool) -> Self {
        Self {
            containing_extent,
            outside_on,
        }
    }

    /// State of the neighbor at `local` (may lie outside the mask's box).
    #[inline]
    pub fn neighbor_on(&self, mask: &ObjectMask, local: IVec3) -> bool {
        if mask.extent().contains(local) {
            return mask.is_on(local);
        }
        match self.containing_extent {
            Some(extent) if !extent.contains(local + mask.bbox().corner_min()) => self.outside_on,
            _ => false,
        }
    }

    /// True if any neighbor of the on voxel at `local` reads as off.
    #[inline]
    pub fn has_off_neighbor(&self, mask: &ObjectMask, local: IVec3, offsets: &[IVec3]) -> bool {
        offsets.iter().any(|&o| !self.neighbor_on(mask, local + o))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox;

    #[test]
    fn test_border_rule_reads_outside() {
        let mask = ObjectMask::new_filled(
            BoundingBox::new(IVec3::new(0, 2, 0), Extent::new(3, 3, 1)),
            true,
        );
        let inside = IVec3::new(1, 1, 0);
        let left_of_image = IVec3::new(-1, 1, 0);
        let above_box_in_image = IVec3::new(1, -1, 0);

        let none = BorderRule::new(None, true);
        assert!(none.neighbor_on(&mask, inside));
        assert!(!none.neighbor_on(&mask, left_of_image));

        let on = BorderRule::new(Some(Extent::new(10, 10, 1)), true);
        assert!(on.neighbor_on(&mask, left_of_image));
        assert!(!on.neighbor_on(&mask, above_box_in_image));

        let off = BorderRule::new(Some(Extent::new(10, 10, 1)), false);
        assert!(!off.neighbor_on(&mask, left_of_image));
    }

    #[test]
    fn test_offset_counts() {
        assert_eq!(Connectivity::Four.offsets().len(), 4);
        assert_eq!(Connectivity::Eight.offsets().len(), 8);
        assert_eq!(Connectivity::Six.offsets().len(), 6);
        assert_eq!(Connectivity::TwentySix.offsets().len(), 26);
    }

    #[test]
    fn test_offsets_are_unique_unit_steps() {
        for conn in [
            Connectivity::Four,
            Connectivity::Eight,
            Connectivity::Six,
            Connectivity::TwentySix,
        ] {
            let offsets = conn.offsets();
            for (i, a) in offsets.iter().enumerate() {
                assert_ne!(*a, IVec3::ZERO);
                assert!(a.abs().max_element() == 1);
                assert!(offsets[i + 1..].iter().all(|b| b != a), "{conn} repeats {a}");
                if !conn.is_3d() {
                    assert_eq!(a.z, 0);
                }
            }
        }
    }

    #[test]
    fn test_flags() {
        assert_eq!(Connectivity::new(false, false), Connectivity::Four);
        assert_eq!(Connectivity::new(true, true), Connectivity::TwentySix);
        assert!(Connectivity::Six.is_3d());
        assert!(!Connectivity::Six.is_big());
        assert_eq!(Connectivity::TwentySix.to_2d(), Connectivity::Eight);
    }
}
