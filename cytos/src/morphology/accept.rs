use glam::IVec3;

use crate::mask::ObjectMask;
use crate::neighborhood::Connectivity;
use crate::voxel::BitVolume;

/// A check applied to the result of each morphology iteration.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum_macros::Display,
)]
pub enum AcceptCondition {
    /// At least one voxel must remain on.
    NotEmpty,
    /// Every off voxel must be reachable from the box border through off
    /// voxels, i.e. the iteration must not enclose a hole.
    OffConnectedToBorder,
}

impl AcceptCondition {
    /// `connectivity` is the one the operation ran with. Holes are traced with
    /// face connectivity in the same dimensionality.
    pub fn accepts(&self, mask: &ObjectMask, connectivity: Connectivity) -> bool {
        match self {
            AcceptCondition::NotEmpty => !mask.is_empty(),
            AcceptCondition::OffConnectedToBorder => {
                off_connected_to_border(mask, Connectivity::new(connectivity.is_3d(), false))
            }
        }
    }
}

fn on_border(p: IVec3, size: IVec3, use_3d: bool) -> bool {
    p.x == 0
        || p.y == 0
        || p.x == size.x - 1
        || p.y == size.y - 1
        || (use_3d && (p.z == 0 || p.z == size.z - 1))
}

/// Flood the off voxels from the box border and check nothing was left behind.
fn off_connected_to_border(mask: &ObjectMask, connectivity: Connectivity) -> bool {
    let extent = mask.extent();
    let size = extent.as_ivec();
    let use_3d = connectivity.is_3d();
    let mut visited = BitVolume::new_default(extent);
    let mut stack = Vec::new();
    let mut total_off = 0usize;

    for (p, _) in mask.voxels().iter_points() {
        if mask.is_on(p) {
            continue;
        }
        total_off += 1;
        if on_border(p, size, use_3d) && visited.insert(p) {
            stack.push(p);
        }
    }

    let mut reached = stack.len();
    while let Some(p) = stack.pop() {
        for &o in connectivity.offsets() {
            let q = p + o;
            if extent.contains(q) && !mask.is_on(q) && visited.insert(q) {
                reached += 1;
                stack.push(q);
            }
        }
    }
    reached == total_off
}
