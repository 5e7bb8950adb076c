use crate::error::{Error, Phase, Result};
use crate::labeling::is_connected;
use crate::mask::{ObjectCollection, ObjectMask};
use crate::neighborhood::Connectivity;

fn check_connected(masks: &[ObjectMask], connectivity: Connectivity, phase: Phase) -> Result<()> {
    match masks.iter().position(|m| !is_connected(m, connectivity)) {
        Some(index) => Err(Error::Disconnected { index, phase }),
        None => Ok(()),
    }
}

/// Remove from every mask the voxels it shares with any other mask, in place.
///
/// Overlaps are found on the unmodified masks first, so a voxel claimed by
/// three masks is removed from all three. With `check`, each mask must be
/// connected before the removal and still be connected after it.
pub fn remove_intersecting_voxels(
    masks: &mut [ObjectMask],
    check: Option<Connectivity>,
) -> Result<()> {
    if let Some(connectivity) = check {
        check_connected(masks, connectivity, Phase::Before)?;
    }

    let mut overlaps = Vec::new();
    for i in 0..masks.len() {
        for j in i + 1..masks.len() {
            if let Some(shared) = masks[i].intersect(&masks[j]) {
                if !shared.is_empty() {
                    overlaps.push((i, j, shared));
                }
            }
        }
    }

    let mut removed = 0usize;
    for (i, j, shared) in &overlaps {
        removed += masks[*i].subtract(shared);
        removed += masks[*j].subtract(shared);
    }
    tracing::debug!(
        masks = masks.len(),
        overlapping_pairs = overlaps.len(),
        removed,
        "removed intersecting voxels"
    );

    if let Some(connectivity) = check {
        check_connected(masks, connectivity, Phase::After)?;
    }
    Ok(())
}

/// As [`remove_intersecting_voxels`] on a duplicate, leaving `masks` untouched.
pub fn remove_intersecting_voxels_copy(
    masks: &ObjectCollection,
    check: Option<Connectivity>,
) -> Result<ObjectCollection> {
    let mut out = masks.duplicate();
    remove_intersecting_voxels(&mut out, check)?;
    Ok(out)
}
