//! Border voxels and exposed faces of object masks.

#[cfg(test)]
mod tests;

use glam::IVec3;

use crate::config::{OutlineConfig, SurfaceConfig};
use crate::error::Result;
use crate::mask::ObjectMask;
use crate::neighborhood::{BorderRule, Connectivity};

/// The mask an outline is computed on, and the rule for neighbors outside it.
fn prepare(mask: &ObjectMask, config: &OutlineConfig) -> Result<(ObjectMask, BorderRule)> {
    config.validate_for(mask.bbox())?;
    if config.mip {
        let extent = config.containing_extent.map(|e| e.flatten_z());
        Ok((
            mask.flatten_z(),
            BorderRule::new(extent, config.outside_treated_as_on),
        ))
    } else {
        Ok((
            mask.duplicate(),
            BorderRule::new(config.containing_extent, config.outside_treated_as_on),
        ))
    }
}

fn border_points<'a>(
    source: &'a ObjectMask,
    border: &'a BorderRule,
    connectivity: Connectivity,
) -> impl Iterator<Item = IVec3> + 'a {
    let offsets = connectivity.offsets();
    source
        .on_points_local()
        .filter(move |&p| border.has_off_neighbor(source, p, offsets))
}

/// On voxels with at least one off neighbor, as a mask over the same box
/// (the flattened box when `mip` is set).
pub fn outline(mask: &ObjectMask, config: &OutlineConfig) -> Result<ObjectMask> {
    let (source, border) = prepare(mask, config)?;
    let mut out = ObjectMask::new(*source.bbox());
    for p in border_points(&source, &border, config.connectivity()) {
        out.set_on(p);
    }
    tracing::debug!(
        connectivity = %config.connectivity(),
        mip = config.mip,
        bbox = %out.bbox(),
        "extracted outline"
    );
    Ok(out)
}

/// Number of outline voxels, each counted once.
pub fn count_border_voxels(mask: &ObjectMask, config: &OutlineConfig) -> Result<usize> {
    let (source, border) = prepare(mask, config)?;
    Ok(border_points(&source, &border, config.connectivity()).count())
}

/// Number of on-voxel faces that touch an off voxel or the box edge.
///
/// A corner voxel of a 3D block contributes 3. With `suppress_3d` only the
/// four in-plane faces of each voxel are considered.
pub fn count_surface_faces(mask: &ObjectMask, config: &SurfaceConfig) -> usize {
    let flattened;
    let source = if config.mip {
        flattened = mask.flatten_z();
        &flattened
    } else {
        mask
    };
    let connectivity = if config.suppress_3d || config.mip {
        Connectivity::Four
    } else {
        Connectivity::Six
    };
    let extent = source.extent();
    source
        .on_points_local()
        .map(|p| {
            connectivity
                .offsets()
                .iter()
                .filter(|&&o| {
                    let q = p + o;
                    !extent.contains(q) || !source.is_on(q)
                })
                .count()
        })
        .sum()
}
