use std::f64::consts::PI;

use crate::config::SurfaceConfig;
use crate::error::Result;
use crate::mask::ObjectMask;
use crate::outline::count_surface_faces;
use crate::session::FeatureSession;

pub(super) fn surface_voxel_faces(mask: &ObjectMask, config: &SurfaceConfig) -> f64 {
    count_surface_faces(mask, config) as f64
}

/// Circularity of the maximum projection, perimeter counted as exposed
/// in-plane voxel faces. An empty mask scores 0.
pub(super) fn shape_regularity(mask: &ObjectMask, session: &FeatureSession) -> Result<f64> {
    let flat = session.flattened(mask)?;
    let area = flat.num_on_voxels() as f64;
    let perimeter = count_surface_faces(
        &flat,
        &SurfaceConfig {
            mip: false,
            suppress_3d: true,
        },
    ) as f64;
    if perimeter == 0.0 {
        return Ok(0.0);
    }
    Ok(2.0 * (PI * area).sqrt() / perimeter)
}
