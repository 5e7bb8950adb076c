use crate::config::LabelConfig;
use crate::mask::{ObjectCollection, ObjectMask};
use crate::voxel::VoxelBuffer;

use super::label_where;

/// Split `mask` into the connected pieces covered by each splitter.
///
/// Every on voxel of `mask` that is also on in splitter `i` is tagged `i + 1`
/// in a scratch id buffer; where splitters overlap the later one wins. Each id
/// is then labeled on its own, with all other ids treated as background.
/// Voxels no splitter covers are dropped.
pub fn split_by_objects(
    mask: &ObjectMask,
    splitters: &[ObjectMask],
    config: &LabelConfig,
) -> ObjectCollection {
    let bbox = *mask.bbox();
    let mut ids: VoxelBuffer<i32> = VoxelBuffer::new_default(mask.extent());

    let mut regions = Vec::with_capacity(splitters.len());
    for (i, splitter) in splitters.iter().enumerate() {
        let id = i as i32 + 1;
        let Some(region) = bbox.intersection(splitter.bbox()) else {
            continue;
        };
        let local = region.relative_to(&bbox);
        let mut any = false;
        for p in splitter.on_points() {
            let q = p - bbox.corner_min();
            if local.contains_point(q) && mask.is_on(q) {
                ids.set(q, id);
                any = true;
            }
        }
        if any {
            regions.push((id, region));
        }
    }

    let mut out = ObjectCollection::new();
    for (id, region) in regions {
        let offset = region.relative_position_to(&bbox);
        let pieces = label_where(&region, config.connectivity(), config.min_voxel_count, |p| {
            ids.get(p + offset) == id
        });
        out.extend(pieces);
    }
    tracing::debug!(
        splitters = splitters.len(),
        pieces = out.len(),
        "split mask by objects"
    );
    out
}
