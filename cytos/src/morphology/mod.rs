//! Binary morphology on object masks.
//!
//! Every iteration reads the previous mask and writes a fresh one, so
//! iterations compose sequentially and never see their own partial output.
//! After each iteration the configured [`AcceptCondition`]s are checked; a
//! failed check discards that iteration and stops.

mod accept;
mod shell;

#[cfg(test)]
mod tests;

pub use accept::AcceptCondition;
pub use shell::shell;
pub(crate) use shell::ring_from_parts;

use glam::IVec3;

use crate::config::{CloseConfig, DilateConfig, ErodeConfig};
use crate::error::Result;
use crate::geometry::Extent;
use crate::mask::ObjectMask;
use crate::neighborhood::{BorderRule, Connectivity};

/// Per-axis growth for `iterations` steps; z only moves in 3D.
fn growth(iterations: u32, use_3d: bool) -> IVec3 {
    let k = iterations as i32;
    IVec3::new(k, k, if use_3d { k } else { 0 })
}

fn dilate_once(src: &ObjectMask, offsets: &[IVec3]) -> ObjectMask {
    let extent = src.extent();
    let mut out = src.duplicate();
    for p in src.on_points_local() {
        for &o in offsets {
            let q = p + o;
            if extent.contains(q) {
                out.set_on(q);
            }
        }
    }
    out
}

fn erode_once(src: &ObjectMask, offsets: &[IVec3], border: &BorderRule) -> ObjectMask {
    let mut out = src.duplicate();
    for p in src.on_points_local() {
        if border.has_off_neighbor(src, p, offsets) {
            out.set_off(p);
        }
    }
    out
}

/// Run up to `iterations` steps, stopping at the first rejected one.
/// Returns the last accepted mask and how many steps were accepted.
fn iterate(
    operation: &'static str,
    mut current: ObjectMask,
    iterations: u32,
    accept: &[AcceptCondition],
    connectivity: Connectivity,
    step: impl Fn(&ObjectMask) -> ObjectMask,
) -> (ObjectMask, u32) {
    for i in 0..iterations {
        let next = step(&current);
        if let Some(rejected) = accept.iter().find(|c| !c.accepts(&next, connectivity)) {
            tracing::warn!(
                operation,
                iteration = i + 1,
                condition = %rejected,
                "rejected morphology iteration, keeping previous result"
            );
            return (current, i);
        }
        tracing::trace!(operation, iteration = i + 1, "accepted iteration");
        current = next;
    }
    (current, iterations)
}

/// Grow the on region by `iterations` neighborhood steps.
///
/// The output box is the input box grown by `iterations` voxels on each side
/// (in x and y, and in z when `use_3d`), clipped to the containing extent.
pub fn dilate(mask: &ObjectMask, config: &DilateConfig) -> Result<ObjectMask> {
    config.validate_for(mask.bbox())?;
    let connectivity = config.connectivity();
    let bbox = mask.bbox().grow(
        growth(config.iterations, config.use_3d),
        config.containing_extent.as_ref(),
    );
    let start = mask.expand_to(&bbox)?;
    let offsets = connectivity.offsets();
    let (out, done) = iterate(
        "dilate",
        start,
        config.iterations,
        &config.accept,
        connectivity,
        |m| dilate_once(m, offsets),
    );
    tracing::debug!(
        iterations = done,
        %connectivity,
        bbox = %out.bbox(),
        "dilated mask"
    );
    Ok(out)
}

/// Shrink the on region by `iterations` neighborhood steps.
///
/// A voxel survives a step only if all its neighbors are on. Neighbors outside
/// the box read per [`BorderRule`]: off inside the containing extent, and
/// `outside_treated_as_on` beyond it. The output box is the input box shrunk by
/// the accepted iteration count on every face, except faces on the containing
/// extent's border when the outside is treated as on.
pub fn erode(mask: &ObjectMask, config: &ErodeConfig) -> Result<ObjectMask> {
    config.validate_for(mask.bbox())?;
    let connectivity = config.connectivity();
    let border = BorderRule::new(config.containing_extent, config.outside_treated_as_on);
    let offsets = connectivity.offsets();
    let (out, done) = iterate(
        "erode",
        mask.duplicate(),
        config.iterations,
        &config.accept,
        connectivity,
        |m| erode_once(m, offsets, &border),
    );

    let (lower, upper) = erosion_shrink(
        mask,
        done,
        config.use_3d,
        config.outside_treated_as_on,
        config.containing_extent.as_ref(),
    );
    let bbox = mask.bbox().shrink_faces(lower, upper);
    let out = out.crop_to(&bbox).unwrap_or_else(|| ObjectMask::new(bbox));
    tracing::debug!(
        iterations = done,
        %connectivity,
        bbox = %out.bbox(),
        "eroded mask"
    );
    Ok(out)
}

/// Per-face shrink after `done` erosion steps.
fn erosion_shrink(
    mask: &ObjectMask,
    done: u32,
    use_3d: bool,
    outside_on: bool,
    containing: Option<&Extent>,
) -> (IVec3, IVec3) {
    let step = growth(done, use_3d);
    let (mut lower, mut upper) = (step, step);
    if let (true, Some(extent)) = (outside_on, containing) {
        let min = mask.bbox().corner_min();
        let end = mask.bbox().corner_end();
        let size = extent.as_ivec();
        for axis in 0..3 {
            if min[axis] == 0 {
                lower[axis] = 0;
            }
            if end[axis] == size[axis] {
                upper[axis] = 0;
            }
        }
    }
    (lower, upper)
}

/// Dilate then erode with the same neighborhood.
pub fn close(mask: &ObjectMask, config: &CloseConfig) -> Result<ObjectMask> {
    config.validate_for(mask.bbox())?;
    let dilated = dilate(mask, &config.dilate_config())?;
    erode(&dilated, &config.erode_config())
}

/// Erode then dilate with the same neighborhood.
pub fn open(mask: &ObjectMask, config: &CloseConfig) -> Result<ObjectMask> {
    config.validate_for(mask.bbox())?;
    let eroded = erode(mask, &config.erode_config())?;
    dilate(&eroded, &config.dilate_config())
}
