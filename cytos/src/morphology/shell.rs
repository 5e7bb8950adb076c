use crate::config::ShellConfig;
use crate::error::Result;
use crate::mask::ObjectMask;

use super::{dilate, erode};

/// The ring between the dilated and the eroded object.
///
/// Either side may be skipped by setting its iteration count to zero, in which
/// case the original object stands in for it. With `inverse` only the part of
/// the ring outside the original object is kept. The result lives in the box
/// of the dilated mask.
pub fn shell(mask: &ObjectMask, config: &ShellConfig) -> Result<ObjectMask> {
    config.validate_for(mask.bbox())?;

    let outer = if config.dilation_iterations > 0 {
        dilate(mask, &config.dilate_config())?
    } else {
        mask.duplicate()
    };
    let inner = if config.erosion_iterations > 0 {
        Some(erode(mask, &config.erode_config())?)
    } else {
        None
    };
    Ok(ring_from_parts(mask, config, outer, inner.as_ref()))
}

/// Cut `inner` (or the object itself) out of `outer`.
pub(crate) fn ring_from_parts(
    mask: &ObjectMask,
    config: &ShellConfig,
    outer: ObjectMask,
    inner: Option<&ObjectMask>,
) -> ObjectMask {
    let mut ring = outer;
    ring.subtract(inner.unwrap_or(mask));
    if config.inverse {
        ring.subtract(mask);
    }

    tracing::debug!(
        dilation = config.dilation_iterations,
        erosion = config.erosion_iterations,
        inverse = config.inverse,
        bbox = %ring.bbox(),
        "built shell"
    );
    ring
}
