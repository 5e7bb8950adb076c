use crate::error::{Error, Result};
use crate::mask::ObjectMask;
use crate::moments::{MIN_VOXELS_FOR_MOMENTS, MomentsResult, eccentricity_from_eigenvalues};
use crate::session::FeatureSession;

/// Too few voxels: the object is treated as a sphere.
const SPHERICAL: f64 = 1.0;

fn is_degenerate(mask: &ObjectMask) -> bool {
    mask.num_on_voxels() < MIN_VOXELS_FOR_MOMENTS
}

/// Moments with the axis closest to z removed when `suppress_z` is set.
fn principal_axes(mask: &ObjectMask, session: &FeatureSession, suppress_z: bool) -> Result<MomentsResult> {
    let moments = session.moments(mask, suppress_z)?;
    Ok(if suppress_z {
        moments.without_z_axis()
    } else {
        MomentsResult::clone(&moments)
    })
}

fn leading_eigenvalues(moments: &MomentsResult) -> Result<(f64, f64)> {
    match (moments.get(0), moments.get(1)) {
        (Some(major), Some(minor)) => Ok((major.eigenvalue, minor.eigenvalue)),
        _ => Err(Error::Calculation(format!(
            "need two principal axes, have {}",
            moments.len()
        ))),
    }
}

pub(super) fn axis_length(
    mask: &ObjectMask,
    session: &FeatureSession,
    index: usize,
    suppress_z: bool,
) -> Result<f64> {
    if mask.is_empty() {
        return Ok(0.0);
    }
    let moments = principal_axes(mask, session, suppress_z)?;
    moments.axis_length(index).ok_or_else(|| {
        Error::invalid("index", format!("axis {index} of {}", moments.len()))
    })
}

pub(super) fn axis_ratio(mask: &ObjectMask, session: &FeatureSession, suppress_z: bool) -> Result<f64> {
    if is_degenerate(mask) {
        return Ok(SPHERICAL);
    }
    let moments = principal_axes(mask, session, suppress_z)?;
    let (major, minor) = leading_eigenvalues(&moments)?;
    match (major == 0.0, minor == 0.0) {
        (true, true) => Ok(SPHERICAL),
        (false, false) => Ok((major / minor).abs().sqrt()),
        _ => Err(Error::Calculation(format!(
            "axis ratio with exactly one zero eigenvalue (major {major}, minor {minor})"
        ))),
    }
}

pub(super) fn eccentricity(mask: &ObjectMask, session: &FeatureSession, suppress_z: bool) -> Result<f64> {
    if is_degenerate(mask) {
        return Ok(SPHERICAL);
    }
    let moments = principal_axes(mask, session, suppress_z)?;
    let (major, minor) = leading_eigenvalues(&moments)?;
    if major == 0.0 && minor == 0.0 {
        return Ok(SPHERICAL);
    }
    eccentricity_from_eigenvalues(major, minor)
}

/// Orientation of an in-plane principal axis. Eigenvectors have no sign, so
/// the angle is folded into `[0, 180)`.
pub(super) fn axis_angle(mask: &ObjectMask, session: &FeatureSession, index: usize) -> Result<f64> {
    if is_degenerate(mask) {
        return Ok(0.0);
    }
    let moments = principal_axes(mask, session, true)?;
    let axis = moments
        .get(index)
        .ok_or_else(|| Error::invalid("index", format!("axis {index} of {}", moments.len())))?;
    let degrees = axis.eigenvector.y.atan2(axis.eigenvector.x).to_degrees();
    Ok(degrees.rem_euclid(180.0))
}
