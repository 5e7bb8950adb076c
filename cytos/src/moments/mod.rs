//! Second moments of a mask's voxel point cloud.
//!
//! The covariance of the on-voxel centres is eigen-decomposed; the eigenvectors
//! are the principal axes and the eigenvalues their variances.

use glam::DVec3;
use nalgebra::{Matrix3, SymmetricEigen};

use crate::error::{Error, Result};
use crate::mask::ObjectMask;

/// Below this many on voxels shape features report the sentinel `1.0`
/// instead of decomposing a degenerate covariance.
pub const MIN_VOXELS_FOR_MOMENTS: usize = 12;

/// One principal axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EigenPair {
    /// Variance along the axis (covariance already divided by the point count).
    pub eigenvalue: f64,
    /// Unit direction.
    pub eigenvector: DVec3,
}

/// Principal axes sorted by descending eigenvalue magnitude.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentsResult {
    entries: Vec<EigenPair>,
    num_points: usize,
    centroid: DVec3,
}

impl MomentsResult {
    #[inline]
    pub fn entries(&self) -> &[EigenPair] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Mean of the voxel centres.
    #[inline]
    pub fn centroid(&self) -> DVec3 {
        self.centroid
    }

    pub fn get(&self, index: usize) -> Option<&EigenPair> {
        self.entries.get(index)
    }

    /// Length of the axis of a solid ellipsoid with the same second moments:
    /// `2 * sqrt(5 * eigenvalue)`.
    pub fn axis_length(&self, index: usize) -> Option<f64> {
        self.get(index)
            .map(|e| 2.0 * (5.0 * e.eigenvalue.max(0.0)).sqrt())
    }

    /// Drop the axis whose direction is closest to the unit z axis.
    pub fn remove_closest_to_unit_z(&mut self) -> Option<EigenPair> {
        let (index, _) = self
            .entries
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.eigenvector.z.abs().total_cmp(&b.eigenvector.z.abs()))?;
        Some(self.entries.remove(index))
    }

    /// Copy without the axis closest to z.
    pub fn without_z_axis(&self) -> MomentsResult {
        let mut out = self.clone();
        out.remove_closest_to_unit_z();
        out
    }

    /// Eccentricity from the two leading axes.
    pub fn eccentricity(&self) -> Result<f64> {
        match (self.get(0), self.get(1)) {
            (Some(major), Some(minor)) => {
                eccentricity_from_eigenvalues(major.eigenvalue, minor.eigenvalue)
            }
            _ => Err(Error::Calculation(format!(
                "eccentricity needs two axes, have {}",
                self.len()
            ))),
        }
    }
}

/// `sqrt(1 - minor / major)`.
///
/// Both eigenvalues zero and exactly one zero are distinct failures; callers
/// that want a sentinel for the both-zero case check for it first.
pub fn eccentricity_from_eigenvalues(major: f64, minor: f64) -> Result<f64> {
    match (major == 0.0, minor == 0.0) {
        (true, true) => Err(Error::Calculation(
            "both eigenvalues are zero, eccentricity is undefined".into(),
        )),
        (true, false) | (false, true) => Err(Error::Calculation(format!(
            "exactly one eigenvalue is zero (major {major}, minor {minor})"
        ))),
        (false, false) => Ok((1.0 - minor / major).max(0.0).sqrt()),
    }
}

/// Eigen-decompose the covariance of the on-voxel centres (`p + 0.5`).
///
/// With `suppress_z_covariance` the xz and yz terms are zeroed, which makes z
/// its own principal axis so it can be removed for in-plane shape analysis.
pub fn compute_second_moments(
    mask: &ObjectMask,
    suppress_z_covariance: bool,
) -> Result<MomentsResult> {
    let mut sum = DVec3::ZERO;
    let mut num_points = 0usize;
    for p in mask.on_points() {
        sum += p.as_dvec3();
        num_points += 1;
    }
    if num_points == 0 {
        return Err(Error::Calculation(
            "cannot compute moments of a mask without on voxels".into(),
        ));
    }
    let n = num_points as f64;
    let centroid = sum / n + DVec3::splat(0.5);

    let mut cov = Matrix3::<f64>::zeros();
    for p in mask.on_points() {
        let d = p.as_dvec3() + DVec3::splat(0.5) - centroid;
        let d = [d.x, d.y, d.z];
        for i in 0..3 {
            for j in i..3 {
                cov[(i, j)] += d[i] * d[j];
            }
        }
    }
    for i in 0..3 {
        for j in i..3 {
            cov[(i, j)] /= n;
            cov[(j, i)] = cov[(i, j)];
        }
    }
    if suppress_z_covariance {
        for (i, j) in [(0, 2), (2, 0), (1, 2), (2, 1)] {
            cov[(i, j)] = 0.0;
        }
    }

    let eigen = SymmetricEigen::new(cov);
    let mut entries: Vec<EigenPair> = (0..3)
        .map(|i| {
            let v = eigen.eigenvectors.column(i);
            EigenPair {
                eigenvalue: eigen.eigenvalues[i],
                eigenvector: DVec3::new(v[0], v[1], v[2]).normalize_or_zero(),
            }
        })
        .collect();
    entries.sort_by(|a, b| b.eigenvalue.abs().total_cmp(&a.eigenvalue.abs()));

    tracing::trace!(
        num_points,
        major = entries[0].eigenvalue,
        suppress_z_covariance,
        "computed second moments"
    );
    Ok(MomentsResult {
        entries,
        num_points,
        centroid,
    })
}
