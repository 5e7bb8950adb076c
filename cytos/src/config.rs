//! Configuration types for the mask operations.
//!
//! Each operation takes a flat struct with public fields. `validate()` performs
//! the checks that do not depend on the input mask; `validate_for()` adds the
//! check that the mask lies inside the containing extent. Operations call
//! `validate_for()` before touching any voxel.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{BoundingBox, Extent};
use crate::morphology::AcceptCondition;
use crate::neighborhood::Connectivity;

fn require_extent_unless_outside_on(
    operation: &'static str,
    outside_treated_as_on: bool,
    containing_extent: &Option<Extent>,
) -> Result<()> {
    if !outside_treated_as_on && containing_extent.is_none() {
        return Err(Error::MissingContainingExtent { operation });
    }
    Ok(())
}

fn require_inside(bbox: &BoundingBox, containing_extent: &Option<Extent>) -> Result<()> {
    match containing_extent {
        Some(extent) if !bbox.inside_extent(extent) => Err(Error::MaskOutsideExtent {
            bbox: *bbox,
            extent: *extent,
        }),
        _ => Ok(()),
    }
}

// ============================================================================
// Morphology
// ============================================================================

/// Parameters for [`crate::morphology::dilate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DilateConfig {
    pub iterations: u32,
    /// Grow along z as well as in-plane.
    pub use_3d: bool,
    /// 8-connectivity (2D) or 26-connectivity (3D) instead of 4/6.
    pub big_neighborhood: bool,
    /// The grown box is clipped to this volume.
    pub containing_extent: Option<Extent>,
    /// Checked after every iteration; a failed check reverts it and stops.
    pub accept: Vec<AcceptCondition>,
}

impl Default for DilateConfig {
    fn default() -> Self {
        Self {
            iterations: 1,
            use_3d: false,
            big_neighborhood: false,
            containing_extent: None,
            accept: Vec::new(),
        }
    }
}

impl DilateConfig {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }

    #[inline]
    pub fn connectivity(&self) -> Connectivity {
        Connectivity::new(self.use_3d, self.big_neighborhood)
    }

    pub fn validate(&self) -> Result<()> {
        Ok(())
    }

    pub fn validate_for(&self, bbox: &BoundingBox) -> Result<()> {
        self.validate()?;
        require_inside(bbox, &self.containing_extent)
    }
}

/// Parameters for [`crate::morphology::erode`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ErodeConfig {
    pub iterations: u32,
    pub use_3d: bool,
    pub big_neighborhood: bool,
    /// Neighbors beyond the containing extent count as on, so voxels touching
    /// the image border do not erode from that side. When false, a containing
    /// extent is required.
    pub outside_treated_as_on: bool,
    pub containing_extent: Option<Extent>,
    pub accept: Vec<AcceptCondition>,
}

impl Default for ErodeConfig {
    fn default() -> Self {
        Self {
            iterations: 1,
            use_3d: false,
            big_neighborhood: false,
            outside_treated_as_on: true,
            containing_extent: None,
            accept: Vec::new(),
        }
    }
}

impl ErodeConfig {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }

    #[inline]
    pub fn connectivity(&self) -> Connectivity {
        Connectivity::new(self.use_3d, self.big_neighborhood)
    }

    pub fn validate(&self) -> Result<()> {
        require_extent_unless_outside_on(
            "Erode",
            self.outside_treated_as_on,
            &self.containing_extent,
        )
    }

    pub fn validate_for(&self, bbox: &BoundingBox) -> Result<()> {
        self.validate()?;
        require_inside(bbox, &self.containing_extent)
    }
}

/// Parameters shared by closing (dilate then erode) and opening (erode then dilate).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CloseConfig {
    pub iterations: u32,
    pub use_3d: bool,
    pub big_neighborhood: bool,
    pub outside_treated_as_on: bool,
    pub containing_extent: Option<Extent>,
}

impl Default for CloseConfig {
    fn default() -> Self {
        Self {
            iterations: 1,
            use_3d: false,
            big_neighborhood: false,
            outside_treated_as_on: true,
            containing_extent: None,
        }
    }
}

impl CloseConfig {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }

    pub fn dilate_config(&self) -> DilateConfig {
        DilateConfig {
            iterations: self.iterations,
            use_3d: self.use_3d,
            big_neighborhood: self.big_neighborhood,
            containing_extent: self.containing_extent,
            accept: Vec::new(),
        }
    }

    pub fn erode_config(&self) -> ErodeConfig {
        ErodeConfig {
            iterations: self.iterations,
            use_3d: self.use_3d,
            big_neighborhood: self.big_neighborhood,
            outside_treated_as_on: self.outside_treated_as_on,
            containing_extent: self.containing_extent,
            accept: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_extent_unless_outside_on(
            "Close",
            self.outside_treated_as_on,
            &self.containing_extent,
        )
    }

    pub fn validate_for(&self, bbox: &BoundingBox) -> Result<()> {
        self.validate()?;
        require_inside(bbox, &self.containing_extent)
    }
}

/// Parameters for [`crate::morphology::shell`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub dilation_iterations: u32,
    pub erosion_iterations: u32,
    pub use_3d: bool,
    pub big_neighborhood: bool,
    /// Keep only the part of the shell outside the original object.
    pub inverse: bool,
    pub outside_treated_as_on: bool,
    pub containing_extent: Option<Extent>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            dilation_iterations: 1,
            erosion_iterations: 0,
            use_3d: false,
            big_neighborhood: false,
            inverse: false,
            outside_treated_as_on: true,
            containing_extent: None,
        }
    }
}

impl ShellConfig {
    pub fn new(dilation_iterations: u32, erosion_iterations: u32) -> Self {
        Self {
            dilation_iterations,
            erosion_iterations,
            ..Self::default()
        }
    }

    pub fn dilate_config(&self) -> DilateConfig {
        DilateConfig {
            iterations: self.dilation_iterations,
            use_3d: self.use_3d,
            big_neighborhood: self.big_neighborhood,
            containing_extent: self.containing_extent,
            accept: Vec::new(),
        }
    }

    pub fn erode_config(&self) -> ErodeConfig {
        ErodeConfig {
            iterations: self.erosion_iterations,
            use_3d: self.use_3d,
            big_neighborhood: self.big_neighborhood,
            outside_treated_as_on: self.outside_treated_as_on,
            containing_extent: self.containing_extent,
            accept: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.dilation_iterations == 0 && self.erosion_iterations == 0 {
            return Err(Error::NoShellIterations);
        }
        require_extent_unless_outside_on(
            "Shell",
            self.outside_treated_as_on,
            &self.containing_extent,
        )
    }

    pub fn validate_for(&self, bbox: &BoundingBox) -> Result<()> {
        self.validate()?;
        require_inside(bbox, &self.containing_extent)
    }
}

// ============================================================================
// Outline and surface
// ============================================================================

/// Parameters for [`crate::outline::outline`] and border-voxel counting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    pub use_3d: bool,
    pub big_neighborhood: bool,
    /// Voxels touching the containing-extent border are not outline from
    /// that side. When false, a containing extent is required.
    pub outside_treated_as_on: bool,
    pub containing_extent: Option<Extent>,
    /// Collapse to the maximum projection before extracting the outline.
    pub mip: bool,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            use_3d: false,
            big_neighborhood: false,
            outside_treated_as_on: true,
            containing_extent: None,
            mip: false,
        }
    }
}

impl OutlineConfig {
    #[inline]
    pub fn connectivity(&self) -> Connectivity {
        Connectivity::new(self.use_3d && !self.mip, self.big_neighborhood)
    }

    pub fn validate(&self) -> Result<()> {
        require_extent_unless_outside_on(
            "Outline",
            self.outside_treated_as_on,
            &self.containing_extent,
        )
    }

    pub fn validate_for(&self, bbox: &BoundingBox) -> Result<()> {
        self.validate()?;
        require_inside(bbox, &self.containing_extent)
    }
}

/// Parameters for [`crate::outline::count_surface_faces`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Collapse to the maximum projection first.
    pub mip: bool,
    /// Ignore the faces pointing along z.
    pub suppress_3d: bool,
}

// ============================================================================
// Labeling
// ============================================================================

/// Parameters for [`crate::labeling::label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// One pass over the whole volume. When false each z-plane is labeled on its own.
    pub use_3d: bool,
    pub big_neighborhood: bool,
    /// Components smaller than this are dropped.
    pub min_voxel_count: usize,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            use_3d: true,
            big_neighborhood: false,
            min_voxel_count: 1,
        }
    }
}

impl LabelConfig {
    #[inline]
    pub fn connectivity(&self) -> Connectivity {
        Connectivity::new(self.use_3d, self.big_neighborhood)
    }
}
