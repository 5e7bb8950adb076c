use std::fmt;

use glam::IVec3;

/// Size of a voxel volume along x, y and z. All components are non-negative.
///
/// Voxels are addressed plane by plane: `offset_xy(x, y) = y * size_x + x`
/// within a z-plane, and `z` selects the plane.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "IVec3", into = "IVec3")]
pub struct Extent {
    size: IVec3,
}

impl Extent {
    #[inline]
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self::from_ivec(IVec3::new(x, y, z))
    }

    /// # Panics
    /// If any component is negative.
    #[inline]
    pub fn from_ivec(size: IVec3) -> Self {
        assert!(
            size.cmpge(IVec3::ZERO).all(),
            "extent components must be non-negative, got {size}"
        );
        Self { size }
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.size.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.size.y
    }

    #[inline]
    pub fn z(&self) -> i32 {
        self.size.z
    }

    #[inline]
    pub fn as_ivec(&self) -> IVec3 {
        self.size
    }

    /// Voxels in one z-plane.
    #[inline]
    pub fn area_xy(&self) -> usize {
        self.size.x as usize * self.size.y as usize
    }

    #[inline]
    pub fn volume(&self) -> usize {
        self.area_xy() * self.size.z as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.volume() == 0
    }

    #[inline]
    pub fn offset_xy(&self, x: i32, y: i32) -> usize {
        debug_assert!(self.contains_xy(x, y));
        y as usize * self.size.x as usize + x as usize
    }

    /// Linear offset over the whole volume (plane-major).
    #[inline]
    pub fn offset(&self, point: IVec3) -> usize {
        point.z as usize * self.area_xy() + self.offset_xy(point.x, point.y)
    }

    /// Inverse of [`Extent::offset_xy`].
    #[inline]
    pub fn point_xy(&self, offset: usize, z: i32) -> IVec3 {
        let width = self.size.x as usize;
        IVec3::new((offset % width) as i32, (offset / width) as i32, z)
    }

    #[inline]
    pub fn contains_xy(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.size.x && y < self.size.y
    }

    #[inline]
    pub fn contains(&self, point: IVec3) -> bool {
        point.cmpge(IVec3::ZERO).all() && point.cmplt(self.size).all()
    }

    /// Same x/y size with a single z-plane.
    #[inline]
    pub fn flatten_z(&self) -> Self {
        self.with_z(1)
    }

    #[inline]
    pub fn with_z(&self, z: i32) -> Self {
        Self::new(self.size.x, self.size.y, z)
    }

    /// Add `by` voxels on both sides of every axis.
    #[inline]
    pub fn grow(&self, by: IVec3) -> Self {
        Self::from_ivec((self.size + by * 2).max(IVec3::ZERO))
    }
}

impl From<Extent> for IVec3 {
    fn from(extent: Extent) -> Self {
        extent.size
    }
}

impl TryFrom<IVec3> for Extent {
    type Error = String;

    fn try_from(size: IVec3) -> Result<Self, Self::Error> {
        if size.cmpge(IVec3::ZERO).all() {
            Ok(Self { size })
        } else {
            Err(format!("extent components must be non-negative, got {size}"))
        }
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.size.x, self.size.y, self.size.z)
    }
}
