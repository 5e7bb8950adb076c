/// The byte values that mean "on" and "off" in a binary voxel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct BinaryValues {
    pub on: u8,
    pub off: u8,
}

impl BinaryValues {
    /// # Panics
    /// If `on == off`.
    pub fn new(on: u8, off: u8) -> Self {
        assert_ne!(on, off, "on and off values must differ");
        Self { on, off }
    }

    /// Swapped on/off.
    #[inline]
    pub fn inverted(&self) -> Self {
        Self {
            on: self.off,
            off: self.on,
        }
    }

    #[inline]
    pub fn value(&self, on: bool) -> u8 {
        if on {
            self.on
        } else {
            self.off
        }
    }
}

impl Default for BinaryValues {
    fn default() -> Self {
        Self { on: 255, off: 0 }
    }
}
