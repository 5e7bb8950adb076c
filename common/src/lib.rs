//! Utilities shared by the workspace crates.

pub mod fnv;
pub mod log_setup;
pub mod parallel;

pub use fnv::{FnvBuildHasher, FnvHasher};
