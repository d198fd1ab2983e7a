//! # pointmorph Algorithms
//!
//! The morph engine: cyclic point correspondence between clouds of different
//! sizes and fixed-step linear interpolation of the working vertex buffer.

pub mod morph;

// Re-export commonly used items
pub use morph::*;
