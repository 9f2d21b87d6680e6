//! Island heightfield generation library
//!
//! Builds a bounded island-with-mountains heightmap by masking multi-octave
//! coherent noise with radial polygon distance fields. The output is an
//! in-memory grid of heights; mesh building and interactive rendering are
//! left to consumers.

pub mod export;
pub mod grid;
pub mod noise;
pub mod shape;
pub mod terrain;
