//! Coherent noise abstraction
//!
//! Terrain compositing only needs "a smooth 2D field in [0,1]". Hiding the
//! concrete noise function behind a trait lets tests substitute deterministic
//! stubs and isolates the shape-compositing math from any particular noise
//! implementation.

use noise::{NoiseFn, Perlin};

/// A coherent 2D noise field sampled at explicit coordinates.
///
/// Implementations must return values in `[0, 1]` and be pure: the same
/// coordinates always produce the same value. `Sync` so terrain rows can be
/// evaluated in parallel.
pub trait NoiseSource: Sync {
    fn sample(&self, x: f64, y: f64) -> f32;
}

/// Perlin-backed noise source.
pub struct PerlinSource {
    perlin: Perlin,
}

impl PerlinSource {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }
}

impl NoiseSource for PerlinSource {
    fn sample(&self, x: f64, y: f64) -> f32 {
        // Perlin output is in [-1, 1]; remap to the [0, 1] range the
        // compositing formulas expect.
        (self.perlin.get([x, y]) as f32) * 0.5 + 0.5
    }
}
