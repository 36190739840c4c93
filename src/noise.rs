//! Coherent noise sampling for mover motion.
//!
//! Each mover owns its own sampler, seeded independently, so neighbouring
//! movers drift apart unless a seed is deliberately shared.

use noise::{NoiseFn, Perlin};

/// Deterministic 2D coherent-noise sampler
///
/// Coordinates are f64 so long-running phases keep their resolution. Output
/// is approximately bounded to [-1, 1]. Same inputs give the same output.
pub trait NoiseSource: Send + Sync {
    fn sample_2d(&self, x: f64, y: f64) -> f32;
}

/// Perlin noise sampler for mover motion
pub struct PerlinNoise {
    perlin: Perlin,
    seed: u32,
}

impl PerlinNoise {
    /// Create new noise sampler with seed
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl NoiseSource for PerlinNoise {
    fn sample_2d(&self, x: f64, y: f64) -> f32 {
        self.perlin.get([x, y]) as f32
    }
}
