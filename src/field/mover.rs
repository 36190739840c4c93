//! Single grid-cell body with combined periodic and noise motion.

use std::fmt;

use glam::{DVec3, Vec3};

use crate::noise::NoiseSource;
use crate::params::MotionParams;

/// Grid coordinates identifying a mover
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MoverId {
    pub column: usize,
    pub row: usize,
}

/// Simulated body bobbing vertically at a fixed (x, z)
pub struct Mover {
    id: MoverId,
    position: Vec3,
    phase: DVec3,
    velocity: DVec3,
    amplitude: Vec3,
    noise_gain: f32,
    noise: Box<dyn NoiseSource>,
}

impl Mover {
    /// Create a mover at its grid cell, at rest (y = 0)
    pub fn new(id: MoverId, params: &MotionParams, noise: Box<dyn NoiseSource>) -> Self {
        let position = Vec3::new(
            id.column as f32 + params.origin_x,
            0.0,
            id.row as f32 + params.origin_z,
        );
        let phase = DVec3::new(0.0, id.column as f64 * params.phase_offset_per_column, 0.0);

        Self {
            id,
            position,
            phase,
            velocity: params.velocity,
            amplitude: params.amplitude,
            noise_gain: params.noise_gain,
            noise,
        }
    }

    /// Advance one tick and return the new height
    ///
    /// Noise is sampled at the phase *before* it advances; the sine uses the
    /// advanced phase.
    pub fn update(&mut self) -> f32 {
        let sample = self.noise.sample_2d(self.phase.y, self.amplitude.y as f64);
        // Non-finite samples count as zero
        let sample = if sample.is_finite() { sample } else { 0.0 };
        let perturbation = sample * self.noise_gain;

        self.phase += self.velocity;
        self.position.y = (self.phase.y.sin() * self.amplitude.y as f64) as f32 + perturbation;
        self.position.y
    }

    pub fn id(&self) -> MoverId {
        self.id
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn height(&self) -> f32 {
        self.position.y
    }

    pub fn phase(&self) -> DVec3 {
        self.phase
    }

    pub fn amplitude(&self) -> Vec3 {
        self.amplitude
    }
}

impl fmt::Debug for Mover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mover")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("phase", &self.phase)
            .field("amplitude", &self.amplitude)
            .finish_non_exhaustive()
    }
}
