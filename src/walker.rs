//! Discrete random walker leaving a trail of colored markers.

use std::collections::VecDeque;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::SimError;
use crate::params::ScheduleParams;

/// The six axis-aligned step directions
const DIRECTIONS: [Vec3; 6] = [
    Vec3::X,
    Vec3::NEG_X,
    Vec3::Y,
    Vec3::NEG_Y,
    Vec3::Z,
    Vec3::NEG_Z,
];

/// Persistent visual left at each position the walker reaches
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    pub position: Vec3,
    pub color: [f32; 3],
}

impl Marker {
    /// Marker colored by its own coordinates, clamped per channel to [0, 1]
    pub fn at(position: Vec3) -> Self {
        let color = position.clamp(Vec3::ZERO, Vec3::ONE);
        Self {
            position,
            color: color.to_array(),
        }
    }
}

/// Unbounded random walk on a half-unit lattice
///
/// Position is never bounded. The trail is a ring buffer: once `capacity`
/// markers exist the oldest is dropped for each new one.
#[derive(Debug, Clone)]
pub struct Walker {
    position: Vec3,
    step: f32,
    rng: StdRng,
    trail: VecDeque<Marker>,
    capacity: usize,
    spawned: u64,
}

impl Walker {
    pub fn new(params: &ScheduleParams) -> Result<Self, SimError> {
        if params.trail_capacity == 0 {
            return Err(SimError::InvalidTrailCapacity);
        }
        Ok(Self {
            position: params.walker_origin,
            step: params.walker_step,
            rng: StdRng::seed_from_u64(params.walker_seed),
            trail: VecDeque::with_capacity(params.trail_capacity.min(1024)),
            capacity: params.trail_capacity,
            spawned: 0,
        })
    }

    /// Move one step along a uniformly chosen axis direction and drop a marker
    pub fn step(&mut self) -> Marker {
        let direction = DIRECTIONS[self.rng.gen_range(0..DIRECTIONS.len())];
        self.position += direction * self.step;

        let marker = Marker::at(self.position);
        if self.trail.len() == self.capacity {
            self.trail.pop_front();
        }
        self.trail.push_back(marker);
        self.spawned += 1;

        log::trace!("Walker stepped to {:?}", self.position);
        marker
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Markers currently kept, oldest first
    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.trail.iter()
    }

    pub fn marker_count(&self) -> usize {
        self.trail.len()
    }

    /// Markers spawned over the walker's lifetime, including evicted ones
    pub fn markers_spawned(&self) -> u64 {
        self.spawned
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
