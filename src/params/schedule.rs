//! Fixed-step gate and walker parameters.

use glam::Vec3;

use crate::error::SimError;

/// Fixed-timestep subsystem configuration
#[derive(Debug, Clone)]
pub struct ScheduleParams {
    /// Interval between discrete steps (seconds)
    pub step_interval_s: f32,

    /// Attach the random walker to the fixed-step gate
    pub walker_enabled: bool,

    /// Walker start position (grid units)
    pub walker_origin: Vec3,

    /// Distance moved along one axis per step (grid units)
    pub walker_step: f32,

    /// Seed for the walker's direction choices
    pub walker_seed: u64,

    /// Maximum markers kept in the walker trail (oldest evicted first)
    pub trail_capacity: usize,
}

impl Default for ScheduleParams {
    fn default() -> Self {
        Self {
            step_interval_s: 0.5,
            walker_enabled: false,
            walker_origin: Vec3::ZERO,
            walker_step: 0.5,
            walker_seed: 0x7761_6c6b,
            trail_capacity: 4096,
        }
    }
}

impl ScheduleParams {
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.step_interval_s.is_finite() || self.step_interval_s <= 0.0 {
            return Err(SimError::InvalidInterval(self.step_interval_s));
        }
        if self.walker_enabled && self.trail_capacity == 0 {
            return Err(SimError::InvalidTrailCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_interval_rejected() {
        let params = ScheduleParams {
            step_interval_s: 0.0,
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(SimError::InvalidInterval(0.0)));
    }

    #[test]
    fn test_zero_capacity_only_matters_with_walker() {
        let mut params = ScheduleParams {
            trail_capacity: 0,
            ..Default::default()
        };
        assert!(params.validate().is_ok());

        params.walker_enabled = true;
        assert_eq!(params.validate(), Err(SimError::InvalidTrailCapacity));
    }
}
