//! Mover grid layout and motion parameters.

use glam::{DVec3, Vec3};

use crate::error::SimError;

/// Motion field layout and per-mover motion parameters
#[derive(Debug, Clone)]
pub struct MotionParams {
    /// Number of columns (one voice per column)
    pub columns: usize,

    /// Number of rows per column
    pub rows: usize,

    /// World X of column 0 (x = column + origin_x)
    pub origin_x: f32,

    /// World Z of row 0 (z = row + origin_z)
    pub origin_z: f32,

    /// Initial phase.y step between neighbouring columns (radians)
    pub phase_offset_per_column: f64,

    /// Phase advance per tick (radians); only `y` feeds the height
    ///
    /// Kept in f64: an f32 phase stops advancing by 0.01 past 2^18.
    pub velocity: DVec3,

    /// Oscillation amplitude (grid units), shared by every mover
    pub amplitude: Vec3,

    /// Multiplier applied to each coherent-noise sample
    pub noise_gain: f32,

    /// Master seed used to derive one noise seed per mover
    pub seed: u64,

    /// When set, every mover samples the same noise field
    pub shared_noise_seed: Option<u32>,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            columns: 36,
            rows: 18,
            origin_x: -10.0,
            origin_z: -5.0,
            phase_offset_per_column: 0.25,
            velocity: DVec3::new(0.1, 0.01, 0.01),
            amplitude: Vec3::new(0.5, 2.5, 0.5),
            noise_gain: 5.0,
            seed: 0x6d6f_7665,
            shared_noise_seed: None,
        }
    }
}

impl MotionParams {
    /// Total mover count (columns × rows)
    pub fn mover_count(&self) -> usize {
        self.columns * self.rows
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(SimError::InvalidGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        // The gain mapping spans [-amp.y / divisor, amp.y]; non-positive amp.y leaves it empty
        if !self.amplitude.y.is_finite() || self.amplitude.y <= 0.0 {
            return Err(SimError::InvalidAmplitude(self.amplitude.y));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_is_36_by_18() {
        let params = MotionParams::default();
        assert_eq!(params.mover_count(), 648);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_grid() {
        let params = MotionParams {
            rows: 0,
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(SimError::InvalidGrid {
                columns: 36,
                rows: 0
            })
        );
    }

    #[test]
    fn test_rejects_zero_vertical_amplitude() {
        let params = MotionParams {
            amplitude: Vec3::new(0.5, 0.0, 0.5),
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(SimError::InvalidAmplitude(0.0)));
    }

    #[test]
    fn test_rejects_negative_vertical_amplitude() {
        let params = MotionParams {
            amplitude: Vec3::new(0.5, -2.5, 0.5),
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(SimError::InvalidAmplitude(-2.5)));
    }
}
