//! Height → column loudness mapping.

use super::voice::VoiceBank;
use crate::field::MotionField;
use crate::params::GainMapping;

/// Linearly remap `x` from `[a1, a2]` to `[b1, b2]` (no clamping)
pub fn map_linear(x: f32, a1: f32, a2: f32, b1: f32, b2: f32) -> f32 {
    b1 + (x - a1) * (b2 - b1) / (a2 - a1)
}

/// Convert a linear amplitude to dB (20*log10), flooring non-positive input
pub fn gain_to_db(gain: f32, silence_floor_db: f32) -> f32 {
    if !(gain > 0.0) {
        return silence_floor_db;
    }
    (20.0 * gain.log10()).max(silence_floor_db)
}

/// Maps each column's representative mover height onto its voice volume
#[derive(Debug, Clone, Default)]
pub struct AudioParameterMapper {
    mapping: GainMapping,
}

impl AudioParameterMapper {
    pub fn new(mapping: GainMapping) -> Self {
        Self { mapping }
    }

    pub fn mapping(&self) -> &GainMapping {
        &self.mapping
    }

    /// Normalized, clamped linear gain for a height
    ///
    /// Returns the clamp floor when the source span is degenerate.
    pub fn linear_gain(&self, height: f32, amplitude_y: f32) -> f32 {
        let low = -amplitude_y / self.mapping.lower_bound_divisor;
        let high = amplitude_y;
        if !(high - low > 0.0) || !height.is_finite() {
            return self.mapping.clamp_min;
        }

        let normalized = map_linear(height, low, high, -1.0, 1.0);
        normalized.clamp(self.mapping.clamp_min, self.mapping.clamp_max)
    }

    /// Target volume (dB) for a height, always finite
    pub fn gain_db(&self, height: f32, amplitude_y: f32) -> f32 {
        gain_to_db(
            self.linear_gain(height, amplitude_y),
            self.mapping.silence_floor_db,
        )
    }

    /// Ramp every column's voice toward the level of its row-0 mover
    ///
    /// Must run after the field update of the same tick. Returns the number
    /// of voices written.
    pub fn apply(&self, field: &MotionField, voices: &mut dyn VoiceBank) -> usize {
        let count = field.columns().min(voices.voice_count());
        for column in 0..count {
            let Some(mover) = field.representative(column) else {
                continue;
            };
            let target_db = self.gain_db(mover.height(), mover.amplitude().y);
            voices.ramp_to_db(column, target_db, self.mapping.ramp_duration_s);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::HeadlessVoices;
    use crate::params::MotionParams;

    const AMP: f32 = 2.5;

    #[test]
    fn test_map_linear() {
        assert_eq!(map_linear(5.0, 0.0, 10.0, 0.0, 1.0), 0.5);
        assert_eq!(map_linear(-0.25, -0.25, 2.5, -1.0, 1.0), -1.0);
        assert_eq!(map_linear(2.5, -0.25, 2.5, -1.0, 1.0), 1.0);
    }

    #[test]
    fn test_lower_bound_maps_to_silence() {
        let mapper = AudioParameterMapper::default();
        let height = -AMP / 10.0;

        assert_eq!(mapper.linear_gain(height, AMP), 0.0);
        assert_eq!(mapper.gain_db(height, AMP), -100.0);
    }

    #[test]
    fn test_peak_maps_to_unity() {
        let mapper = AudioParameterMapper::default();
        assert_eq!(mapper.linear_gain(AMP, AMP), 1.0);
        assert_eq!(mapper.gain_db(AMP, AMP), 0.0);
    }

    #[test]
    fn test_noise_spike_clamps_at_three() {
        let mapper = AudioParameterMapper::default();

        // Normalizes to ~3.55, above the ceiling
        let gain = mapper.linear_gain(6.0, AMP);
        assert_eq!(gain, 3.0);

        let db = mapper.gain_db(6.0, AMP);
        assert!((db - 20.0 * 3.0_f32.log10()).abs() < 1e-4);
        assert!(db > 0.0);
    }

    #[test]
    fn test_moderate_spike_not_clamped_at_one() {
        let mapper = AudioParameterMapper::default();
        let gain = mapper.linear_gain(4.0, AMP);
        assert!(gain > 1.0 && gain < 3.0);
    }

    #[test]
    fn test_deep_troughs_floor_to_silence() {
        let mapper = AudioParameterMapper::default();
        for height in [-0.5, -2.5, -7.5] {
            assert_eq!(mapper.gain_db(height, AMP), -100.0);
        }
    }

    #[test]
    fn test_degenerate_amplitude_stays_finite() {
        let mapper = AudioParameterMapper::default();
        assert_eq!(mapper.gain_db(1.0, 0.0), -100.0);
        assert_eq!(mapper.gain_db(f32::NAN, AMP), -100.0);
    }

    #[test]
    fn test_gain_to_db_floors_non_positive() {
        assert_eq!(gain_to_db(0.0, -80.0), -80.0);
        assert_eq!(gain_to_db(-1.0, -80.0), -80.0);
        assert_eq!(gain_to_db(1e-9, -80.0), -80.0);
        assert!((gain_to_db(2.0, -80.0) - 6.0206).abs() < 1e-3);
    }

    #[test]
    fn test_apply_uses_row_zero_per_column() {
        let params = MotionParams {
            columns: 4,
            rows: 3,
            ..Default::default()
        };
        let mut field = MotionField::new(&params).unwrap();
        field.update();

        let mapper = AudioParameterMapper::default();
        let mut voices = HeadlessVoices::new(4);
        assert_eq!(mapper.apply(&field, &mut voices), 4);
        assert_eq!(voices.ramp_count(), 4);

        for column in 0..4 {
            let mover = field.representative(column).unwrap();
            let expected = mapper.gain_db(mover.height(), AMP);
            assert_eq!(voices.level_db(column), Some(expected));
            assert_eq!(voices.ramp_duration_s(column), Some(0.01));
        }
    }
}
