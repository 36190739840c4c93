//! Gain mapping, voice tuning and drone configuration.

use crate::error::SimError;

/// Height → loudness mapping applied once per column per tick
///
/// Formula: `db(clamp(map(height, [-amp.y / divisor, amp.y], [-1, 1]), min, max))`
#[derive(Debug, Clone)]
pub struct GainMapping {
    /// Lower source bound is `-amplitude.y / lower_bound_divisor`
    /// (10 keeps most of the trough silent)
    pub lower_bound_divisor: f32,

    /// Clamp floor applied after normalization (0 silences negative excursions)
    pub clamp_min: f32,

    /// Clamp ceiling; above 1.0 so noise spikes can boost past 0 dB
    pub clamp_max: f32,

    /// Volume ramp duration (seconds)
    pub ramp_duration_s: f32,

    /// Level reported for a non-positive linear gain (dB)
    pub silence_floor_db: f32,
}

impl Default for GainMapping {
    fn default() -> Self {
        Self {
            lower_bound_divisor: 10.0,
            clamp_min: 0.0,
            clamp_max: 3.0,
            ramp_duration_s: 0.01,
            silence_floor_db: -100.0,
        }
    }
}

impl GainMapping {
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.lower_bound_divisor.is_finite() || self.lower_bound_divisor <= 0.0 {
            return Err(SimError::InvalidGainMapping(format!(
                "lower_bound_divisor must be finite and positive, got {}",
                self.lower_bound_divisor
            )));
        }
        if !(self.clamp_min <= self.clamp_max) {
            return Err(SimError::InvalidGainMapping(format!(
                "clamp range is empty: [{}, {}]",
                self.clamp_min, self.clamp_max
            )));
        }
        if !self.ramp_duration_s.is_finite() || self.ramp_duration_s < 0.0 {
            return Err(SimError::InvalidGainMapping(format!(
                "ramp duration must be >= 0, got {}",
                self.ramp_duration_s
            )));
        }
        if !self.silence_floor_db.is_finite() {
            return Err(SimError::InvalidGainMapping(
                "silence floor must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Per-column voice tuning
#[derive(Debug, Clone)]
pub struct VoiceParams {
    /// Scale degrees (semitones), cycled by `column % len`
    pub scale: Vec<i32>,

    /// MIDI note of column 0 (36 = C2)
    pub base_midi_note: i32,

    /// Columns per octave step (octave = column / this)
    pub columns_per_octave: usize,

    /// Upper bound of the random detune added to each voice (Hz)
    pub detune_max_hz: f32,

    /// Seed for the detune draw
    pub seed: u64,

    /// Linear level of one voice at 0 dB in the output mix
    pub mix_level: f32,
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self {
            scale: vec![0, 4, 7, 11, 14],
            base_midi_note: 36,
            columns_per_octave: 12,
            detune_max_hz: 1.0,
            seed: 0x766f_6963,
            mix_level: 0.02,
        }
    }
}

impl VoiceParams {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.scale.is_empty() {
            return Err(SimError::EmptyScale);
        }
        if self.columns_per_octave == 0 {
            return Err(SimError::InvalidVoiceTuning(
                "columns_per_octave must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sustained drone tone started alongside the column voices
#[derive(Debug, Clone)]
pub struct DroneParams {
    pub enabled: bool,

    /// Square wave frequency (Hz)
    pub frequency_hz: f32,

    /// Low-pass cutoff (Hz)
    pub cutoff_hz: f32,

    /// Low-pass resonance
    pub q: f32,

    /// Fade-in time (seconds)
    pub attack_s: f32,

    /// Output level (linear)
    pub level: f32,
}

impl Default for DroneParams {
    fn default() -> Self {
        Self {
            enabled: true,
            frequency_hz: 70.0,
            cutoff_hz: 20000.0,
            q: 4.0,
            attack_s: 3.0,
            level: 0.05,
        }
    }
}

/// Audio constants (compile-time, match Glicol engine setup)
pub mod audio_constants {
    /// Audio block size (samples per buffer)
    /// 128 = 2.9ms @ 44.1kHz
    pub const BLOCK_SIZE: usize = 128;

    /// Hard output limit (linear), protects ears and speakers
    pub const OUTPUT_LIMIT: f32 = 0.5;
}
