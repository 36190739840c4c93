//! Voice capability and per-column tuning.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::SimError;
use crate::params::VoiceParams;

/// Audio capability consumed by the simulation core
///
/// One sustained voice per column. Voices are triggered once and afterwards
/// only their volume moves.
pub trait VoiceBank {
    fn voice_count(&self) -> usize;

    /// Start a voice at a fixed frequency
    fn trigger(&mut self, voice: usize, freq_hz: f32) -> Result<(), SimError>;

    /// Ramp a voice's volume toward `target_db` over `duration_s`
    ///
    /// Out-of-range voices are ignored.
    fn ramp_to_db(&mut self, voice: usize, target_db: f32, duration_s: f32);
}

/// Convert MIDI note number to frequency (A4 = 69 = 440 Hz)
pub fn midi_to_hz(note: f32) -> f32 {
    440.0 * 2.0_f32.powf((note - 69.0) / 12.0)
}

/// Compute each column's voice frequency
///
/// note = base + scale[column % len] + 12 * (column / columns_per_octave),
/// plus a seeded detune in `[0, detune_max_hz)`.
pub fn plan_frequencies(params: &VoiceParams, columns: usize) -> Result<Vec<f32>, SimError> {
    params.validate()?;

    let mut rng = StdRng::seed_from_u64(params.seed);
    let frequencies = (0..columns)
        .map(|column| {
            let octave = (column / params.columns_per_octave) as i32;
            let degree = params.scale[column % params.scale.len()];
            let note = params.base_midi_note + degree + octave * 12;
            let detune = if params.detune_max_hz > 0.0 {
                rng.gen::<f32>() * params.detune_max_hz
            } else {
                0.0
            };
            midi_to_hz(note as f32) + detune
        })
        .collect();

    Ok(frequencies)
}

/// Voice bank without an audio device
///
/// Keeps the last requested state of every voice. Used by headless runs and tests.
#[derive(Debug, Clone)]
pub struct HeadlessVoices {
    frequencies: Vec<Option<f32>>,
    levels_db: Vec<Option<f32>>,
    ramp_durations_s: Vec<Option<f32>>,
    ramps: usize,
}

impl HeadlessVoices {
    pub fn new(voice_count: usize) -> Self {
        Self {
            frequencies: vec![None; voice_count],
            levels_db: vec![None; voice_count],
            ramp_durations_s: vec![None; voice_count],
            ramps: 0,
        }
    }

    pub fn frequency(&self, voice: usize) -> Option<f32> {
        self.frequencies.get(voice).copied().flatten()
    }

    /// Last ramp target for a voice
    pub fn level_db(&self, voice: usize) -> Option<f32> {
        self.levels_db.get(voice).copied().flatten()
    }

    /// Duration of the last ramp requested for a voice
    pub fn ramp_duration_s(&self, voice: usize) -> Option<f32> {
        self.ramp_durations_s.get(voice).copied().flatten()
    }

    /// Total ramp requests received
    pub fn ramp_count(&self) -> usize {
        self.ramps
    }
}

impl VoiceBank for HeadlessVoices {
    fn voice_count(&self) -> usize {
        self.frequencies.len()
    }

    fn trigger(&mut self, voice: usize, freq_hz: f32) -> Result<(), SimError> {
        let count = self.frequencies.len();
        let slot = self
            .frequencies
            .get_mut(voice)
            .ok_or(SimError::VoiceOutOfRange { voice, count })?;
        *slot = Some(freq_hz);
        Ok(())
    }

    fn ramp_to_db(&mut self, voice: usize, target_db: f32, duration_s: f32) {
        let (Some(level), Some(duration)) = (
            self.levels_db.get_mut(voice),
            self.ramp_durations_s.get_mut(voice),
        ) else {
            return;
        };
        *level = Some(target_db);
        *duration = Some(duration_s);
        self.ramps += 1;
    }
}
