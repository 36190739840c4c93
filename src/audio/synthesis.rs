//! Voice oscillators and the glicol drone bed.

use glicol::Engine;

use crate::error::SimError;
use crate::params::{audio_constants::BLOCK_SIZE, DroneParams};

/// Convert dB to a linear amplitude ratio
pub fn db_to_gain(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Glicol composition for the drone (procedural music code)
///
/// A square wave through a resonant low-pass; the fade-in is applied by [`DroneBed`].
pub fn drone_composition(params: &DroneParams) -> String {
    format!(
        "o: squ {:.3} >> lpf {:.1} {:.2} >> mul {:.4}\n",
        params.frequency_hz, params.cutoff_hz, params.q, params.level
    )
}

/// One sustained sawtooth with a linear gain ramp
#[derive(Debug, Clone, Default)]
struct Oscillator {
    freq_hz: f32,
    phase: f32,
    active: bool,
    gain: f32,
    target: f32,
    step: f32,
    remaining: u32,
}

impl Oscillator {
    fn next_sample(&mut self, sample_rate: f32) -> f32 {
        if !self.active {
            return 0.0;
        }
        if self.remaining > 0 {
            self.gain += self.step;
            self.remaining -= 1;
            if self.remaining == 0 {
                self.gain = self.target;
            }
        }

        let out = 2.0 * self.phase - 1.0;
        self.phase += self.freq_hz / sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        out * self.gain
    }
}

/// Bank of column oscillators mixed to mono
///
/// Shared with the audio callback; the simulation thread only sets targets.
#[derive(Debug, Clone)]
pub struct VoiceMixer {
    oscillators: Vec<Oscillator>,
    sample_rate: f32,
    mix_level: f32,
}

impl VoiceMixer {
    pub fn new(voice_count: usize, sample_rate: f32, mix_level: f32) -> Self {
        Self {
            oscillators: vec![Oscillator::default(); voice_count],
            sample_rate,
            mix_level,
        }
    }

    pub fn voice_count(&self) -> usize {
        self.oscillators.len()
    }

    /// Start a voice; silent until its first ramp
    pub fn trigger(&mut self, voice: usize, freq_hz: f32) -> Result<(), SimError> {
        let count = self.oscillators.len();
        let osc = self
            .oscillators
            .get_mut(voice)
            .ok_or(SimError::VoiceOutOfRange { voice, count })?;
        osc.freq_hz = freq_hz;
        osc.active = true;
        Ok(())
    }

    /// Schedule a linear gain ramp from the current gain to `target_db`
    pub fn ramp_to_db(&mut self, voice: usize, target_db: f32, duration_s: f32) {
        let Some(osc) = self.oscillators.get_mut(voice) else {
            return;
        };
        let target = db_to_gain(target_db);
        let samples = (duration_s.max(0.0) * self.sample_rate).round() as u32;

        osc.target = target;
        if samples == 0 {
            osc.gain = target;
            osc.remaining = 0;
        } else {
            osc.step = (target - osc.gain) / samples as f32;
            osc.remaining = samples;
        }
    }

    /// Current linear gain of a voice
    pub fn gain(&self, voice: usize) -> Option<f32> {
        self.oscillators.get(voice).map(|osc| osc.gain)
    }

    /// Next mixed mono sample
    pub fn next_sample(&mut self) -> f32 {
        let sample_rate = self.sample_rate;
        let sum: f32 = self
            .oscillators
            .iter_mut()
            .map(|osc| osc.next_sample(sample_rate))
            .sum();
        sum * self.mix_level
    }
}

/// Glicol-rendered drone with a linear fade-in
pub struct DroneBed {
    engine: Engine<BLOCK_SIZE>,
    block: [f32; BLOCK_SIZE],
    cursor: usize,
    elapsed_samples: u64,
    attack_samples: u64,
}

impl DroneBed {
    pub fn new(params: &DroneParams, sample_rate_hz: usize) -> Result<Self, SimError> {
        let mut engine = Engine::<BLOCK_SIZE>::new();
        engine.set_sr(sample_rate_hz);
        engine.update_with_code(&drone_composition(params));
        engine
            .update()
            .map_err(|e| SimError::Audio(format!("Glicol engine init failed: {:?}", e)))?;

        Ok(Self {
            engine,
            block: [0.0; BLOCK_SIZE],
            cursor: BLOCK_SIZE,
            elapsed_samples: 0,
            attack_samples: (params.attack_s.max(0.0) * sample_rate_hz as f32) as u64,
        })
    }

    /// Next drone sample, pulling a new block from glicol when needed
    pub fn next_sample(&mut self) -> f32 {
        if self.cursor >= BLOCK_SIZE {
            let (buffers, _) = self.engine.next_block(vec![]);
            for (i, slot) in self.block.iter_mut().enumerate() {
                *slot = buffers[0][i];
            }
            self.cursor = 0;
        }

        let sample = self.block[self.cursor];
        self.cursor += 1;

        let fade = if self.attack_samples == 0 {
            1.0
        } else {
            (self.elapsed_samples as f32 / self.attack_samples as f32).min(1.0)
        };
        self.elapsed_samples = self.elapsed_samples.saturating_add(1);
        sample * fade
    }
}
