//! Audio output system: column voices, drone bed and optional WAV capture.

use std::fs::File;
use std::io::BufWriter;
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use super::synthesis::{DroneBed, VoiceMixer};
use super::voice::VoiceBank;
use crate::error::SimError;
use crate::params::{audio_constants::OUTPUT_LIMIT, DroneParams, RecordingConfig, VoiceParams};

type WavWriter = hound::WavWriter<BufWriter<File>>;

/// WAV capture that stops itself after a fixed number of frames
struct Capture {
    writer: Option<WavWriter>,
    frames_left: usize,
}

impl Capture {
    fn write_frame(&mut self, left: f32, right: f32) {
        let Some(writer) = self.writer.as_mut() else {
            return;
        };
        if writer.write_sample(left).is_err() || writer.write_sample(right).is_err() {
            log::error!("WAV write failed, stopping capture");
            self.writer = None;
            return;
        }
        self.frames_left = self.frames_left.saturating_sub(1);
        if self.frames_left == 0 {
            if let Some(writer) = self.writer.take() {
                match writer.finalize() {
                    Ok(()) => log::info!("Recording finished"),
                    Err(e) => log::error!("Failed to finalize WAV: {}", e),
                }
            }
        }
    }
}

/// Audio system owning the output stream
///
/// Voice targets are shared with the callback through a mutex; each voice
/// is written only by the gain mapper.
pub struct AudioSystem {
    mixer: Arc<Mutex<VoiceMixer>>,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,

    sample_rate_hz: u32,
}

impl AudioSystem {
    /// Open the default output device and start streaming
    pub fn new(
        voice_count: usize,
        voice_params: &VoiceParams,
        drone_params: &DroneParams,
        recording: Option<RecordingConfig>,
    ) -> Result<Self, SimError> {
        // Setup audio output device
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| SimError::Audio("No audio output device found".to_string()))?;

        let config = device
            .default_output_config()
            .map_err(|e| SimError::Audio(format!("Failed to get audio config: {}", e)))?;

        let sample_rate_hz = config.sample_rate().0;
        let channels = config.channels().max(1) as usize;

        log::info!(
            "Audio: {} @ {}Hz, {} channels",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate_hz,
            channels
        );

        let mixer = Arc::new(Mutex::new(VoiceMixer::new(
            voice_count,
            sample_rate_hz as f32,
            voice_params.mix_level,
        )));
        let mixer_clone = Arc::clone(&mixer);

        let mut drone = if drone_params.enabled {
            Some(DroneBed::new(drone_params, sample_rate_hz as usize)?)
        } else {
            None
        };

        let mut capture = match recording {
            Some(config) => Some(Self::open_capture(&config, sample_rate_hz)?),
            None => None,
        };

        // Build audio output stream
        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let Ok(mut mixer) = mixer_clone.lock() else {
                        data.fill(0.0);
                        return;
                    };

                    for frame in data.chunks_mut(channels) {
                        let drone_sample = drone.as_mut().map_or(0.0, DroneBed::next_sample);

                        // Safety limiter: hard clip to prevent ear damage
                        let sample =
                            (mixer.next_sample() + drone_sample).clamp(-OUTPUT_LIMIT, OUTPUT_LIMIT);
                        frame.fill(sample);

                        if let Some(capture) = capture.as_mut() {
                            capture.write_frame(sample, sample);
                        }
                    }
                },
                |err| log::error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| SimError::Audio(format!("Failed to build audio stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| SimError::Audio(format!("Failed to start audio stream: {}", e)))?;

        Ok(Self {
            mixer,
            _stream: stream,
            sample_rate_hz,
        })
    }

    fn open_capture(config: &RecordingConfig, sample_rate_hz: u32) -> Result<Capture, SimError> {
        std::fs::create_dir_all(&config.output_dir)
            .map_err(|e| SimError::Audio(format!("Failed to create output directory: {}", e)))?;

        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: sample_rate_hz,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let writer = hound::WavWriter::create(config.audio_path(), spec)
            .map_err(|e| SimError::Audio(format!("Failed to create WAV writer: {}", e)))?;

        log::info!(
            "Recording {:.1}s of audio to {}",
            config.duration_secs,
            config.audio_path()
        );

        Ok(Capture {
            writer: Some(writer),
            frames_left: config.total_samples(sample_rate_hz),
        })
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }
}

impl VoiceBank for AudioSystem {
    fn voice_count(&self) -> usize {
        self.mixer.lock().map(|m| m.voice_count()).unwrap_or(0)
    }

    fn trigger(&mut self, voice: usize, freq_hz: f32) -> Result<(), SimError> {
        let mut mixer = self
            .mixer
            .lock()
            .map_err(|_| SimError::Audio("voice mixer poisoned".to_string()))?;
        mixer.trigger(voice, freq_hz)
    }

    fn ramp_to_db(&mut self, voice: usize, target_db: f32, duration_s: f32) {
        match self.mixer.lock() {
            Ok(mut mixer) => mixer.ramp_to_db(voice, target_db, duration_s),
            Err(_) => log::warn!("voice mixer poisoned, dropping ramp for voice {}", voice),
        }
    }
}
