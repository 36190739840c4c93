//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (grid units, seconds, Hz, dB)
//! - Documented ranges and meanings
//! - Validation that fails fast before any backend is touched

mod audio;
mod camera;
mod motion;
mod render;
mod schedule;

// Re-export all types
pub use audio::{audio_constants, DroneParams, GainMapping, VoiceParams};
pub use camera::OrbitParams;
pub use motion::MotionParams;
pub use render::{RecordingConfig, RenderConfig};
pub use schedule::ScheduleParams;

use crate::error::SimError;

/// Complete simulation configuration handed to `Scheduler::initialize`
#[derive(Debug, Clone, Default)]
pub struct SimConfig {
    pub motion: MotionParams,
    pub gain: GainMapping,
    pub voices: VoiceParams,
    pub schedule: ScheduleParams,
}

impl SimConfig {
    /// Validate every section, reporting the first failure
    pub fn validate(&self) -> Result<(), SimError> {
        self.motion.validate()?;
        self.gain.validate()?;
        self.voices.validate()?;
        self.schedule.validate()?;
        Ok(())
    }
}
