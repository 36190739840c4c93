//! Column voices: height → loudness mapping and the synthesis backend.
//!
//! The simulation core only talks to [`VoiceBank`]; the `cpal` backend and
//! the headless bank are interchangeable behind it.

mod mapper;
mod synthesis;
mod system;
mod voice;

// Re-export public types
pub use mapper::{gain_to_db, map_linear, AudioParameterMapper};
pub use synthesis::{db_to_gain, drone_composition, DroneBed, VoiceMixer};
pub use system::AudioSystem;
pub use voice::{midi_to_hz, plan_frequencies, HeadlessVoices, VoiceBank};
