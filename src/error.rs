//! Error taxonomy for simulation setup and backend failures.

use thiserror::Error;

/// Errors reported by the simulation core and its backends
///
/// Configuration variants are fatal to initialization; nothing is retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("grid must have at least one column and one row, got {columns}x{rows}")]
    InvalidGrid { columns: usize, rows: usize },

    #[error("mover amplitude must be finite and positive on the vertical axis, got {0}")]
    InvalidAmplitude(f32),

    #[error("fixed-step interval must be positive and finite, got {0}s")]
    InvalidInterval(f32),

    #[error("musical scale must contain at least one degree")]
    EmptyScale,

    #[error("invalid voice tuning: {0}")]
    InvalidVoiceTuning(String),

    #[error("walker trail capacity must be at least 1")]
    InvalidTrailCapacity,

    #[error("invalid gain mapping: {0}")]
    InvalidGainMapping(String),

    #[error("voice {voice} out of range (bank has {count} voices)")]
    VoiceOutOfRange { voice: usize, count: usize },

    #[error("simulation already initialized")]
    AlreadyInitialized,

    #[error("audio backend: {0}")]
    Audio(String),

    #[error("render backend: {0}")]
    Render(String),
}
