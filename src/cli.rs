//! Command-line argument parsing.

use clap::Parser;

use crate::params::{DroneParams, MotionParams, RecordingConfig, ScheduleParams, SimConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "gridsong")]
#[command(about = "Grid of bobbing movers, each column singing one tone", long_about = None)]
pub struct Args {
    /// Master seed for mover noise (each mover derives its own)
    #[arg(long, default_value_t = MotionParams::default().seed)]
    pub seed: u64,

    /// Number of columns (one voice each)
    #[arg(long, default_value_t = 36)]
    pub columns: usize,

    /// Number of rows per column
    #[arg(long, default_value_t = 18)]
    pub rows: usize,

    /// Attach the random walker to the fixed-step gate
    #[arg(long)]
    pub walker: bool,

    /// Maximum walker markers kept on screen
    #[arg(long, value_name = "MARKERS", default_value_t = ScheduleParams::default().trail_capacity)]
    pub walker_capacity: usize,

    /// Start immediately instead of waiting for Space/Enter
    #[arg(long)]
    pub autostart: bool,

    /// Disable the background drone
    #[arg(long)]
    pub no_drone: bool,

    /// Record output audio to WAV (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Run this many 60 Hz ticks without window or audio device, then exit
    #[arg(long, value_name = "TICKS")]
    pub headless: Option<u64>,
}

impl Args {
    /// Build the simulation configuration from defaults plus overrides
    pub fn sim_config(&self) -> SimConfig {
        let mut config = SimConfig::default();
        config.motion.seed = self.seed;
        config.motion.columns = self.columns;
        config.motion.rows = self.rows;
        config.schedule.walker_enabled = self.walker;
        config.schedule.trail_capacity = self.walker_capacity;
        config
    }

    pub fn drone_params(&self) -> DroneParams {
        DroneParams {
            enabled: !self.no_drone,
            ..Default::default()
        }
    }

    /// Create recording configuration if recording mode is enabled
    pub fn recording_config(&self) -> Option<RecordingConfig> {
        self.record.map(RecordingConfig::new)
    }
}
