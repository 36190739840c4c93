//! Rendering and recording configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (grid units)
    pub near_plane: f32,

    /// Far clipping plane (grid units)
    pub far_plane: f32,

    /// Clear color (linear RGB)
    pub background: [f32; 3],

    /// Edge length of a mover cube (grid units)
    pub body_size: f32,

    /// Mover cube color (linear RGB)
    pub body_color: [f32; 3],

    /// Edge length of a walker marker cube (grid units)
    pub marker_size: f32,

    /// Direction the key light shines from
    pub light_direction: [f32; 3],

    /// Ambient light intensity
    pub ambient: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 75.0,
            near_plane: 0.1,
            far_plane: 1000.0,
            background: [0.875, 0.875, 0.875], // 0xdfdfdf
            body_size: 0.5,
            body_color: [0.2, 0.2, 0.2],
            marker_size: 1.0,
            light_direction: [-1.0, 2.0, 4.0],
            ambient: 0.5,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }
}

/// Audio capture configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory
    pub output_dir: String,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: "recording".to_string(),
        }
    }

    /// Total number of sample frames to capture at the given rate
    pub fn total_samples(&self, sample_rate_hz: u32) -> usize {
        (self.duration_secs * sample_rate_hz as f32).ceil() as usize
    }

    /// Audio file path
    pub fn audio_path(&self) -> String {
        format!("{}/audio.wav", self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sample_budget() {
        let config = RecordingConfig::new(1.5);
        assert_eq!(config.total_samples(48_000), 72_000);
        assert_eq!(config.audio_path(), "recording/audio.wav");
    }

    #[test]
    fn test_aspect_ratio_survives_zero_height() {
        let config = RenderConfig {
            window_height: 0,
            ..Default::default()
        };
        assert!(config.aspect_ratio().is_finite());
    }
}
