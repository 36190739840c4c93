//! Orbit camera configuration.

/// Orbit controls around a fixed target
#[derive(Debug, Clone)]
pub struct OrbitParams {
    /// Point the camera orbits (grid units)
    pub target: [f32; 3],

    /// Initial distance from target (grid units)
    pub distance: f32,

    /// Zoom limits (grid units)
    pub min_distance: f32,
    pub max_distance: f32,

    /// Initial yaw around +Y (radians, 0 = looking down -Z)
    pub yaw: f32,

    /// Initial pitch above the horizon (radians)
    pub pitch: f32,

    /// Pitch limit on either side of the horizon (radians)
    pub max_pitch: f32,

    /// Radians of rotation per pixel of mouse drag
    pub rotate_speed: f32,

    /// Fractional distance change per scroll line
    pub zoom_speed: f32,

    /// Fraction of pending motion applied per 60 Hz frame (1.0 = no damping)
    pub damping: f32,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            target: [0.0, 0.0, 0.0],
            distance: 25.0,
            min_distance: 2.0,
            max_distance: 200.0,
            yaw: 0.0,
            pitch: 0.0,
            max_pitch: 1.5,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            damping: 0.25,
        }
    }
}
