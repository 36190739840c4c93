//! Orbit camera with damped mouse rotation and zoom.

use glam::{Mat4, Vec3};

use crate::params::{OrbitParams, RenderConfig};

/// Orbit controls around a fixed target point
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    params: OrbitParams,
    yaw: f32,
    pitch: f32,
    distance: f32,
    /// Rotation and zoom requested by input but not yet applied
    pending_yaw: f32,
    pending_pitch: f32,
    pending_zoom: f32,
}

impl OrbitCamera {
    /// Create new orbit camera with specified parameters
    pub fn new(params: OrbitParams) -> Self {
        Self {
            yaw: params.yaw,
            pitch: params.pitch,
            distance: params.distance,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_zoom: 0.0,
            params,
        }
    }

    /// Queue a rotation from a mouse drag (pixels)
    pub fn drag(&mut self, dx_px: f32, dy_px: f32) {
        self.pending_yaw -= dx_px * self.params.rotate_speed;
        self.pending_pitch += dy_px * self.params.rotate_speed;
    }

    /// Queue a zoom from scroll input (lines, positive = zoom in)
    pub fn scroll(&mut self, lines: f32) {
        self.pending_zoom -= lines * self.params.zoom_speed;
    }

    /// Apply a damped share of the queued input
    ///
    /// Damping is expressed per 60 Hz frame, so feel is independent of frame rate.
    pub fn update(&mut self, dt_s: f32) {
        let damping = self.params.damping.clamp(0.0, 1.0);
        let frames = (dt_s.max(0.0) * 60.0).max(0.0);
        let share = 1.0 - (1.0 - damping).powf(frames);

        let yaw = self.pending_yaw * share;
        let pitch = self.pending_pitch * share;
        let zoom = self.pending_zoom * share;
        self.pending_yaw -= yaw;
        self.pending_pitch -= pitch;
        self.pending_zoom -= zoom;

        self.yaw += yaw;
        self.pitch = (self.pitch + pitch).clamp(-self.params.max_pitch, self.params.max_pitch);
        self.distance = (self.distance * (1.0 + zoom))
            .clamp(self.params.min_distance, self.params.max_distance);
    }

    /// Camera eye position
    pub fn eye(&self) -> Vec3 {
        let offset = Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        );
        self.target() + offset * self.distance
    }

    pub fn target(&self) -> Vec3 {
        Vec3::from_array(self.params.target)
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Create view-projection matrix for rendering
    ///
    /// # Returns
    /// Tuple of (view_proj_matrix, camera_position)
    pub fn view_proj(&self, render_config: &RenderConfig) -> (Mat4, Vec3) {
        let eye = self.eye();

        // Always keep Y as up vector (camera never rolls)
        let view = Mat4::look_at_rh(eye, self.target(), Vec3::Y);
        let proj = Mat4::perspective_rh(
            render_config.fov_degrees.to_radians(),
            render_config.aspect_ratio(),
            render_config.near_plane,
            render_config.far_plane,
        );

        (proj * view, eye)
    }
}
