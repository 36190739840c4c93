//! Presentation adapter attaching visuals to the headless simulation.

use glam::Vec3;

use crate::camera::OrbitCamera;
use crate::error::SimError;
use crate::field::MoverId;
use crate::params::RenderConfig;
use crate::rendering::{Instance, RenderSystem, Uniforms};
use crate::scheduler::Presenter;
use crate::walker::Marker;

/// Collects one frame of cube instances and hands them to the GPU
///
/// Without a render system attached frames are collected and discarded,
/// which keeps the adapter usable before the window exists.
pub struct ScenePresenter {
    camera: OrbitCamera,
    config: RenderConfig,
    instances: Vec<Instance>,
    renderer: Option<RenderSystem>,
    frames: u64,
}

impl ScenePresenter {
    pub fn new(camera: OrbitCamera, config: RenderConfig) -> Self {
        Self {
            camera,
            config,
            instances: Vec::new(),
            renderer: None,
            frames: 0,
        }
    }

    pub fn attach(&mut self, renderer: RenderSystem) {
        self.renderer = Some(renderer);
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    /// Track a window resize (surface + projection aspect)
    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.window_width = width;
        self.config.window_height = height;
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.resize(width, height);
        }
    }

    /// Instances placed since the last draw
    pub fn pending(&self) -> &[Instance] {
        &self.instances
    }

    /// Frames submitted so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Presenter for ScenePresenter {
    fn update_camera(&mut self, dt_s: f32) {
        self.camera.update(dt_s);
    }

    fn place_body(&mut self, _id: MoverId, position: Vec3) {
        self.instances.push(Instance::new(
            position.to_array(),
            self.config.body_size,
            self.config.body_color,
        ));
    }

    fn place_marker(&mut self, marker: &Marker) {
        self.instances.push(Instance::new(
            marker.position.to_array(),
            self.config.marker_size,
            marker.color,
        ));
    }

    fn draw(&mut self) -> Result<(), SimError> {
        let result = match self.renderer.as_mut() {
            Some(renderer) => {
                let (view_proj, _) = self.camera.view_proj(&self.config);
                renderer.update_uniforms(&Uniforms::new(view_proj, &self.config));
                renderer.update_instances(&self.instances);
                match renderer.render(self.instances.len() as u32) {
                    // A dropped frame is not fatal; the next tick redraws
                    Err(wgpu::SurfaceError::Timeout) => {
                        log::warn!("Surface timeout, frame skipped");
                        Ok(())
                    }
                    Err(e) => Err(SimError::Render(format!("{:?}", e))),
                    Ok(()) => Ok(()),
                }
            }
            None => Ok(()),
        };

        self.instances.clear();
        self.frames += 1;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::OrbitParams;

    fn presenter() -> ScenePresenter {
        ScenePresenter::new(OrbitCamera::new(OrbitParams::default()), RenderConfig::default())
    }

    #[test]
    fn test_bodies_and_markers_become_instances() {
        let mut scene = presenter();
        scene.place_body(MoverId { column: 0, row: 0 }, Vec3::new(-10.0, 1.5, -5.0));
        scene.place_marker(&Marker::at(Vec3::new(0.5, 0.0, 0.0)));

        let pending = scene.pending();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].offset, [-10.0, 1.5, -5.0]);
        assert_eq!(pending[0].scale, 0.5);
        assert_eq!(pending[1].scale, 1.0);
        assert_eq!(pending[1].color, [0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_draw_without_renderer_clears_frame() {
        let mut scene = presenter();
        scene.place_body(MoverId { column: 1, row: 2 }, Vec3::ZERO);
        scene.draw().unwrap();

        assert!(scene.pending().is_empty());
        assert_eq!(scene.frames(), 1);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut scene = presenter();
        scene.resize(800, 800);
        assert_eq!(scene.config.aspect_ratio(), 1.0);
    }
}
