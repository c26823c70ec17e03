//! Scene state: every body, the camera and the lighting flags in one place.

use glam::Mat4;
use orrery_input::{KeyboardState, MouseState};

use crate::body::{Body, BodyDescriptor};
use crate::camera::{CameraSettings, FlyCamera};
use crate::lighting::LightingState;

/// Camera-derived matrices, computed once per frame and shared by all bodies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMatrices {
    pub projection: Mat4,
    pub view: Mat4,
}

impl FrameMatrices {
    /// `Projection · View`.
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// Per-body transforms for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyTransform {
    pub model: Mat4,
    /// `Projection · View · Model`.
    pub mvp: Mat4,
}

/// Everything the frame loop mutates.
#[derive(Debug, Clone)]
pub struct Scene {
    pub bodies: Vec<Body>,
    pub camera: FlyCamera,
    pub lighting: LightingState,
}

impl Scene {
    /// Builds a scene from body descriptors and camera settings.
    pub fn new(descriptors: &[BodyDescriptor], camera: &CameraSettings) -> Self {
        Self {
            bodies: descriptors.iter().cloned().map(Body::new).collect(),
            camera: FlyCamera::from_settings(camera),
            lighting: LightingState::default(),
        }
    }

    /// Applies input: light toggles first, then camera motion.
    pub fn handle_input(&mut self, keyboard: &KeyboardState, mouse: &MouseState, dt: f32) {
        self.lighting.apply_input(keyboard);
        self.camera.apply_input(keyboard, mouse, dt);
    }

    /// Advances every body's rotation by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        for body in &mut self.bodies {
            body.advance(dt);
        }
    }

    /// Projection and view for the current camera pose.
    pub fn frame_matrices(&self, aspect_ratio: f32) -> FrameMatrices {
        FrameMatrices {
            projection: self.camera.projection_matrix(aspect_ratio),
            view: self.camera.view_matrix(),
        }
    }

    /// Model and MVP for every body, in body order.
    pub fn body_transforms(&self, frame: &FrameMatrices) -> Vec<BodyTransform> {
        self.bodies
            .iter()
            .map(|body| {
                let model = body.model_matrix();
                BodyTransform {
                    model,
                    mvp: frame.projection * frame.view * model,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::default_solar_system;
    use glam::Vec3;

    fn scene() -> Scene {
        Scene::new(&default_solar_system(), &CameraSettings::default())
    }

    fn assert_mat_eq(a: Mat4, b: Mat4) {
        for col in 0..4 {
            for row in 0..4 {
                let (x, y) = (a.col(col)[row], b.col(col)[row]);
                assert!(
                    (x - y).abs() <= 1e-4 * x.abs().max(1.0),
                    "mismatch at col={col}, row={row}: {x} vs {y}"
                );
            }
        }
    }

    #[test]
    fn test_scene_builds_one_body_per_descriptor() {
        let scene = scene();
        assert_eq!(scene.bodies.len(), 6);
        assert!(scene.bodies.iter().all(|b| b.orientation == Vec3::ZERO));
    }

    #[test]
    fn test_advance_moves_every_body_by_its_own_rate() {
        let mut scene = scene();
        scene.advance(2.0);
        for body in &scene.bodies {
            let expected = body.descriptor.angular_rate() * 2.0;
            assert!((body.orientation.y - expected).abs() < 1e-7);
        }
    }

    #[test]
    fn test_mvp_is_projection_view_model_for_every_body() {
        let mut scene = scene();
        scene.camera.look(37.0, -12.0);
        scene.advance(3.3);
        let frame = scene.frame_matrices(1024.0 / 768.0);
        let transforms = scene.body_transforms(&frame);
        assert_eq!(transforms.len(), scene.bodies.len());
        for (body, transform) in scene.bodies.iter().zip(&transforms) {
            assert_mat_eq(transform.model, body.model_matrix());
            assert_mat_eq(
                transform.mvp,
                frame.projection * frame.view * body.model_matrix(),
            );
        }
    }

    #[test]
    fn test_frame_matrices_shared_across_bodies() {
        let scene = scene();
        let frame = scene.frame_matrices(4.0 / 3.0);
        let transforms = scene.body_transforms(&frame);
        for transform in &transforms {
            let recovered = transform.mvp * transform.model.inverse();
            assert_mat_eq(recovered, frame.view_projection());
        }
    }

    #[test]
    fn test_frame_matrices_follow_camera() {
        let mut scene = scene();
        let before = scene.frame_matrices(1.0);
        scene.camera.look(90.0, 0.0);
        let after = scene.frame_matrices(1.0);
        assert_eq!(before.projection, after.projection);
        assert_ne!(before.view, after.view);
        scene.camera.zoom(30.0);
        assert_ne!(scene.frame_matrices(1.0).projection, after.projection);
    }
}
