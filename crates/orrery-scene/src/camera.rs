//! Free-fly camera: mouse look, scroll zoom and WASD movement.

use glam::{Mat4, Vec3};
use orrery_input::{KeyboardState, MouseState};
use serde::{Deserialize, Serialize};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Lower bound of the field of view in degrees.
pub const FOV_MIN: f32 = 1.0;
/// Upper bound of the field of view in degrees.
pub const FOV_MAX: f32 = 90.0;
/// Pitch is clamped to ±this many degrees to avoid flipping over the pole.
pub const PITCH_LIMIT: f32 = 89.0;

/// Initial camera pose and tuning, loaded from configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraSettings {
    /// Start position in world units.
    pub position: [f32; 3],
    /// Start yaw in degrees (-90 looks down -Z).
    pub yaw: f32,
    /// Start pitch in degrees.
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Degrees of rotation per pixel of mouse motion.
    pub sensitivity: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: [20.0, 15.0, 23.0],
            yaw: -90.0,
            pitch: 0.0,
            fov: 90.0,
            speed: 20.0,
            sensitivity: 0.1,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Direction keys held this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MoveIntent {
    /// Reads WASD, Space and left Ctrl.
    pub fn from_keyboard(keyboard: &KeyboardState) -> Self {
        let held = |code| keyboard.is_pressed(PhysicalKey::Code(code));
        Self {
            forward: held(KeyCode::KeyW),
            backward: held(KeyCode::KeyS),
            left: held(KeyCode::KeyA),
            right: held(KeyCode::KeyD),
            up: held(KeyCode::Space),
            down: held(KeyCode::ControlLeft),
        }
    }
}

/// A yaw/pitch camera that flies freely through the scene.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    pub position: Vec3,
    /// Unit view direction, derived from yaw and pitch.
    pub front: Vec3,
    pub up: Vec3,
    /// Degrees.
    pub yaw: f32,
    /// Degrees, within ±[`PITCH_LIMIT`].
    pub pitch: f32,
    /// Degrees, within [[`FOV_MIN`], [`FOV_MAX`]].
    pub fov: f32,
    pub speed: f32,
    pub sensitivity: f32,
    pub near: f32,
    pub far: f32,
}

impl FlyCamera {
    /// Builds a camera from its settings.
    pub fn from_settings(settings: &CameraSettings) -> Self {
        let mut camera = Self {
            position: Vec3::from_array(settings.position),
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            yaw: settings.yaw,
            pitch: settings.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            fov: settings.fov.clamp(FOV_MIN, FOV_MAX),
            speed: settings.speed,
            sensitivity: settings.sensitivity,
            near: settings.near,
            far: settings.far,
        };
        camera.update_front();
        camera
    }

    fn update_front(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
    }

    /// Rotates by a mouse delta in pixels. Moving the mouse up looks up.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch - dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_front();
    }

    /// Narrows the field of view on scroll up, widens it on scroll down.
    pub fn zoom(&mut self, scroll: f32) {
        self.fov = (self.fov - scroll).clamp(FOV_MIN, FOV_MAX);
    }

    /// Moves along the view direction and its right/up axes.
    pub fn translate(&mut self, intent: MoveIntent, dt: f32) {
        let step = self.speed * dt;
        let right = self.right();
        if intent.forward {
            self.position += self.front * step;
        }
        if intent.backward {
            self.position -= self.front * step;
        }
        if intent.right {
            self.position += right * step;
        }
        if intent.left {
            self.position -= right * step;
        }
        if intent.up {
            self.position += self.up * step;
        }
        if intent.down {
            self.position -= self.up * step;
        }
    }

    /// Applies this frame's mouse motion, scroll and held movement keys.
    pub fn apply_input(&mut self, keyboard: &KeyboardState, mouse: &MouseState, dt: f32) {
        let delta = mouse.delta();
        if delta != glam::Vec2::ZERO {
            self.look(delta.x, delta.y);
        }
        if mouse.scroll() != 0.0 {
            self.zoom(mouse.scroll());
        }
        self.translate(MoveIntent::from_keyboard(keyboard), dt);
    }

    /// Unit vector to the camera's right.
    pub fn right(&self) -> Vec3 {
        self.front.cross(self.up).normalize()
    }

    /// World-to-view transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection with reverse-Z (near maps to depth 1).
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect_ratio, self.far, self.near)
    }
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::from_settings(&CameraSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::ElementState;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_default_camera_looks_down_neg_z() {
        let camera = FlyCamera::default();
        assert!(approx(camera.front, Vec3::NEG_Z));
        assert!(approx(camera.position, Vec3::new(20.0, 15.0, 23.0)));
        assert_eq!(camera.fov, 90.0);
    }

    #[test]
    fn test_yaw_zero_looks_down_pos_x() {
        let camera = FlyCamera::from_settings(&CameraSettings {
            yaw: 0.0,
            ..CameraSettings::default()
        });
        assert!(approx(camera.front, Vec3::X));
    }

    #[test]
    fn test_mouse_up_pitches_up() {
        let mut camera = FlyCamera::default();
        camera.look(0.0, -100.0);
        assert!((camera.pitch - 10.0).abs() < 1e-4);
        assert!(camera.front.y > 0.0);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = FlyCamera::default();
        camera.look(0.0, -100_000.0);
        assert_eq!(camera.pitch, PITCH_LIMIT);
        camera.look(0.0, 100_000.0);
        assert_eq!(camera.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn test_yaw_is_unbounded() {
        let mut camera = FlyCamera::default();
        camera.look(10_000.0, 0.0);
        assert!((camera.yaw - 910.0).abs() < 1e-2);
        assert!((camera.front.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_zoom_clamps_fov() {
        let mut camera = FlyCamera::default();
        camera.zoom(10.0);
        assert_eq!(camera.fov, 80.0);
        camera.zoom(500.0);
        assert_eq!(camera.fov, FOV_MIN);
        camera.zoom(-500.0);
        assert_eq!(camera.fov, FOV_MAX);
    }

    #[test]
    fn test_forward_moves_along_front() {
        let mut camera = FlyCamera::default();
        let start = camera.position;
        camera.translate(
            MoveIntent {
                forward: true,
                ..MoveIntent::default()
            },
            0.5,
        );
        assert!(approx(camera.position - start, camera.front * camera.speed * 0.5));
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut camera = FlyCamera::default();
        let start = camera.position;
        camera.translate(
            MoveIntent {
                forward: true,
                backward: true,
                left: true,
                right: true,
                up: true,
                down: true,
            },
            1.0,
        );
        assert!(approx(camera.position, start));
    }

    #[test]
    fn test_right_is_orthogonal_to_front_and_up() {
        let mut camera = FlyCamera::default();
        camera.look(123.0, -45.0);
        let right = camera.right();
        assert!(right.dot(camera.front).abs() < 1e-5);
        assert!(right.dot(camera.up).abs() < 1e-5);
    }

    #[test]
    fn test_view_matrix_moves_camera_to_origin() {
        let camera = FlyCamera::default();
        let p = camera.view_matrix().transform_point3(camera.position);
        assert!(p.length() < 1e-4);
    }

    #[test]
    fn test_projection_is_reverse_z() {
        let camera = FlyCamera::default();
        let proj = camera.projection_matrix(4.0 / 3.0);
        let near = proj.project_point3(Vec3::new(0.0, 0.0, -camera.near));
        let far = proj.project_point3(Vec3::new(0.0, 0.0, -camera.far));
        assert!((near.z - 1.0).abs() < 1e-4);
        assert!(far.z.abs() < 1e-4);
    }

    #[test]
    fn test_apply_input_reads_keyboard_and_mouse() {
        let mut keyboard = KeyboardState::new();
        keyboard.process_raw(orrery_input::RawKeyEvent {
            key: PhysicalKey::Code(KeyCode::KeyW),
            state: ElementState::Pressed,
            repeat: false,
        });
        let mouse = MouseState::new();

        let mut camera = FlyCamera::default();
        let start = camera.position;
        camera.apply_input(&keyboard, &mouse, 1.0);
        assert!(approx(camera.position, start + Vec3::NEG_Z * camera.speed));
    }
}
