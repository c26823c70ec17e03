//! Celestial body descriptors and per-body rotation.
//!
//! A [`BodyDescriptor`] is pure configuration: where the body sits, how large
//! it is relative to Earth, how long one rotation takes and which assets draw
//! it. A [`Body`] pairs a descriptor with the orientation that the frame loop
//! advances every frame.

use std::f32::consts::PI;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Real seconds per simulated day: one day of rotation takes one minute.
pub const SECONDS_PER_DAY: f32 = 60.0;

/// Static configuration of a single celestial body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BodyDescriptor {
    /// Display name, used for GPU labels and logs.
    pub name: String,
    /// Position relative to the sun (1.0 = 100 000 km).
    pub position: [f32; 3],
    /// Uniform scale relative to the Earth mesh.
    pub scale: f32,
    /// Rotation period in simulated days.
    pub period_days: f32,
    /// Rotates in the opposite direction.
    #[serde(default)]
    pub retrograde: bool,
    /// Mesh file name, relative to the asset directory.
    pub mesh: String,
    /// Diffuse texture file name, relative to the asset directory.
    pub texture: String,
}

impl BodyDescriptor {
    fn new(
        name: &str,
        x: f32,
        scale: f32,
        period_days: f32,
        retrograde: bool,
        mesh: &str,
        texture: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            position: [x, 0.0, 0.0],
            scale,
            period_days,
            retrograde,
            mesh: mesh.to_string(),
            texture: texture.to_string(),
        }
    }

    /// Angular rate about the Y axis in radians per second.
    ///
    /// `π · 2 / (60 · period)`, negated for retrograde bodies.
    pub fn angular_rate(&self) -> f32 {
        let rate = PI * 2.0 / (SECONDS_PER_DAY * self.period_days);
        if self.retrograde { -rate } else { rate }
    }

    /// Position as a vector.
    pub fn position_vec(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// The sun, earth, moon, mercury, venus and mars.
///
/// Venus and Mars use a 27-day period. Their real rotation periods are
/// 243 days (retrograde) and about one day; edit `config.ron` to change them.
pub fn default_solar_system() -> Vec<BodyDescriptor> {
    vec![
        BodyDescriptor::new("sun", 0.0, 1.0, 25.0, false, "sun.obj", "sun_dds.DDS"),
        BodyDescriptor::new("earth", 205.0, 1.0, 1.0, false, "erde.obj", "erde_dds.DDS"),
        BodyDescriptor::new("moon", 206.0, 0.25, 27.0, false, "erde.obj", "mond_dds.DDS"),
        BodyDescriptor::new("mercury", 113.0, 0.4, 88.0, false, "erde.obj", "mercury_dds.DDS"),
        BodyDescriptor::new("venus", 173.0, 0.9, 27.0, true, "erde.obj", "venus_dds.DDS"),
        BodyDescriptor::new("mars", 283.0, 0.5, 27.0, false, "erde.obj", "mars_dds.DDS"),
    ]
}

/// A body in the running scene.
#[derive(Debug, Clone)]
pub struct Body {
    /// Immutable configuration.
    pub descriptor: BodyDescriptor,
    /// Euler angles in radians. Only `y` is ever animated.
    pub orientation: Vec3,
}

impl Body {
    /// Creates a body with zero orientation.
    pub fn new(descriptor: BodyDescriptor) -> Self {
        Self {
            descriptor,
            orientation: Vec3::ZERO,
        }
    }

    /// Advances the Y rotation by `dt` seconds of real time.
    ///
    /// The angle is not wrapped.
    pub fn advance(&mut self, dt: f32) {
        self.orientation.y += self.descriptor.angular_rate() * dt;
    }

    /// Rotation from the Euler angles, composed Y · X · Z.
    pub fn rotation_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.orientation.y)
            * Mat4::from_rotation_x(self.orientation.x)
            * Mat4::from_rotation_z(self.orientation.z)
    }

    /// `Translate(position) · Rotate(orientation) · Scale(scale)`.
    pub fn model_matrix(&self) -> Mat4 {
        let translation = Mat4::from_translation(self.descriptor.position_vec());
        let scale = Mat4::from_scale(Vec3::splat(self.descriptor.scale));
        translation * self.rotation_matrix() * scale
    }
}
