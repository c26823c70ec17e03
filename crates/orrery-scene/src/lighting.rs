//! Lighting mode flags and the light color they select.
//!
//! The three flags are independent: any combination can be set at once.
//! Keys `1`, `2` and `3` toggle ambient, specular and disco. The last key
//! pressed also picks the shading model the fragment shader uses.

use glam::Vec3;
use orrery_input::KeyboardState;
use winit::keyboard::{KeyCode, PhysicalKey};

/// One of the three lighting toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightToggle {
    Ambient,
    Specular,
    Disco,
}

impl LightToggle {
    /// All toggles with their keys.
    pub const BINDINGS: [(KeyCode, LightToggle); 3] = [
        (KeyCode::Digit1, LightToggle::Ambient),
        (KeyCode::Digit2, LightToggle::Specular),
        (KeyCode::Digit3, LightToggle::Disco),
    ];

    /// Shading model selected when this toggle is pressed.
    pub fn shading_mode(self) -> ShadingMode {
        match self {
            LightToggle::Ambient => ShadingMode::Ambient,
            LightToggle::Specular | LightToggle::Disco => ShadingMode::Specular,
        }
    }
}

/// Shading model passed to the shader as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum ShadingMode {
    /// Ambient plus diffuse.
    #[default]
    Ambient = 1,
    /// Ambient, diffuse and a distance-attenuated specular highlight.
    Specular = 2,
}

/// Current lighting flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightingState {
    pub ambient: bool,
    pub specular: bool,
    pub disco: bool,
    pub mode: ShadingMode,
}

impl LightingState {
    /// Flips one flag and switches the shading mode to match it.
    pub fn toggle(&mut self, toggle: LightToggle) {
        let flag = match toggle {
            LightToggle::Ambient => &mut self.ambient,
            LightToggle::Specular => &mut self.specular,
            LightToggle::Disco => &mut self.disco,
        };
        *flag = !*flag;
        self.mode = toggle.shading_mode();
        tracing::debug!(?toggle, state = *flag, mode = ?self.mode, "lighting toggled");
    }

    /// Toggles once for every binding key pressed this frame.
    ///
    /// Only the press edge counts; held keys and OS key repeat do nothing.
    pub fn apply_input(&mut self, keyboard: &KeyboardState) {
        for (code, toggle) in LightToggle::BINDINGS {
            if keyboard.just_pressed(PhysicalKey::Code(code)) {
                self.toggle(toggle);
            }
        }
    }

    /// Light color at `elapsed` seconds since start.
    ///
    /// Disco wins over the other flags; every other combination is white.
    pub fn light_color(&self, elapsed: f32) -> Vec3 {
        if self.disco {
            disco_color(elapsed)
        } else {
            Vec3::ONE
        }
    }
}

/// `(tan t / 2, sin t / 2, cos t / 2)`.
pub fn disco_color(t: f32) -> Vec3 {
    Vec3::new(t.tan() / 2.0, t.sin() / 2.0, t.cos() / 2.0)
}
