//! Mouse look and scroll accumulated over one frame.
//!
//! While the cursor is captured, look deltas come from raw device motion.
//! Otherwise they come from differences between cursor positions, skipping
//! the first position reported so the view does not jump on startup.

use glam::Vec2;
use winit::event::MouseScrollDelta;
use winit::window::{CursorGrabMode, Window};

/// Pixels of trackpad scroll treated as one wheel line.
const PIXELS_PER_LINE: f64 = 40.0;

#[derive(Debug, Clone, Default)]
pub struct MouseState {
    last_position: Option<Vec2>,
    delta: Vec2,
    scroll: f32,
    captured: bool,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles `WindowEvent::CursorMoved`.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let position = Vec2::new(x as f32, y as f32);
        if !self.captured
            && let Some(last) = self.last_position
        {
            self.delta += position - last;
        }
        self.last_position = Some(position);
    }

    /// Handles `DeviceEvent::MouseMotion`. Ignored unless captured.
    pub fn on_raw_motion(&mut self, dx: f64, dy: f64) {
        if self.captured {
            self.delta += Vec2::new(dx as f32, dy as f32);
        }
    }

    /// Handles `WindowEvent::MouseWheel`. Positive is away from the user.
    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        self.scroll += match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
        };
    }

    /// Hides and grabs the cursor, or gives it back.
    ///
    /// Tries `Locked` first and falls back to `Confined`. Returns `false` if
    /// the platform supports neither; look then falls back to cursor deltas.
    pub fn set_captured(&mut self, window: &Window, captured: bool) -> bool {
        if !captured {
            let _ = window.set_cursor_grab(CursorGrabMode::None);
            window.set_cursor_visible(true);
            self.set_captured_flag(false);
            return true;
        }
        let grabbed = window.set_cursor_grab(CursorGrabMode::Locked).is_ok()
            || window.set_cursor_grab(CursorGrabMode::Confined).is_ok();
        if grabbed {
            window.set_cursor_visible(false);
        } else {
            tracing::warn!("cursor grab unsupported, using cursor position for mouse look");
        }
        self.set_captured_flag(grabbed);
        grabbed
    }

    /// Sets the capture flag without touching a window.
    pub fn set_captured_flag(&mut self, captured: bool) {
        self.captured = captured;
        self.last_position = None;
    }

    /// Drops this frame's motion and scroll.
    pub fn clear_transients(&mut self) {
        self.delta = Vec2::ZERO;
        self.scroll = 0.0;
    }

    /// Motion since the last clear, in pixels. Positive y is downward.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    /// Scroll lines since the last clear.
    #[must_use]
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.captured
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn test_first_cursor_position_produces_no_delta() {
        let mut ms = MouseState::new();
        ms.on_cursor_moved(512.0, 384.0);
        assert_eq!(ms.delta(), Vec2::ZERO);
    }

    #[test]
    fn test_cursor_delta_accumulates_within_frame() {
        let mut ms = MouseState::new();
        ms.on_cursor_moved(100.0, 100.0);
        ms.on_cursor_moved(110.0, 95.0);
        ms.on_cursor_moved(113.0, 90.0);
        assert_eq!(ms.delta(), Vec2::new(13.0, -10.0));
    }

    #[test]
    fn test_clear_resets_delta_but_keeps_last_position() {
        let mut ms = MouseState::new();
        ms.on_cursor_moved(100.0, 100.0);
        ms.on_cursor_moved(120.0, 100.0);
        ms.clear_transients();
        assert_eq!(ms.delta(), Vec2::ZERO);
        ms.on_cursor_moved(125.0, 100.0);
        assert_eq!(ms.delta(), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_raw_motion_only_counts_when_captured() {
        let mut ms = MouseState::new();
        ms.on_raw_motion(4.0, 2.0);
        assert_eq!(ms.delta(), Vec2::ZERO);

        ms.set_captured_flag(true);
        ms.on_raw_motion(4.0, 2.0);
        ms.on_cursor_moved(0.0, 0.0);
        ms.on_cursor_moved(300.0, 300.0);
        assert_eq!(ms.delta(), Vec2::new(4.0, 2.0));
    }

    #[test]
    fn test_scroll_lines_and_pixels() {
        let mut ms = MouseState::new();
        ms.on_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        ms.on_scroll(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 20.0)));
        assert!((ms.scroll() - 1.5).abs() < f32::EPSILON);
        ms.clear_transients();
        assert_eq!(ms.scroll(), 0.0);
    }

    #[test]
    fn test_uncapture_restarts_position_tracking() {
        let mut ms = MouseState::new();
        ms.set_captured_flag(true);
        ms.set_captured_flag(false);
        ms.on_cursor_moved(900.0, 10.0);
        assert_eq!(ms.delta(), Vec2::ZERO);
        assert!(!ms.is_captured());
    }
}
