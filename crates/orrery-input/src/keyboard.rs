//! Keyboard state for one frame.
//!
//! Keys are tracked by physical code so the movement keys sit in the same
//! place on every layout. Held keys drive camera movement; press edges drive
//! the lighting toggles and the quit key.

use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// A key event stripped down to what [`KeyboardState`] needs.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    pub key: PhysicalKey,
    pub state: ElementState,
    /// OS auto-repeat.
    pub repeat: bool,
}

impl From<&KeyEvent> for RawKeyEvent {
    fn from(event: &KeyEvent) -> Self {
        Self {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        }
    }
}

/// Held keys plus the press/release edges seen since the last frame.
///
/// Feed events with [`process_event`](Self::process_event), read them during
/// the update, then call [`clear_transients`](Self::clear_transients) once the
/// frame is drawn.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<PhysicalKey>,
    pressed_edges: HashSet<PhysicalKey>,
    released_edges: HashSet<PhysicalKey>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a winit key event.
    pub fn process_event(&mut self, event: &KeyEvent) {
        self.process_raw(RawKeyEvent::from(event));
    }

    /// Records a key event. Auto-repeat is dropped so a held key produces
    /// exactly one press edge.
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        if event.repeat {
            return;
        }
        match event.state {
            ElementState::Pressed => {
                // A press for a key already held (focus loss, missed release)
                // is not a new edge.
                if self.held.insert(event.key) {
                    self.pressed_edges.insert(event.key);
                }
            }
            ElementState::Released => {
                if self.held.remove(&event.key) {
                    self.released_edges.insert(event.key);
                }
            }
        }
    }

    /// Whether the key is down right now.
    #[must_use]
    pub fn is_pressed(&self, key: PhysicalKey) -> bool {
        self.held.contains(&key)
    }

    /// Whether the key went down since the last [`clear_transients`](Self::clear_transients).
    #[must_use]
    pub fn just_pressed(&self, key: PhysicalKey) -> bool {
        self.pressed_edges.contains(&key)
    }

    /// Whether the key went up since the last [`clear_transients`](Self::clear_transients).
    #[must_use]
    pub fn just_released(&self, key: PhysicalKey) -> bool {
        self.released_edges.contains(&key)
    }

    /// Shorthand for [`is_pressed`](Self::is_pressed) with a [`KeyCode`].
    #[must_use]
    pub fn is_code_pressed(&self, code: KeyCode) -> bool {
        self.is_pressed(PhysicalKey::Code(code))
    }

    /// Releases every held key without producing release edges.
    ///
    /// Used when the window loses focus, since the matching release events
    /// will never arrive.
    pub fn release_all(&mut self) {
        if !self.held.is_empty() {
            tracing::debug!(count = self.held.len(), "releasing held keys");
        }
        self.held.clear();
    }

    /// Drops this frame's press and release edges.
    pub fn clear_transients(&mut self) {
        self.pressed_edges.clear();
        self.released_edges.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(code: KeyCode, state: ElementState, repeat: bool) -> RawKeyEvent {
        RawKeyEvent {
            key: PhysicalKey::Code(code),
            state,
            repeat,
        }
    }

    #[test]
    fn test_nothing_pressed_initially() {
        let kb = KeyboardState::new();
        for code in [KeyCode::KeyW, KeyCode::Digit1, KeyCode::Escape] {
            let key = PhysicalKey::Code(code);
            assert!(!kb.is_pressed(key));
            assert!(!kb.just_pressed(key));
            assert!(!kb.just_released(key));
        }
    }

    #[test]
    fn test_press_sets_held_and_edge() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::KeyW, ElementState::Pressed, false));
        assert!(kb.is_code_pressed(KeyCode::KeyW));
        assert!(kb.just_pressed(PhysicalKey::Code(KeyCode::KeyW)));
    }

    #[test]
    fn test_edge_lasts_one_frame() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::Digit2, ElementState::Pressed, false));
        kb.clear_transients();
        let key = PhysicalKey::Code(KeyCode::Digit2);
        assert!(!kb.just_pressed(key));
        assert!(kb.is_pressed(key));
    }

    #[test]
    fn test_release_clears_held() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::KeyD, ElementState::Pressed, false));
        kb.clear_transients();
        kb.process_raw(raw(KeyCode::KeyD, ElementState::Released, false));
        let key = PhysicalKey::Code(KeyCode::KeyD);
        assert!(!kb.is_pressed(key));
        assert!(kb.just_released(key));
    }

    #[test]
    fn test_repeat_does_not_create_new_edge() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::Digit3, ElementState::Pressed, false));
        kb.clear_transients();
        kb.process_raw(raw(KeyCode::Digit3, ElementState::Pressed, true));
        kb.process_raw(raw(KeyCode::Digit3, ElementState::Pressed, true));
        assert!(!kb.just_pressed(PhysicalKey::Code(KeyCode::Digit3)));
        assert!(kb.is_code_pressed(KeyCode::Digit3));
    }

    #[test]
    fn test_duplicate_press_without_release_is_not_an_edge() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::Digit1, ElementState::Pressed, false));
        kb.clear_transients();
        kb.process_raw(raw(KeyCode::Digit1, ElementState::Pressed, false));
        assert!(!kb.just_pressed(PhysicalKey::Code(KeyCode::Digit1)));
    }

    #[test]
    fn test_keys_are_independent() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::KeyW, ElementState::Pressed, false));
        kb.process_raw(raw(KeyCode::KeyA, ElementState::Pressed, false));
        kb.process_raw(raw(KeyCode::KeyW, ElementState::Released, false));
        assert!(!kb.is_code_pressed(KeyCode::KeyW));
        assert!(kb.is_code_pressed(KeyCode::KeyA));
    }

    #[test]
    fn test_release_all_forgets_held_keys() {
        let mut kb = KeyboardState::new();
        kb.process_raw(raw(KeyCode::KeyS, ElementState::Pressed, false));
        kb.release_all();
        assert!(!kb.is_code_pressed(KeyCode::KeyS));
        assert!(!kb.just_released(PhysicalKey::Code(KeyCode::KeyS)));
    }
}
