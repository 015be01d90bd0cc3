//! Input state and events
//!
//! Hosts deliver discrete key and pointer events. The driver records them in
//! [`InputState`] and forwards them to the game right away, in arrival order.

use crate::foundation::math::Vec2;
use std::collections::HashSet;

/// A discrete input event from the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer button pressed
    MouseDown {
        /// Pointer position in screen pixels
        position: Vec2,
        /// Button pressed
        button: MouseButton,
    },

    /// Pointer button released
    MouseUp {
        /// Pointer position in screen pixels
        position: Vec2,
        /// Button released
        button: MouseButton,
    },

    /// Pointer moved
    MouseMove {
        /// New pointer position in screen pixels
        position: Vec2,
    },

    /// Key pressed
    KeyDown(KeyCode),

    /// Key released
    KeyUp(KeyCode),
}

/// Keys and buttons currently held, and the last pointer position
#[derive(Debug, Default)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    mouse_position: Vec2,
}

impl InputState {
    /// Create an empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::MouseDown { position, button } => {
                self.mouse_position = position;
                self.buttons_down.insert(button);
            }
            InputEvent::MouseUp { position, button } => {
                self.mouse_position = position;
                self.buttons_down.remove(&button);
            }
            InputEvent::MouseMove { position } => self.mouse_position = position,
            InputEvent::KeyDown(key) => {
                self.keys_down.insert(key);
            }
            InputEvent::KeyUp(key) => {
                self.keys_down.remove(&key);
            }
        }
    }

    /// Whether `key` is held
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Whether `button` is held
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Last known pointer position
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Forget held keys and buttons (e.g. when the canvas loses focus)
    pub fn release_all(&mut self) {
        self.keys_down.clear();
        self.buttons_down.clear();
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Tab key
    Tab,
    /// Backspace key
    Backspace,
    /// Shift key
    Shift,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_keys_buttons_and_pointer() {
        let mut input = InputState::new();
        input.apply(&InputEvent::KeyDown(KeyCode::Space));
        input.apply(&InputEvent::MouseDown {
            position: Vec2::new(10.0, 20.0),
            button: MouseButton::Left,
        });
        assert!(input.is_key_down(KeyCode::Space));
        assert!(input.is_button_down(MouseButton::Left));
        assert_eq!(input.mouse_position(), Vec2::new(10.0, 20.0));

        input.apply(&InputEvent::KeyUp(KeyCode::Space));
        input.apply(&InputEvent::MouseMove {
            position: Vec2::new(5.0, 5.0),
        });
        assert!(!input.is_key_down(KeyCode::Space));
        assert_eq!(input.mouse_position(), Vec2::new(5.0, 5.0));

        input.release_all();
        assert!(!input.is_button_down(MouseButton::Left));
    }
}
