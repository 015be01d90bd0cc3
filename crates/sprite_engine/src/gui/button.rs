//! Button widget: a sprite with an optional label child

use crate::foundation::math::{Rect, Vec2};
use crate::scene::NodeId;
use std::fmt;
use std::rc::Rc;

/// Name of a button, unique within one [`GuiManager`](super::GuiManager)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ButtonId(Rc<str>);

impl ButtonId {
    /// Create an id from a name
    pub fn new(name: &str) -> Self {
        Self(Rc::from(name))
    }

    /// The name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for ButtonId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Button state for visual feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    /// Normal resting state
    Normal,
    /// Mouse is hovering over button
    Hovered,
    /// Button is being pressed
    Pressed,
    /// Button is disabled (non-interactive)
    Disabled,
}

/// Interaction reported by the GUI
#[derive(Debug, Clone, PartialEq)]
pub enum GuiEvent {
    /// Pointer went down on the button
    Pressed(ButtonId),
    /// Pointer went up after pressing the button, wherever it is now
    Released(ButtonId),
    /// Pointer went down and up on the button
    Clicked {
        /// The button
        button: ButtonId,
        /// Pointer position at release, in GUI coordinates
        position: Vec2,
    },
}

/// A clickable button living in the GUI scene graph
#[derive(Debug, Clone)]
pub struct GuiButton {
    pub(super) id: ButtonId,
    pub(super) sprite: NodeId,
    pub(super) label: Option<NodeId>,
    pub(super) hit_box: Rect,
    pub(super) state: ButtonState,
    pub(super) visible: bool,
}

impl GuiButton {
    /// Button name
    pub fn id(&self) -> &ButtonId {
        &self.id
    }

    /// Node holding the button sprite
    pub fn sprite_node(&self) -> NodeId {
        self.sprite
    }

    /// Node holding the label text, if the button has one
    pub fn label_node(&self) -> Option<NodeId> {
        self.label
    }

    /// Screen area that reacts to the pointer
    pub fn hit_box(&self) -> Rect {
        self.hit_box
    }

    /// Current state
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Whether the button reacts to the pointer
    pub fn is_enabled(&self) -> bool {
        self.state != ButtonState::Disabled
    }

    /// Whether the button is drawn
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(super) fn accepts(&self, position: Vec2) -> bool {
        self.visible && self.is_enabled() && self.hit_box.contains(position)
    }
}
