//! GUI manager
//!
//! Owns a scene graph of its own, drawn with a screen-space camera on top of
//! the scene. Pointer input is routed to buttons first; interactions are
//! queued as [`GuiEvent`]s for the owning scene.

use super::button::{ButtonId, ButtonState, GuiButton, GuiEvent};
use crate::foundation::math::{Rect, Transform2D, Vec2, Vec3};
use crate::render::Camera2D;
use crate::scene::{GraphError, NodeKind, SceneGraph, Sprite, Text};

/// Buttons plus the scene graph that draws them
#[derive(Debug)]
pub struct GuiManager {
    graph: SceneGraph,
    camera: Camera2D,
    buttons: Vec<GuiButton>,
    pressed: Option<ButtonId>,
    events: Vec<GuiEvent>,
}

impl GuiManager {
    /// Create a GUI covering a `width` x `height` screen
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            graph: SceneGraph::new(),
            camera: Camera2D::new(width, height),
            buttons: Vec::new(),
            pressed: None,
            events: Vec::new(),
        }
    }

    /// Add a button at `position`. A label is centred on the sprite.
    pub fn add_button(&mut self, name: &str, sprite: Sprite, label: Option<Text>, position: Vec3) -> Result<ButtonId, GraphError> {
        let id = ButtonId::new(name);
        if self.buttons.iter().any(|b| b.id == id) {
            log::warn!("Replacing GUI button '{name}'");
            self.remove_button(&id);
        }

        let size = sprite.size();
        let pivot = sprite.pivot();
        let sprite_node = self.graph.add_root(sprite, Transform2D::from_position(position));
        let label_node = match label {
            Some(text) => {
                let offset = (size - text.measure()) / 2.0 - pivot.component_mul(&size);
                let transform = Transform2D::from_position(Vec3::new(offset.x, offset.y, 0.0));
                Some(self.graph.add_child(sprite_node, NodeKind::Text(text), transform)?)
            }
            None => None,
        };

        let mut button = GuiButton {
            id: id.clone(),
            sprite: sprite_node,
            label: label_node,
            hit_box: Rect::new(0.0, 0.0, 0.0, 0.0),
            state: ButtonState::Normal,
            visible: true,
        };
        button.hit_box = self.graph.sprite_bounds(sprite_node).unwrap_or(button.hit_box);
        self.buttons.push(button);
        Ok(id)
    }

    /// Remove a button and its nodes
    pub fn remove_button(&mut self, id: &ButtonId) -> bool {
        let Some(index) = self.buttons.iter().position(|b| &b.id == id) else {
            return false;
        };
        let button = self.buttons.remove(index);
        if let Err(error) = self.graph.remove(button.sprite) {
            log::warn!("GUI button '{id}' had no sprite node: {error}");
        }
        if self.pressed.as_ref() == Some(id) {
            self.pressed = None;
        }
        true
    }

    /// Look up a button by name
    pub fn button(&self, name: &str) -> Option<&GuiButton> {
        self.buttons.iter().find(|b| b.id == name)
    }

    /// Mutable access to a button's sprite
    pub fn sprite_mut(&mut self, name: &str) -> Option<&mut Sprite> {
        let node = self.button(name)?.sprite;
        self.graph.get_mut(node)?.kind.as_sprite_mut()
    }

    /// Mutable access to a button's label
    pub fn label_mut(&mut self, name: &str) -> Option<&mut Text> {
        let node = self.button(name)?.label?;
        self.graph.get_mut(node)?.kind.as_text_mut()
    }

    /// Position of a button
    pub fn position(&self, name: &str) -> Option<Vec3> {
        let node = self.button(name)?.sprite;
        Some(self.graph.get(node)?.transform.position)
    }

    /// Move a button; the hit box follows immediately
    pub fn set_position(&mut self, name: &str, position: Vec3) -> bool {
        let Some(index) = self.index_of(name) else {
            return false;
        };
        let node = self.buttons[index].sprite;
        if let Some(entry) = self.graph.get_mut(node) {
            entry.transform.position = position;
        }
        self.refresh_hit_box(index);
        true
    }

    /// Enable or disable a button
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        let Some(index) = self.index_of(name) else {
            return false;
        };
        let button = &mut self.buttons[index];
        button.state = if enabled { ButtonState::Normal } else { ButtonState::Disabled };
        if !enabled && self.pressed.as_ref() == Some(&button.id) {
            self.pressed = None;
        }
        true
    }

    /// Show or hide a button
    pub fn set_visible(&mut self, name: &str, visible: bool) -> bool {
        let Some(index) = self.index_of(name) else {
            return false;
        };
        self.buttons[index].visible = visible;
        let node = self.buttons[index].sprite;
        if let Some(entry) = self.graph.get_mut(node) {
            entry.visible = visible;
        }
        true
    }

    /// Pointer down. Returns whether a button took it.
    pub fn on_mouse_down(&mut self, screen: Vec2) -> bool {
        let position = self.camera.screen_to_world(screen);
        // last added is drawn on top, so it wins
        let Some(button) = self.buttons.iter_mut().rev().find(|b| b.accepts(position)) else {
            return false;
        };
        button.state = ButtonState::Pressed;
        self.pressed = Some(button.id.clone());
        self.events.push(GuiEvent::Pressed(button.id.clone()));
        true
    }

    /// Pointer up. Returns whether it ended a press on a button.
    pub fn on_mouse_up(&mut self, screen: Vec2) -> bool {
        let position = self.camera.screen_to_world(screen);
        let Some(pressed) = self.pressed.take() else {
            return false;
        };
        let Some(button) = self.buttons.iter_mut().find(|b| b.id == pressed) else {
            return false;
        };

        let inside = button.accepts(position);
        if button.is_enabled() {
            button.state = if inside { ButtonState::Hovered } else { ButtonState::Normal };
        }
        self.events.push(GuiEvent::Released(pressed.clone()));
        if inside {
            self.events.push(GuiEvent::Clicked {
                button: pressed,
                position,
            });
        }
        true
    }

    /// Pointer moved; updates hover states
    pub fn on_mouse_move(&mut self, screen: Vec2) {
        let position = self.camera.screen_to_world(screen);
        for button in &mut self.buttons {
            if matches!(button.state, ButtonState::Normal | ButtonState::Hovered) {
                button.state = if button.accepts(position) {
                    ButtonState::Hovered
                } else {
                    ButtonState::Normal
                };
            }
        }
    }

    /// Drain queued interactions
    pub fn take_events(&mut self) -> Vec<GuiEvent> {
        std::mem::take(&mut self.events)
    }

    /// Update nodes and re-derive hit boxes from where the sprites are now
    pub fn update(&mut self, delta_time: f32) {
        self.graph.update(delta_time);
        for index in 0..self.buttons.len() {
            self.refresh_hit_box(index);
        }
    }

    /// The GUI scene graph
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// The GUI scene graph, mutably (for decorations that are not buttons)
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// Screen-space camera the GUI is drawn with
    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    /// Number of buttons
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Remove every button and node
    pub fn clear(&mut self) {
        self.buttons.clear();
        self.graph.clear();
        self.pressed = None;
        self.events.clear();
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.buttons.iter().position(|b| b.id == name)
    }

    fn refresh_hit_box(&mut self, index: usize) {
        let node = self.buttons[index].sprite;
        if let Some(bounds) = self.graph.sprite_bounds(node) {
            self.buttons[index].hit_box = bounds;
        }
    }
}
