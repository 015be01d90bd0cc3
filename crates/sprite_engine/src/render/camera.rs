//! Orthographic 2D camera
//!
//! Screen space has its origin at the top-left corner with +Y pointing down,
//! matching pointer coordinates.

use crate::foundation::math::{Mat4, Vec2, Vec3};

/// Orthographic camera looking at a rectangle of the world
#[derive(Debug, Clone, PartialEq)]
pub struct Camera2D {
    /// World point shown at the top-left corner of the viewport
    pub position: Vec2,

    /// Viewport size in pixels
    pub viewport: Vec2,

    /// Magnification (2.0 shows half as much of the world)
    pub zoom: f32,
}

impl Camera2D {
    /// Camera covering a `width` x `height` viewport at the world origin
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            position: Vec2::zeros(),
            viewport: Vec2::new(width, height),
            zoom: 1.0,
        }
    }

    /// Projection matrix (pixels to clip space)
    pub fn projection(&self) -> Mat4 {
        Mat4::new_orthographic(0.0, self.viewport.x, self.viewport.y, 0.0, -1000.0, 1000.0)
    }

    /// View matrix (world to pixels)
    pub fn view(&self) -> Mat4 {
        Mat4::new_scaling(self.zoom) * Mat4::new_translation(&Vec3::new(-self.position.x, -self.position.y, 0.0))
    }

    /// Combined transform uploaded with every batch submission
    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Convert a pointer position into world coordinates
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        self.position + screen / self.zoom
    }

    /// Convert a world position into pointer coordinates
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.position) * self.zoom
    }

    /// Move the camera so `target` is centred in the viewport
    pub fn center_on(&mut self, target: Vec2) {
        self.position = target - self.viewport / (2.0 * self.zoom);
    }
}
