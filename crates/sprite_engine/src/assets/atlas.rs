//! Texture atlases: one texture, many named regions

use crate::foundation::math::{Rect, Vec2};
use crate::render::TextureId;
use std::collections::HashMap;

/// Normalised texture coordinates plus the pixel size of a region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureRegion {
    /// `[u0, v0, u1, v1]`
    pub uv: [f32; 4],
    /// Region size in pixels
    pub size: Vec2,
}

impl TextureRegion {
    /// The whole texture
    pub fn full(width: f32, height: f32) -> Self {
        Self {
            uv: [0.0, 0.0, 1.0, 1.0],
            size: Vec2::new(width, height),
        }
    }
}

/// A texture with named sub-rectangles
#[derive(Debug, Clone)]
pub struct TextureAtlas {
    texture: TextureId,
    width: u32,
    height: u32,
    regions: HashMap<String, Rect>,
}

impl TextureAtlas {
    /// Create an atlas over a `width` x `height` texture
    pub fn new(texture: TextureId, width: u32, height: u32) -> Self {
        Self {
            texture,
            width,
            height,
            regions: HashMap::new(),
        }
    }

    /// Name a pixel rectangle of the texture
    pub fn add_region(&mut self, name: &str, rect: Rect) -> &mut Self {
        self.regions.insert(name.to_string(), rect);
        self
    }

    /// Texture backing the atlas
    pub fn texture(&self) -> TextureId {
        self.texture
    }

    /// Look up a region by name
    pub fn region(&self, name: &str) -> Option<TextureRegion> {
        let rect = self.regions.get(name)?;
        let (w, h) = (self.width.max(1) as f32, self.height.max(1) as f32);
        Some(TextureRegion {
            uv: [rect.x / w, rect.y / h, (rect.x + rect.width) / w, (rect.y + rect.height) / h],
            size: Vec2::new(rect.width, rect.height),
        })
    }

    /// Region names, unordered
    pub fn region_names(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }
}
