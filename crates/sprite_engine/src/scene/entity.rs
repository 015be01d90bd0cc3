//! Renderable entities: sprites, text runs and containers

use crate::assets::{Font, PlacedGlyph, TextureRegion};
use crate::foundation::math::{Mat4, Vec2, Vec3, Vec4};
use crate::render::{Drawable, MaterialId, Quad};
use std::rc::Rc;

/// Something that advances with time
pub trait Updatable {
    /// Advance by `delta_time`
    fn update(&mut self, delta_time: f32);
}

/// A textured, colored quad
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    material: MaterialId,
    size: Vec2,
    pivot: Vec2,
    uv: [f32; 4],
    colors: [Vec4; 4],
}

impl Sprite {
    /// White `width` x `height` sprite over the whole texture, pivot top-left
    pub fn new(material: MaterialId, width: f32, height: f32) -> Self {
        Self {
            material,
            size: Vec2::new(width, height),
            pivot: Vec2::zeros(),
            uv: [0.0, 0.0, 1.0, 1.0],
            colors: [Vec4::new(1.0, 1.0, 1.0, 1.0); 4],
        }
    }

    /// Use an atlas region for texture coordinates and size
    pub fn with_region(mut self, region: TextureRegion) -> Self {
        self.set_region(region);
        self
    }

    /// Set the pivot (normalised, `(0.5, 0.5)` is the centre)
    pub fn with_pivot(mut self, pivot: Vec2) -> Self {
        self.pivot = pivot;
        self
    }

    /// Switch to an atlas region; the sprite takes the region's size
    pub fn set_region(&mut self, region: TextureRegion) {
        self.uv = region.uv;
        self.size = region.size;
    }

    /// Quad size in local units
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Resize the quad
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
    }

    /// Normalised origin of the quad
    pub fn pivot(&self) -> Vec2 {
        self.pivot
    }

    /// Move the origin of the quad
    pub fn set_pivot(&mut self, pivot: Vec2) {
        self.pivot = pivot;
    }

    /// Tint all four corners
    pub fn set_vertices_color(&mut self, color: Vec4) {
        self.colors = [color; 4];
    }

    /// Change the alpha of all four corners, keeping their color
    pub fn set_vertices_alpha(&mut self, alpha: f32) {
        for color in &mut self.colors {
            color.w = alpha;
        }
    }

    /// Corner colors (top-left, top-right, bottom-right, bottom-left)
    pub fn vertices_color(&self) -> &[Vec4; 4] {
        &self.colors
    }

    /// Change the material
    pub fn set_material(&mut self, material: MaterialId) {
        self.material = material;
    }
}

impl Drawable for Sprite {
    fn material(&self) -> MaterialId {
        self.material
    }

    fn append_quads(&self, world: &Mat4, out: &mut Vec<Quad>) {
        out.push(Quad::from_rect(world, self.size, self.pivot, self.uv, &self.colors));
    }
}

/// A run of glyphs from a bitmap font
#[derive(Debug, Clone)]
pub struct Text {
    material: MaterialId,
    font: Rc<Font>,
    text: String,
    color: Vec4,
    glyphs: Vec<PlacedGlyph>,
    dirty: bool,
}

impl Text {
    /// Create a text run. Layout happens on the next update or draw.
    pub fn new(font: Rc<Font>, material: MaterialId, text: &str) -> Self {
        Self {
            material,
            font,
            text: text.to_string(),
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            glyphs: Vec::new(),
            dirty: true,
        }
    }

    /// Current string
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the string
    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text = text.to_string();
            self.dirty = true;
        }
    }

    /// Glyph color
    pub fn color(&self) -> Vec4 {
        self.color
    }

    /// Change the glyph color
    pub fn set_color(&mut self, color: Vec4) {
        self.color = color;
    }

    /// Whether the layout is out of date
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Glyphs in the current layout
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Size of the text with the current font
    pub fn measure(&self) -> Vec2 {
        self.font.measure(&self.text)
    }

    /// Lay the glyphs out again if the string changed
    pub fn refresh_layout(&mut self) {
        if self.dirty {
            self.glyphs = self.font.layout(&self.text);
            self.dirty = false;
        }
    }
}

impl Updatable for Text {
    fn update(&mut self, _delta_time: f32) {
        self.refresh_layout();
    }
}

impl Drawable for Text {
    fn material(&self) -> MaterialId {
        self.material
    }

    fn append_quads(&self, world: &Mat4, out: &mut Vec<Quad>) {
        let colors = [self.color; 4];
        for placed in &self.glyphs {
            let offset = world * Mat4::new_translation(&Vec3::new(placed.position.x, placed.position.y, 0.0));
            out.push(Quad::from_rect(&offset, placed.glyph.size, Vec2::zeros(), placed.glyph.uv, &colors));
        }
    }
}

/// What a scene node is
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Textured quad
    Sprite(Sprite),
    /// Glyph run
    Text(Text),
    /// Groups children, draws nothing
    Container,
}

impl NodeKind {
    /// The drawable part, if any
    pub fn as_drawable(&self) -> Option<&dyn Drawable> {
        match self {
            Self::Sprite(sprite) => Some(sprite),
            Self::Text(text) => Some(text),
            Self::Container => None,
        }
    }

    /// Sprite, if this node is one
    pub fn as_sprite(&self) -> Option<&Sprite> {
        match self {
            Self::Sprite(sprite) => Some(sprite),
            _ => None,
        }
    }

    /// Mutable sprite, if this node is one
    pub fn as_sprite_mut(&mut self) -> Option<&mut Sprite> {
        match self {
            Self::Sprite(sprite) => Some(sprite),
            _ => None,
        }
    }

    /// Text, if this node is one
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Mutable text, if this node is one
    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Bring derived draw data up to date without advancing time
    pub fn refresh_layout(&mut self) {
        if let Self::Text(text) = self {
            text.refresh_layout();
        }
    }
}

impl Updatable for NodeKind {
    fn update(&mut self, delta_time: f32) {
        if let Self::Text(text) = self {
            text.update(delta_time);
        }
    }
}

impl From<Sprite> for NodeKind {
    fn from(sprite: Sprite) -> Self {
        Self::Sprite(sprite)
    }
}

impl From<Text> for NodeKind {
    fn from(text: Text) -> Self {
        Self::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sprite_alpha_keeps_color() {
        let mut sprite = Sprite::new(MaterialId(0), 10.0, 10.0);
        sprite.set_vertices_color(Vec4::new(0.3, 0.5, 0.7, 1.0));
        sprite.set_vertices_alpha(0.25);
        for color in sprite.vertices_color() {
            assert_relative_eq!(*color, Vec4::new(0.3, 0.5, 0.7, 0.25));
        }
    }

    #[test]
    fn test_sprite_takes_region_size() {
        let region = TextureRegion {
            uv: [0.0, 0.0, 0.5, 0.5],
            size: Vec2::new(64.0, 32.0),
        };
        let sprite = Sprite::new(MaterialId(0), 1.0, 1.0).with_region(region);
        assert_eq!(sprite.size(), Vec2::new(64.0, 32.0));
    }

    #[test]
    fn test_text_layout_refreshes_on_update() {
        let font = Rc::new(Font::monospace("mono", None, Vec2::new(8.0, 8.0), 8, "abc"));
        let mut text = Text::new(font, MaterialId(1), "ab");
        let mut quads = Vec::new();
        text.append_quads(&Mat4::identity(), &mut quads);
        assert!(quads.is_empty());

        text.update(0.016);
        text.append_quads(&Mat4::identity(), &mut quads);
        assert_eq!(quads.len(), 2);
        assert_relative_eq!(quads[1].vertices[0].position[0], 8.0);

        text.set_text("abc");
        assert!(text.is_dirty());
        text.update(0.016);
        assert_eq!(text.glyph_count(), 3);
    }
}
