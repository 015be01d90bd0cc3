//! Bitmap fonts and text layout

use crate::foundation::math::Vec2;
use crate::render::TextureId;
use std::collections::HashMap;

/// Metrics and texture coordinates of one glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// `[u0, v0, u1, v1]` in the font texture
    pub uv: [f32; 4],
    /// Quad size in pixels
    pub size: Vec2,
    /// Offset of the quad from the pen position
    pub offset: Vec2,
    /// Pen advance after the glyph
    pub advance: f32,
}

/// A glyph placed relative to the start of a text run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph {
    /// Top-left corner of the glyph quad
    pub position: Vec2,
    /// The glyph
    pub glyph: Glyph,
}

/// A bitmap font
#[derive(Debug, Clone)]
pub struct Font {
    name: String,
    texture: Option<TextureId>,
    line_height: f32,
    glyphs: HashMap<char, Glyph>,
}

impl Font {
    /// Create a font without glyphs
    pub fn new(name: &str, texture: Option<TextureId>, line_height: f32) -> Self {
        Self {
            name: name.to_string(),
            texture,
            line_height,
            glyphs: HashMap::new(),
        }
    }

    /// Fixed-width font laid out as a grid of `columns` cells, in the order of `chars`
    pub fn monospace(name: &str, texture: Option<TextureId>, cell: Vec2, columns: usize, chars: &str) -> Self {
        let columns = columns.max(1);
        let count = chars.chars().count();
        let rows = count.div_ceil(columns).max(1);
        let (cw, ch) = (1.0 / columns as f32, 1.0 / rows as f32);

        let mut font = Self::new(name, texture, cell.y);
        for (i, c) in chars.chars().enumerate() {
            let (col, row) = ((i % columns) as f32, (i / columns) as f32);
            font.add_glyph(
                c,
                Glyph {
                    uv: [col * cw, row * ch, (col + 1.0) * cw, (row + 1.0) * ch],
                    size: cell,
                    offset: Vec2::zeros(),
                    advance: cell.x,
                },
            );
        }
        font
    }

    /// Add or replace a glyph
    pub fn add_glyph(&mut self, c: char, glyph: Glyph) {
        self.glyphs.insert(c, glyph);
    }

    /// Font name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Texture holding the glyphs
    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    /// Distance between baselines
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Glyph for `c`, if the font has one
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(&c)
    }

    /// Place the glyphs of `text`. Characters without a glyph are skipped;
    /// `\n` starts a new line.
    pub fn layout(&self, text: &str) -> Vec<PlacedGlyph> {
        let mut placed = Vec::with_capacity(text.len());
        let mut pen = Vec2::zeros();
        for c in text.chars() {
            if c == '\n' {
                pen = Vec2::new(0.0, pen.y + self.line_height);
                continue;
            }
            let Some(glyph) = self.glyphs.get(&c) else {
                continue;
            };
            placed.push(PlacedGlyph {
                position: pen + glyph.offset,
                glyph: *glyph,
            });
            pen.x += glyph.advance;
        }
        placed
    }

    /// Width and height of the laid out text
    pub fn measure(&self, text: &str) -> Vec2 {
        let lines = text.split('\n');
        let mut size = Vec2::zeros();
        for line in lines {
            let width: f32 = line.chars().filter_map(|c| self.glyphs.get(&c)).map(|g| g.advance).sum();
            size.x = size.x.max(width);
            size.y += self.line_height;
        }
        size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn font() -> Font {
        Font::monospace("mono", None, Vec2::new(8.0, 16.0), 4, "abcdefgh")
    }

    #[test]
    fn test_monospace_grid() {
        let font = font();
        let glyph = font.glyph('f').unwrap();
        assert_relative_eq!(glyph.uv[0], 0.25);
        assert_relative_eq!(glyph.uv[1], 0.5);
        assert_relative_eq!(glyph.uv[3], 1.0);
    }

    #[test]
    fn test_layout_skips_unknown_and_wraps_lines() {
        let font = font();
        let placed = font.layout("ab?\nc");
        assert_eq!(placed.len(), 3);
        assert_eq!(placed[1].position, Vec2::new(8.0, 0.0));
        assert_eq!(placed[2].position, Vec2::new(0.0, 16.0));
        assert_eq!(font.measure("ab?\nc"), Vec2::new(16.0, 32.0));
    }
}
