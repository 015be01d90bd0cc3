//! Sprite vertex layout

use crate::foundation::math::{Mat4, Point3, Vec2, Vec4};
use bytemuck::{Pod, Zeroable};

/// One sprite vertex as uploaded to the device
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    /// World position
    pub position: [f32; 3],
    /// Texture coordinates
    pub uv: [f32; 2],
    /// RGBA color
    pub color: [f32; 4],
}

/// Four vertices of a quad: top-left, top-right, bottom-right, bottom-left
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Quad {
    /// Corner vertices
    pub vertices: [SpriteVertex; 4],
}

impl Quad {
    /// Build a `width` x `height` quad whose origin sits at `pivot` (normalised,
    /// `(0, 0)` top-left) and transform it by `world`.
    ///
    /// `uv` is `[u0, v0, u1, v1]`; `colors` holds one color per corner.
    pub fn from_rect(world: &Mat4, size: Vec2, pivot: Vec2, uv: [f32; 4], colors: &[Vec4; 4]) -> Self {
        let left = -pivot.x * size.x;
        let top = -pivot.y * size.y;
        let corners = [
            (left, top, uv[0], uv[1]),
            (left + size.x, top, uv[2], uv[1]),
            (left + size.x, top + size.y, uv[2], uv[3]),
            (left, top + size.y, uv[0], uv[3]),
        ];

        let mut quad = Self::default();
        for (vertex, ((x, y, u, v), color)) in quad.vertices.iter_mut().zip(corners.into_iter().zip(colors)) {
            let p = world.transform_point(&Point3::new(x, y, 0.0));
            *vertex = SpriteVertex {
                position: [p.x, p.y, p.z],
                uv: [u, v],
                color: [color.x, color.y, color.z, color.w],
            };
        }
        quad
    }
}
