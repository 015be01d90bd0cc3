//! Render device abstraction
//!
//! The engine never talks to a GPU API directly. Everything it needs from
//! the graphics backend goes through [`RenderDevice`].

use super::material::{Material, MaterialId};
use super::vertex::SpriteVertex;
use crate::foundation::math::Mat4;

/// Handle to a vertex buffer owned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

/// Handle to a texture owned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

bitflags::bitflags! {
    /// Buffers affected by [`RenderDevice::clear`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearMask: u32 {
        /// Color buffer
        const COLOR = 1 << 0;
        /// Depth buffer
        const DEPTH = 1 << 1;
        /// Stencil buffer
        const STENCIL = 1 << 2;
        /// Every buffer
        const ALL = Self::COLOR.bits() | Self::DEPTH.bits() | Self::STENCIL.bits();
    }
}

/// Per-frame renderer statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Vertex submissions
    pub draw_calls: usize,
    /// Quads submitted
    pub quads: usize,
    /// Material binds
    pub material_binds: usize,
}

/// One vertex submission: a run of quads drawn with the bound material
#[derive(Debug, Clone, Copy)]
pub struct DrawSubmission<'a> {
    /// Buffer the vertices are uploaded into
    pub buffer: BufferId,
    /// Material that was bound when the batch started
    pub material: MaterialId,
    /// Camera transform for the submission
    pub view_projection: Mat4,
    /// Four vertices per quad
    pub vertices: &'a [SpriteVertex],
}

impl DrawSubmission<'_> {
    /// Number of quads in the submission
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }
}

/// Capabilities the engine consumes from a graphics backend
pub trait RenderDevice {
    /// Clear the selected frame buffers
    fn clear(&mut self, mask: ClearMask);

    /// Restore default pipeline state (no bound program, texture or blend)
    fn reset_states(&mut self);

    /// Zero the draw statistics
    fn reset_statistics(&mut self);

    /// Set the color used by [`clear`](Self::clear)
    fn set_clear_color(&mut self, r: f32, g: f32, b: f32, a: f32);

    /// Drawing surface width in pixels
    fn width(&self) -> u32;

    /// Drawing surface height in pixels
    fn height(&self) -> u32;

    /// Bind program, texture and blend mode of `material`
    fn bind_material(&mut self, material: &Material);

    /// Allocate a vertex buffer
    fn create_buffer(&mut self) -> BufferId;

    /// Release a vertex buffer
    fn release_buffer(&mut self, buffer: BufferId);

    /// Upload and draw a run of quads
    fn submit(&mut self, submission: &DrawSubmission<'_>);

    /// Statistics since the last reset
    fn statistics(&self) -> RenderStats;

    /// Allocate a texture of the given size
    fn create_texture(&mut self, width: u32, height: u32) -> TextureId;

    /// Release a texture
    fn release_texture(&mut self, texture: TextureId);
}
