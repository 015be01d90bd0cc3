//! Sprite batch: the start / draw / finish protocol
//!
//! A batch collects quads for one material and hands them to the device in
//! as few submissions as possible. Protocol violations are returned as
//! [`BatchError`]s; they indicate a bug in the caller's render code.

use super::batch_renderer::{BatchError, BatchResult};
use super::context::{BatchId, RenderContext};
use super::device::{BufferId, DrawSubmission};
use super::material::{Material, MaterialId};
use super::vertex::{Quad, SpriteVertex};
use crate::foundation::math::Mat4;

/// Something that turns into quads when drawn
pub trait Drawable {
    /// Material the quads must be drawn with
    fn material(&self) -> MaterialId;

    /// Append this object's quads, transformed by `world`
    fn append_quads(&self, world: &Mat4, out: &mut Vec<Quad>);
}

/// Quad accumulator bound to one device buffer
#[derive(Debug)]
pub struct SpriteBatch {
    id: BatchId,
    buffer: Option<BufferId>,
    material: Option<MaterialId>,
    quads: Vec<Quad>,
    submissions: usize,
}

impl SpriteBatch {
    /// Create a batch and allocate its device buffer
    pub fn new(ctx: &mut RenderContext) -> Self {
        let id = ctx.allocate_batch_id();
        let buffer = ctx.device_mut().create_buffer();
        Self {
            id,
            buffer: Some(buffer),
            material: None,
            quads: Vec::with_capacity(ctx.max_quads_per_batch()),
            submissions: 0,
        }
    }

    /// Bind `material` and begin accumulating
    pub fn start(&mut self, ctx: &mut RenderContext, material: &Material) -> BatchResult<()> {
        self.live_buffer()?;
        if self.material.is_some() {
            return Err(BatchError::AlreadyStarted);
        }
        if let Some(open) = ctx.open_batch() {
            return Err(BatchError::AnotherBatchOpen(open));
        }

        ctx.set_open_batch(Some(self.id));
        ctx.device_mut().bind_material(material);
        self.material = Some(material.id);
        Ok(())
    }

    /// Append `drawable` transformed by `world`.
    ///
    /// The drawable must use the material the batch was started with.
    pub fn draw(&mut self, ctx: &mut RenderContext, drawable: &dyn Drawable, world: &Mat4) -> BatchResult<()> {
        self.ensure_open()?;
        drawable.append_quads(world, &mut self.quads);
        self.flush_full(ctx)
    }

    /// Append one ready-made quad
    pub fn draw_quad(&mut self, ctx: &mut RenderContext, quad: Quad) -> BatchResult<()> {
        self.ensure_open()?;
        self.quads.push(quad);
        self.flush_full(ctx)
    }

    /// Submit what is pending and close the bracket. An empty bracket submits
    /// nothing.
    pub fn finish(&mut self, ctx: &mut RenderContext) -> BatchResult<()> {
        let buffer = self.live_buffer()?;
        let material = self.material.ok_or(BatchError::NotStarted)?;
        self.submit(ctx, buffer, material);
        self.material = None;
        ctx.set_open_batch(None);
        Ok(())
    }

    /// Release the device buffer. Every later call fails with
    /// [`BatchError::Freed`]; freeing twice is a no-op.
    pub fn free(&mut self, ctx: &mut RenderContext) {
        let Some(buffer) = self.buffer.take() else {
            return;
        };
        if self.material.take().is_some() {
            log::warn!("Freeing batch {:?} while open, dropping {} quads", self.id, self.quads.len());
            if ctx.open_batch() == Some(self.id) {
                ctx.set_open_batch(None);
            }
        }
        self.quads = Vec::new();
        ctx.device_mut().release_buffer(buffer);
    }

    /// Whether the batch is between `start` and `finish`
    pub fn is_open(&self) -> bool {
        self.material.is_some()
    }

    /// Whether [`free`](Self::free) has been called
    pub fn is_freed(&self) -> bool {
        self.buffer.is_none()
    }

    /// Quads waiting for the next submission
    pub fn pending_quads(&self) -> usize {
        self.quads.len()
    }

    /// Submissions made over the batch's lifetime
    pub fn submissions(&self) -> usize {
        self.submissions
    }

    fn live_buffer(&self) -> BatchResult<BufferId> {
        self.buffer.ok_or(BatchError::Freed)
    }

    fn ensure_open(&self) -> BatchResult<(BufferId, MaterialId)> {
        let buffer = self.live_buffer()?;
        let material = self.material.ok_or(BatchError::NotStarted)?;
        Ok((buffer, material))
    }

    fn flush_full(&mut self, ctx: &mut RenderContext) -> BatchResult<()> {
        let (buffer, material) = self.ensure_open()?;
        let max = ctx.max_quads_per_batch();
        while self.quads.len() >= max {
            let rest = self.quads.split_off(max);
            log::trace!("Batch {:?} full at {max} quads, flushing", self.id);
            self.submit(ctx, buffer, material);
            self.quads = rest;
        }
        Ok(())
    }

    fn submit(&mut self, ctx: &mut RenderContext, buffer: BufferId, material: MaterialId) {
        if self.quads.is_empty() {
            return;
        }
        let vertices: &[SpriteVertex] = bytemuck::cast_slice(&self.quads);
        let submission = DrawSubmission {
            buffer,
            material,
            view_projection: ctx.view_projection(),
            vertices,
        };
        ctx.device_mut().submit(&submission);
        self.submissions += 1;
        self.quads.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::render::{BlendMode, HeadlessDevice, HeadlessRecorder, MaterialLibrary};

    fn setup(max_quads: usize) -> (RenderContext, HeadlessRecorder, Material) {
        let device = HeadlessDevice::new(800, 600);
        let recorder = device.recorder();
        let config = RenderConfig {
            max_quads_per_batch: max_quads,
            ..Default::default()
        };
        let ctx = RenderContext::new(Box::new(device), &config);
        let mut library = MaterialLibrary::new();
        let id = library.register("blank", "sprite", None, BlendMode::Alpha);
        let material = library.get(id).cloned().unwrap();
        (ctx, recorder, material)
    }

    #[test]
    fn test_draw_outside_bracket_fails() {
        let (mut ctx, _, _) = setup(16);
        let mut batch = SpriteBatch::new(&mut ctx);
        assert!(matches!(batch.draw_quad(&mut ctx, Quad::default()), Err(BatchError::NotStarted)));
        assert!(matches!(batch.finish(&mut ctx), Err(BatchError::NotStarted)));
    }

    #[test]
    fn test_empty_bracket_is_a_no_op() {
        let (mut ctx, recorder, material) = setup(16);
        let mut batch = SpriteBatch::new(&mut ctx);
        batch.start(&mut ctx, &material).unwrap();
        batch.finish(&mut ctx).unwrap();
        assert_eq!(recorder.submission_count(), 0);
        assert!(ctx.open_batch().is_none());
    }

    #[test]
    fn test_nested_start_fails() {
        let (mut ctx, _, material) = setup(16);
        let mut batch = SpriteBatch::new(&mut ctx);
        batch.start(&mut ctx, &material).unwrap();
        assert!(matches!(batch.start(&mut ctx, &material), Err(BatchError::AlreadyStarted)));
        // the first bracket is still intact
        batch.draw_quad(&mut ctx, Quad::default()).unwrap();
        batch.finish(&mut ctx).unwrap();
    }

    #[test]
    fn test_one_open_batch_system_wide() {
        let (mut ctx, _, material) = setup(16);
        let mut first = SpriteBatch::new(&mut ctx);
        let mut second = SpriteBatch::new(&mut ctx);
        first.start(&mut ctx, &material).unwrap();
        assert!(matches!(second.start(&mut ctx, &material), Err(BatchError::AnotherBatchOpen(_))));
        first.finish(&mut ctx).unwrap();
        second.start(&mut ctx, &material).unwrap();
        second.finish(&mut ctx).unwrap();
    }

    #[test]
    fn test_finish_submits_once() {
        let (mut ctx, recorder, material) = setup(16);
        let mut batch = SpriteBatch::new(&mut ctx);
        batch.start(&mut ctx, &material).unwrap();
        for _ in 0..5 {
            batch.draw_quad(&mut ctx, Quad::default()).unwrap();
        }
        assert_eq!(batch.pending_quads(), 5);
        batch.finish(&mut ctx).unwrap();

        let log = recorder.log();
        assert_eq!(log.submissions.len(), 1);
        assert_eq!(log.submissions[0].quad_count(), 5);
        assert_eq!(log.submissions[0].material, material.id);
        assert_eq!(log.bound_materials, vec![material.id]);
    }

    #[test]
    fn test_full_batch_flushes_early() {
        let (mut ctx, recorder, material) = setup(2);
        let mut batch = SpriteBatch::new(&mut ctx);
        batch.start(&mut ctx, &material).unwrap();
        for _ in 0..3 {
            batch.draw_quad(&mut ctx, Quad::default()).unwrap();
        }
        batch.finish(&mut ctx).unwrap();

        let counts: Vec<_> = recorder.log().submissions.iter().map(|s| s.quad_count()).collect();
        assert_eq!(counts, vec![2, 1]);
        assert_eq!(ctx.statistics().quads, 3);
    }

    #[test]
    fn test_freed_batch_rejects_calls() {
        let (mut ctx, recorder, material) = setup(16);
        let mut batch = SpriteBatch::new(&mut ctx);
        assert_eq!(recorder.live_buffers(), 1);
        batch.start(&mut ctx, &material).unwrap();
        batch.free(&mut ctx);
        batch.free(&mut ctx);

        assert_eq!(recorder.live_buffers(), 0);
        assert!(ctx.open_batch().is_none());
        assert!(matches!(batch.start(&mut ctx, &material), Err(BatchError::Freed)));
        assert!(matches!(batch.draw_quad(&mut ctx, Quad::default()), Err(BatchError::Freed)));
        assert!(matches!(batch.finish(&mut ctx), Err(BatchError::Freed)));
    }
}
