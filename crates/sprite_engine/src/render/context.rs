//! Render context: the device plus the state shared by every batch

use super::camera::Camera2D;
use super::device::{ClearMask, RenderDevice, RenderStats};
use crate::config::RenderConfig;
use crate::foundation::math::Mat4;

/// Identity of a [`SpriteBatch`](super::SpriteBatch) within one context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchId(pub(crate) u32);

/// Owns the render device and the open-batch guard.
///
/// Only one batch may sit between `start` and `finish` at any time. The
/// guard lives here, not in the batches, because the bound material is a
/// single piece of device state.
pub struct RenderContext {
    device: Box<dyn RenderDevice>,
    open_batch: Option<BatchId>,
    next_batch_id: u32,
    view_projection: Mat4,
    max_quads_per_batch: usize,
    clear_color: [f32; 4],
}

impl RenderContext {
    /// Wrap a device
    pub fn new(device: Box<dyn RenderDevice>, config: &RenderConfig) -> Self {
        let mut context = Self {
            device,
            open_batch: None,
            next_batch_id: 0,
            view_projection: Mat4::identity(),
            max_quads_per_batch: config.max_quads_per_batch.max(1),
            clear_color: config.clear_color,
        };
        let [r, g, b, a] = context.clear_color;
        context.device.set_clear_color(r, g, b, a);
        context
    }

    /// Borrow the device
    pub fn device(&self) -> &dyn RenderDevice {
        self.device.as_ref()
    }

    /// Borrow the device mutably
    pub fn device_mut(&mut self) -> &mut dyn RenderDevice {
        self.device.as_mut()
    }

    /// Surface width in pixels
    pub fn width(&self) -> u32 {
        self.device.width()
    }

    /// Surface height in pixels
    pub fn height(&self) -> u32 {
        self.device.height()
    }

    /// Clear the frame and reset device state and statistics
    pub fn begin_frame(&mut self) {
        self.device.clear(ClearMask::ALL);
        self.device.reset_states();
        self.device.reset_statistics();
    }

    /// Change the clear color
    pub fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear_color = color;
        let [r, g, b, a] = color;
        self.device.set_clear_color(r, g, b, a);
    }

    /// Statistics since the frame began
    pub fn statistics(&self) -> RenderStats {
        self.device.statistics()
    }

    /// Use `camera` for subsequent submissions
    pub fn use_camera(&mut self, camera: &Camera2D) {
        self.view_projection = camera.view_projection();
    }

    /// Set the view-projection matrix directly
    pub fn set_view_projection(&mut self, view_projection: Mat4) {
        self.view_projection = view_projection;
    }

    /// Current view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.view_projection
    }

    /// Quads a batch accumulates before flushing on its own
    pub fn max_quads_per_batch(&self) -> usize {
        self.max_quads_per_batch
    }

    /// The batch currently between `start` and `finish`, if any
    pub fn open_batch(&self) -> Option<BatchId> {
        self.open_batch
    }

    pub(crate) fn allocate_batch_id(&mut self) -> BatchId {
        let id = BatchId(self.next_batch_id);
        self.next_batch_id = self.next_batch_id.wrapping_add(1);
        id
    }

    pub(crate) fn set_open_batch(&mut self, batch: Option<BatchId>) {
        self.open_batch = batch;
    }
}
