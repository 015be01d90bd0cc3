//! Headless render device
//!
//! Records every call instead of drawing. Used by tests, by servers that run
//! the simulation without a display, and by the sample game's console mode.

use super::device::{BufferId, ClearMask, DrawSubmission, RenderDevice, RenderStats, TextureId};
use super::material::{Material, MaterialId};
use super::vertex::SpriteVertex;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

/// A recorded vertex submission
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRecord {
    /// Target buffer
    pub buffer: BufferId,
    /// Material bound for the submission
    pub material: MaterialId,
    /// Uploaded vertices
    pub vertices: Vec<SpriteVertex>,
}

impl SubmissionRecord {
    /// Number of quads in the submission
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }
}

/// Everything a [`HeadlessDevice`] has seen
#[derive(Debug, Default)]
pub struct HeadlessLog {
    /// Submissions in call order
    pub submissions: Vec<SubmissionRecord>,
    /// Materials bound, in call order
    pub bound_materials: Vec<MaterialId>,
    /// Masks passed to `clear`
    pub clears: Vec<ClearMask>,
    /// Number of `reset_states` calls
    pub state_resets: usize,
    /// Last clear color
    pub clear_color: [f32; 4],
    /// Buffers created and not yet released
    pub live_buffers: HashSet<BufferId>,
    /// Textures created and not yet released
    pub live_textures: HashSet<TextureId>,
    /// Statistics since the last reset
    pub stats: RenderStats,
}

/// Shared read access to a [`HeadlessDevice`] log
#[derive(Clone)]
pub struct HeadlessRecorder {
    log: Rc<RefCell<HeadlessLog>>,
}

impl HeadlessRecorder {
    /// Borrow the log
    pub fn log(&self) -> std::cell::Ref<'_, HeadlessLog> {
        self.log.borrow()
    }

    /// Number of submissions so far
    pub fn submission_count(&self) -> usize {
        self.log.borrow().submissions.len()
    }

    /// Number of live buffers
    pub fn live_buffers(&self) -> usize {
        self.log.borrow().live_buffers.len()
    }

    /// Forget recorded calls (live resources are kept)
    pub fn clear_history(&self) {
        let mut log = self.log.borrow_mut();
        log.submissions.clear();
        log.bound_materials.clear();
        log.clears.clear();
        log.state_resets = 0;
    }
}

/// Render device that records calls and draws nothing
pub struct HeadlessDevice {
    width: u32,
    height: u32,
    next_id: u32,
    log: Rc<RefCell<HeadlessLog>>,
}

impl HeadlessDevice {
    /// Create a device with the given surface size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            next_id: 1,
            log: Rc::new(RefCell::new(HeadlessLog::default())),
        }
    }

    /// Handle for inspecting the log after the device has been boxed
    pub fn recorder(&self) -> HeadlessRecorder {
        HeadlessRecorder {
            log: self.log.clone(),
        }
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl RenderDevice for HeadlessDevice {
    fn clear(&mut self, mask: ClearMask) {
        self.log.borrow_mut().clears.push(mask);
    }

    fn reset_states(&mut self) {
        self.log.borrow_mut().state_resets += 1;
    }

    fn reset_statistics(&mut self) {
        self.log.borrow_mut().stats = RenderStats::default();
    }

    fn set_clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.log.borrow_mut().clear_color = [r, g, b, a];
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn bind_material(&mut self, material: &Material) {
        let mut log = self.log.borrow_mut();
        log.bound_materials.push(material.id);
        log.stats.material_binds += 1;
    }

    fn create_buffer(&mut self) -> BufferId {
        let buffer = BufferId(self.next_id());
        self.log.borrow_mut().live_buffers.insert(buffer);
        buffer
    }

    fn release_buffer(&mut self, buffer: BufferId) {
        if !self.log.borrow_mut().live_buffers.remove(&buffer) {
            log::warn!("Releasing unknown buffer {buffer:?}");
        }
    }

    fn submit(&mut self, submission: &DrawSubmission<'_>) {
        let mut log = self.log.borrow_mut();
        if !log.live_buffers.contains(&submission.buffer) {
            log::warn!("Submission into released buffer {:?}", submission.buffer);
        }
        log.stats.draw_calls += 1;
        log.stats.quads += submission.quad_count();
        log.submissions.push(SubmissionRecord {
            buffer: submission.buffer,
            material: submission.material,
            vertices: submission.vertices.to_vec(),
        });
    }

    fn statistics(&self) -> RenderStats {
        self.log.borrow().stats
    }

    fn create_texture(&mut self, width: u32, height: u32) -> TextureId {
        let texture = TextureId(self.next_id());
        log::trace!("Headless texture {texture:?} ({width}x{height})");
        self.log.borrow_mut().live_textures.insert(texture);
        texture
    }

    fn release_texture(&mut self, texture: TextureId) {
        self.log.borrow_mut().live_textures.remove(&texture);
    }
}
