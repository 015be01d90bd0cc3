//! # Batch Renderer
//!
//! Groups drawables by material and feeds each group through one
//! start / draw / finish bracket of a [`SpriteBatch`].
//!
//! ## Architecture
//!
//! - **BatchRenderer**: Sorts draw items into material groups and submits them
//! - **RenderBatch**: Draw items sharing one material
//! - **SpriteBatch**: Accumulates quads and talks to the device
//!
//! Groups keep the order in which their material was first seen, and items
//! keep their order inside a group, so output is deterministic.

use super::batch::{Drawable, SpriteBatch};
use super::context::{BatchId, RenderContext};
use super::material::{MaterialId, MaterialLibrary};
use crate::foundation::math::Mat4;
use crate::foundation::time::Stopwatch;

/// Result type for batch rendering operations
pub type BatchResult<T> = Result<T, BatchError>;

/// Errors that can occur during batch rendering
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BatchError {
    /// `start` called on a batch that is already open
    #[error("Batch already started")]
    AlreadyStarted,

    /// `draw` or `finish` called without a matching `start`
    #[error("Batch not started")]
    NotStarted,

    /// Another batch is between `start` and `finish`
    #[error("Another batch is open: {0:?}")]
    AnotherBatchOpen(BatchId),

    /// The batch has been freed
    #[error("Batch has been freed")]
    Freed,

    /// Invalid or unknown material ID requested
    #[error("Invalid material ID: {0:?}")]
    InvalidMaterial(MaterialId),
}

/// One drawable and its world transform
#[derive(Clone, Copy)]
pub struct DrawItem<'a> {
    /// What to draw
    pub drawable: &'a dyn Drawable,
    /// Where to draw it
    pub world: Mat4,
}

/// Draw items sharing a material
struct RenderBatch<'a> {
    material_id: MaterialId,
    items: Vec<DrawItem<'a>>,
}

/// Statistics for batch rendering performance monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Draw items processed
    pub total_items: usize,

    /// Start / finish brackets opened
    pub batch_count: usize,

    /// Device submissions, including early flushes
    pub submissions: usize,

    /// Time spent grouping items (microseconds)
    pub collection_time_us: u64,

    /// Time spent in brackets (microseconds)
    pub submission_time_us: u64,
}

impl BatchStats {
    /// Calculate average items per batch
    pub fn avg_items_per_batch(&self) -> f32 {
        if self.batch_count == 0 {
            0.0
        } else {
            self.total_items as f32 / self.batch_count as f32
        }
    }

    /// Get total frame time in microseconds
    pub fn total_time_us(&self) -> u64 {
        self.collection_time_us + self.submission_time_us
    }
}

/// Material-grouping front end for a [`SpriteBatch`]
#[derive(Debug, Default)]
pub struct BatchRenderer {
    stats: BatchStats,
}

impl BatchRenderer {
    /// Create a batch renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw `items` with one bracket per material.
    ///
    /// Every material must exist in `materials`; unknown ids are rejected
    /// before anything is submitted.
    pub fn render_groups(
        &mut self,
        ctx: &mut RenderContext,
        batch: &mut SpriteBatch,
        materials: &MaterialLibrary,
        items: &[DrawItem<'_>],
    ) -> BatchResult<&BatchStats> {
        let collection = Stopwatch::start_new();
        let groups = Self::group_by_material(items);
        if let Some(missing) = groups.iter().find(|g| materials.get(g.material_id).is_none()) {
            return Err(BatchError::InvalidMaterial(missing.material_id));
        }

        let mut stats = BatchStats {
            total_items: items.len(),
            collection_time_us: collection.elapsed_micros(),
            ..Default::default()
        };

        let submission = Stopwatch::start_new();
        let submissions_before = batch.submissions();
        for group in &groups {
            let Some(material) = materials.get(group.material_id) else {
                continue;
            };
            batch.start(ctx, material)?;
            for item in &group.items {
                batch.draw(ctx, item.drawable, &item.world)?;
            }
            batch.finish(ctx)?;
            stats.batch_count += 1;
        }
        stats.submissions = batch.submissions() - submissions_before;
        stats.submission_time_us = submission.elapsed_micros();

        self.stats = stats;
        Ok(&self.stats)
    }

    fn group_by_material<'a>(items: &[DrawItem<'a>]) -> Vec<RenderBatch<'a>> {
        let mut groups: Vec<RenderBatch<'a>> = Vec::new();
        for item in items {
            let material_id = item.drawable.material();
            match groups.iter_mut().find(|g| g.material_id == material_id) {
                Some(group) => group.items.push(*item),
                None => groups.push(RenderBatch {
                    material_id,
                    items: vec![*item],
                }),
            }
        }
        groups
    }

    /// Statistics of the last `render_groups` call
    pub fn stats(&self) -> &BatchStats {
        &self.stats
    }

    /// Reset statistics
    pub fn reset_stats(&mut self) {
        self.stats = BatchStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::render::{BlendMode, HeadlessDevice, Quad};

    struct Tile(MaterialId);

    impl Drawable for Tile {
        fn material(&self) -> MaterialId {
            self.0
        }

        fn append_quads(&self, _world: &Mat4, out: &mut Vec<Quad>) {
            out.push(Quad::default());
        }
    }

    #[test]
    fn test_groups_by_material_in_first_seen_order() {
        let device = HeadlessDevice::new(64, 64);
        let recorder = device.recorder();
        let mut ctx = RenderContext::new(Box::new(device), &RenderConfig::default());
        let mut materials = MaterialLibrary::new();
        let a = materials.register("a", "sprite", None, BlendMode::Alpha);
        let b = materials.register("b", "sprite", None, BlendMode::Additive);

        let tiles = [Tile(b), Tile(a), Tile(b), Tile(a), Tile(b)];
        let items: Vec<_> = tiles
            .iter()
            .map(|t| DrawItem {
                drawable: t,
                world: Mat4::identity(),
            })
            .collect();

        let mut batch = SpriteBatch::new(&mut ctx);
        let mut renderer = BatchRenderer::new();
        let stats = renderer.render_groups(&mut ctx, &mut batch, &materials, &items).unwrap().clone();

        assert_eq!(stats.batch_count, 2);
        assert_eq!(stats.submissions, 2);
        assert_eq!(stats.total_items, 5);
        let log = recorder.log();
        assert_eq!(log.bound_materials, vec![b, a]);
        assert_eq!(log.submissions[0].quad_count(), 3);
        assert_eq!(log.submissions[1].quad_count(), 2);
    }

    #[test]
    fn test_unknown_material_is_rejected() {
        let mut ctx = RenderContext::new(Box::new(HeadlessDevice::new(64, 64)), &RenderConfig::default());
        let materials = MaterialLibrary::new();
        let tile = Tile(MaterialId(9));
        let items = [DrawItem {
            drawable: &tile,
            world: Mat4::identity(),
        }];
        let mut batch = SpriteBatch::new(&mut ctx);
        let result = BatchRenderer::new().render_groups(&mut ctx, &mut batch, &materials, &items).map(|_| ());
        assert_eq!(result, Err(BatchError::InvalidMaterial(MaterialId(9))));
        assert!(ctx.open_batch().is_none());
    }

    #[test]
    fn test_batch_stats() {
        let stats = BatchStats {
            total_items: 100,
            batch_count: 10,
            ..Default::default()
        };
        assert!((stats.avg_items_per_batch() - 10.0).abs() < f32::EPSILON);
        assert_eq!(stats.total_time_us(), 0);
    }
}
