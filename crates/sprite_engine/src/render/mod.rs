//! Sprite rendering
//!
//! The engine draws textured quads through an abstract [`RenderDevice`].
//! Quads are accumulated by a [`SpriteBatch`] between `start` and `finish`
//! and handed to the device in one submission per material.

pub mod batch;
pub mod batch_renderer;
pub mod camera;
pub mod context;
pub mod device;
pub mod headless;
pub mod material;
pub mod vertex;

pub use batch::{Drawable, SpriteBatch};
pub use batch_renderer::{BatchError, BatchRenderer, BatchResult, BatchStats, DrawItem};
pub use camera::Camera2D;
pub use context::{BatchId, RenderContext};
pub use device::{BufferId, ClearMask, DrawSubmission, RenderDevice, RenderStats, TextureId};
pub use headless::{HeadlessDevice, HeadlessLog, HeadlessRecorder, SubmissionRecord};
pub use material::{BlendMode, Material, MaterialId, MaterialLibrary};
pub use vertex::{Quad, SpriteVertex};
