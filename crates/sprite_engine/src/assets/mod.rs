//! Asset loading
//!
//! Scenes describe what they need in an [`AssetRequest`]. The request is
//! handed to an [`AssetLoader`] and polled every frame until the whole
//! [`AssetBundle`] is available. Nothing here blocks the frame loop.

pub mod atlas;
pub mod deferred;
pub mod font;
pub mod loader;
pub mod request;

pub use atlas::{TextureAtlas, TextureRegion};
pub use deferred::{deferred, Deferred, Resolver};
pub use font::{Font, Glyph, PlacedGlyph};
pub use loader::{Asset, AssetKind, AssetLoader, ManualLoader, ManualLoaderControl, MemoryLoader, TextureInfo};
pub use request::{AssetBundle, AssetRequest, PendingBundle};

use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// Nothing is registered under this name or path
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// The loader could not produce the asset
    #[error("Failed to load '{path}': {reason}")]
    Failed {
        /// Requested path
        path: String,
        /// Loader's explanation
        reason: String,
    },

    /// The loader dropped the request without answering
    #[error("Load request abandoned by the loader")]
    Abandoned,

    /// The asset exists but is of another kind
    #[error("Asset '{name}' is a {found}, expected a {expected}")]
    WrongKind {
        /// Name or path of the asset
        name: String,
        /// Requested kind
        expected: AssetKind,
        /// Actual kind
        found: AssetKind,
    },
}
