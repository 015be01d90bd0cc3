//! Asset loaders
//!
//! Fetching and decoding files is the host's business. The engine only asks a
//! loader for an asset by kind and path and polls the returned [`Deferred`].

use super::atlas::TextureAtlas;
use super::deferred::{deferred, Deferred, Resolver};
use super::font::Font;
use super::AssetError;
use crate::audio::SoundClip;
use crate::render::TextureId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// What kind of asset is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Plain texture
    Texture,
    /// Texture atlas
    Atlas,
    /// Bitmap font
    Font,
    /// Sound clip
    Sound,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Texture => "texture",
            Self::Atlas => "atlas",
            Self::Font => "font",
            Self::Sound => "sound",
        };
        f.write_str(name)
    }
}

/// A texture already uploaded to the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    /// Device handle
    pub id: TextureId,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// A loaded asset
#[derive(Debug, Clone)]
pub enum Asset {
    /// Texture
    Texture(TextureInfo),
    /// Texture atlas
    Atlas(Rc<TextureAtlas>),
    /// Bitmap font
    Font(Rc<Font>),
    /// Sound clip
    Sound(Rc<SoundClip>),
}

impl Asset {
    /// Kind of this asset
    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Texture(_) => AssetKind::Texture,
            Self::Atlas(_) => AssetKind::Atlas,
            Self::Font(_) => AssetKind::Font,
            Self::Sound(_) => AssetKind::Sound,
        }
    }
}

/// Source of assets
pub trait AssetLoader {
    /// Start loading `path`. The result arrives through the returned deferred.
    fn load(&mut self, kind: AssetKind, path: &str) -> Deferred<Asset>;
}

/// Loader serving assets registered up front. Results are ready immediately.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    assets: HashMap<String, Asset>,
}

impl MemoryLoader {
    /// Create an empty loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `asset` available under `path`
    pub fn insert(&mut self, path: &str, asset: Asset) -> &mut Self {
        self.assets.insert(path.to_string(), asset);
        self
    }

    /// Whether `path` is registered
    pub fn contains(&self, path: &str) -> bool {
        self.assets.contains_key(path)
    }
}

impl AssetLoader for MemoryLoader {
    fn load(&mut self, kind: AssetKind, path: &str) -> Deferred<Asset> {
        let result = match self.assets.get(path) {
            Some(asset) if asset.kind() == kind => Ok(asset.clone()),
            Some(asset) => Err(AssetError::WrongKind {
                name: path.to_string(),
                expected: kind,
                found: asset.kind(),
            }),
            None => Err(AssetError::NotFound(path.to_string())),
        };
        Deferred::ready(result)
    }
}

struct ManualRequest {
    kind: AssetKind,
    path: String,
    resolver: Resolver<Asset>,
}

/// Loader whose requests stay pending until resolved through a
/// [`ManualLoaderControl`]. Lets tests and tools step through loading.
#[derive(Default)]
pub struct ManualLoader {
    requests: Rc<RefCell<Vec<ManualRequest>>>,
}

impl ManualLoader {
    /// Create a loader and its control handle
    pub fn new() -> (Self, ManualLoaderControl) {
        let loader = Self::default();
        let control = ManualLoaderControl {
            requests: loader.requests.clone(),
        };
        (loader, control)
    }
}

impl AssetLoader for ManualLoader {
    fn load(&mut self, kind: AssetKind, path: &str) -> Deferred<Asset> {
        let (resolver, deferred) = deferred();
        self.requests.borrow_mut().push(ManualRequest {
            kind,
            path: path.to_string(),
            resolver,
        });
        deferred
    }
}

/// Resolves the requests of a [`ManualLoader`]
#[derive(Clone)]
pub struct ManualLoaderControl {
    requests: Rc<RefCell<Vec<ManualRequest>>>,
}

impl ManualLoaderControl {
    /// Paths still waiting, oldest first (cancelled requests included)
    pub fn pending(&self) -> Vec<(AssetKind, String)> {
        self.requests.borrow().iter().map(|r| (r.kind, r.path.clone())).collect()
    }

    /// Number of waiting requests whose consumer is still alive
    pub fn live_requests(&self) -> usize {
        self.requests.borrow().iter().filter(|r| !r.resolver.is_cancelled()).count()
    }

    /// Resolve the oldest request for `path`. Returns false if there is none
    /// or its consumer has been dropped.
    pub fn resolve(&self, path: &str, result: Result<Asset, AssetError>) -> bool {
        let request = {
            let mut requests = self.requests.borrow_mut();
            match requests.iter().position(|r| r.path == path) {
                Some(index) => requests.remove(index),
                None => return false,
            }
        };
        request.resolver.resolve(result)
    }

    /// Fail the oldest request for `path`
    pub fn fail(&self, path: &str, reason: &str) -> bool {
        self.resolve(
            path,
            Err(AssetError::Failed {
                path: path.to_string(),
                reason: reason.to_string(),
            }),
        )
    }
}
