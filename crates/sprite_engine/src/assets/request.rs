//! Named asset requests and the bundles they resolve into

use super::atlas::TextureAtlas;
use super::deferred::Deferred;
use super::font::Font;
use super::loader::{Asset, AssetKind, AssetLoader, TextureInfo};
use super::AssetError;
use crate::audio::SoundClip;
use std::collections::HashMap;
use std::rc::Rc;
use std::task::Poll;

#[derive(Debug, Clone, PartialEq, Eq)]
struct RequestEntry {
    name: String,
    kind: AssetKind,
    path: String,
}

/// Assets a scene needs before it can become ready
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetRequest {
    entries: Vec<RequestEntry>,
}

impl AssetRequest {
    /// Create an empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Request `path` as `kind` under `name`
    pub fn add(&mut self, name: &str, kind: AssetKind, path: &str) -> &mut Self {
        self.entries.push(RequestEntry {
            name: name.to_string(),
            kind,
            path: path.to_string(),
        });
        self
    }

    /// Request a texture
    pub fn texture(&mut self, name: &str, path: &str) -> &mut Self {
        self.add(name, AssetKind::Texture, path)
    }

    /// Request a texture atlas
    pub fn atlas(&mut self, name: &str, path: &str) -> &mut Self {
        self.add(name, AssetKind::Atlas, path)
    }

    /// Request a font
    pub fn font(&mut self, name: &str, path: &str) -> &mut Self {
        self.add(name, AssetKind::Font, path)
    }

    /// Request a sound clip
    pub fn sound(&mut self, name: &str, path: &str) -> &mut Self {
        self.add(name, AssetKind::Sound, path)
    }

    /// Number of requested assets
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is requested
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ask `loader` for every entry
    pub fn start(&self, loader: &mut dyn AssetLoader) -> PendingBundle {
        let pending = self
            .entries
            .iter()
            .map(|entry| PendingEntry {
                name: entry.name.clone(),
                kind: entry.kind,
                path: entry.path.clone(),
                deferred: loader.load(entry.kind, &entry.path),
            })
            .collect();
        PendingBundle {
            pending,
            bundle: AssetBundle::default(),
        }
    }
}

/// Loaded assets, looked up by request name
#[derive(Debug, Clone, Default)]
pub struct AssetBundle {
    assets: HashMap<String, Asset>,
}

impl AssetBundle {
    /// Raw asset by name
    pub fn get(&self, name: &str) -> Result<&Asset, AssetError> {
        self.assets.get(name).ok_or_else(|| AssetError::NotFound(name.to_string()))
    }

    /// Texture by name
    pub fn texture(&self, name: &str) -> Result<TextureInfo, AssetError> {
        match self.get(name)? {
            Asset::Texture(info) => Ok(*info),
            other => Err(wrong_kind(name, AssetKind::Texture, other)),
        }
    }

    /// Atlas by name
    pub fn atlas(&self, name: &str) -> Result<Rc<TextureAtlas>, AssetError> {
        match self.get(name)? {
            Asset::Atlas(atlas) => Ok(atlas.clone()),
            other => Err(wrong_kind(name, AssetKind::Atlas, other)),
        }
    }

    /// Font by name
    pub fn font(&self, name: &str) -> Result<Rc<Font>, AssetError> {
        match self.get(name)? {
            Asset::Font(font) => Ok(font.clone()),
            other => Err(wrong_kind(name, AssetKind::Font, other)),
        }
    }

    /// Sound clip by name
    pub fn sound(&self, name: &str) -> Result<Rc<SoundClip>, AssetError> {
        match self.get(name)? {
            Asset::Sound(sound) => Ok(sound.clone()),
            other => Err(wrong_kind(name, AssetKind::Sound, other)),
        }
    }

    /// Number of assets
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the bundle is empty
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

fn wrong_kind(name: &str, expected: AssetKind, found: &Asset) -> AssetError {
    AssetError::WrongKind {
        name: name.to_string(),
        expected,
        found: found.kind(),
    }
}

#[derive(Debug)]
struct PendingEntry {
    name: String,
    kind: AssetKind,
    path: String,
    deferred: Deferred<Asset>,
}

/// An [`AssetRequest`] in flight. Dropping it cancels every outstanding load.
#[derive(Debug)]
pub struct PendingBundle {
    pending: Vec<PendingEntry>,
    bundle: AssetBundle,
}

impl PendingBundle {
    /// Poll every outstanding load. The first failure fails the bundle.
    pub fn poll(&mut self) -> Poll<Result<AssetBundle, AssetError>> {
        let mut index = 0;
        while index < self.pending.len() {
            match self.pending[index].deferred.poll() {
                Poll::Pending => index += 1,
                Poll::Ready(Ok(asset)) => {
                    let entry = self.pending.swap_remove(index);
                    if asset.kind() != entry.kind {
                        return Poll::Ready(Err(AssetError::WrongKind {
                            name: entry.path,
                            expected: entry.kind,
                            found: asset.kind(),
                        }));
                    }
                    log::debug!("Loaded {} '{}' from {}", entry.kind, entry.name, entry.path);
                    self.bundle.assets.insert(entry.name, asset);
                }
                Poll::Ready(Err(error)) => {
                    log::warn!("Failed to load {} '{}': {error}", self.pending[index].kind, self.pending[index].path);
                    self.pending.clear();
                    return Poll::Ready(Err(error));
                }
            }
        }

        if self.pending.is_empty() {
            Poll::Ready(Ok(std::mem::take(&mut self.bundle)))
        } else {
            Poll::Pending
        }
    }

    /// Loads still outstanding
    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{ManualLoader, MemoryLoader};
    use crate::foundation::math::Vec2;

    #[test]
    fn test_empty_request_is_ready() {
        let mut loader = MemoryLoader::new();
        let mut pending = AssetRequest::new().start(&mut loader);
        assert!(matches!(pending.poll(), Poll::Ready(Ok(bundle)) if bundle.is_empty()));
    }

    #[test]
    fn test_bundle_fills_as_loads_resolve() {
        let (mut loader, control) = ManualLoader::new();
        let mut request = AssetRequest::new();
        request.font("ui", "fonts/ui.fnt").sound("click", "sfx/click.ogg");
        let mut pending = request.start(&mut loader);
        assert!(pending.poll().is_pending());

        let font = Font::monospace("ui", None, Vec2::new(8.0, 8.0), 16, "abc");
        control.resolve("fonts/ui.fnt", Ok(Asset::Font(Rc::new(font))));
        assert!(pending.poll().is_pending());
        assert_eq!(pending.outstanding(), 1);

        control.resolve("sfx/click.ogg", Ok(Asset::Sound(Rc::new(SoundClip::new("click", 0.2)))));
        let Poll::Ready(Ok(bundle)) = pending.poll() else {
            panic!("bundle should be ready");
        };
        assert_eq!(bundle.font("ui").unwrap().name(), "ui");
        assert!(matches!(bundle.texture("ui"), Err(AssetError::WrongKind { .. })));
        assert!(matches!(bundle.sound("nope"), Err(AssetError::NotFound(_))));
    }

    #[test]
    fn test_first_failure_fails_bundle_and_cancels_rest() {
        let (mut loader, control) = ManualLoader::new();
        let mut request = AssetRequest::new();
        request.texture("a", "a.png").texture("b", "b.png");
        let mut pending = request.start(&mut loader);

        control.fail("a.png", "404");
        assert!(matches!(pending.poll(), Poll::Ready(Err(AssetError::Failed { .. }))));
        assert_eq!(control.live_requests(), 0);
    }
}
