//! Resources owned by one scene and the context handed to scene hooks

use super::game_scene::SceneResult;
use super::scene_graph::{GraphEdits, SceneGraph};
use super::scene_manager::SceneCommands;
use crate::actions::{ActionQueue, ActionScheduler};
use crate::assets::AssetBundle;
use crate::audio::SoundClip;
use crate::context::GameContext;
use crate::gui::GuiManager;
use crate::render::{BatchError, BatchRenderer, Camera2D, SpriteBatch, TextureId};
use std::rc::Rc;

/// Everything a scene acquires while loaded.
///
/// Owned by the scene's slot rather than by the scene itself, so it is
/// released on unload whatever the scene implementation does.
#[derive(Debug)]
pub struct SceneResources {
    /// Scene-local actions; paused with the scene
    pub actions: ActionScheduler,

    /// Scene entities
    pub graph: SceneGraph,

    /// Scene buttons
    pub gui: GuiManager,

    /// Camera the scene graph is drawn with
    pub camera: Camera2D,

    /// Material grouping for the scene's draw calls
    pub renderer: BatchRenderer,

    batch: Option<SpriteBatch>,
    assets: AssetBundle,
    textures: Vec<TextureId>,
    sounds: Vec<String>,
}

impl SceneResources {
    pub(crate) fn new(width: f32, height: f32) -> Self {
        Self {
            actions: ActionScheduler::new(),
            graph: SceneGraph::new(),
            gui: GuiManager::new(width, height),
            camera: Camera2D::new(width, height),
            renderer: BatchRenderer::new(),
            batch: None,
            assets: AssetBundle::default(),
            textures: Vec::new(),
            sounds: Vec::new(),
        }
    }

    /// Acquire device resources for a new load
    pub(crate) fn acquire(&mut self, game: &mut GameContext) {
        let (width, height) = (game.render.width() as f32, game.render.height() as f32);
        *self = Self::new(width, height);
        self.batch = Some(SpriteBatch::new(&mut game.render));
    }

    pub(crate) fn set_assets(&mut self, assets: AssetBundle) {
        self.assets = assets;
    }

    /// The scene's sprite batch (freed once the scene is unloaded)
    pub fn batch(&self) -> Option<&SpriteBatch> {
        self.batch.as_ref()
    }

    /// The scene's sprite batch, mutably
    pub fn batch_mut(&mut self) -> Option<&mut SpriteBatch> {
        self.batch.as_mut()
    }

    /// Assets loaded for the scene
    pub fn assets(&self) -> &AssetBundle {
        &self.assets
    }

    /// Textures created through [`SceneContext::create_texture`] and not yet released
    pub fn owned_textures(&self) -> &[TextureId] {
        &self.textures
    }

    /// Sounds registered through [`SceneContext::add_sound`] and not yet removed
    pub fn owned_sounds(&self) -> &[String] {
        &self.sounds
    }

    /// Draw the scene graph with the scene camera, then the GUI with its own
    pub fn draw(&mut self, game: &mut GameContext) -> SceneResult<()> {
        let batch = self.batch.as_mut().ok_or(BatchError::Freed)?;
        game.render.use_camera(&self.camera);
        self.graph.render(&mut game.render, batch, &mut self.renderer, &game.materials)?;
        if !self.gui.graph().is_empty() {
            game.render.use_camera(self.gui.camera());
            self.gui.graph_mut().render(&mut game.render, batch, &mut self.renderer, &game.materials)?;
        }
        Ok(())
    }

    /// Cancel every action and release every resource. Safe to call twice.
    ///
    /// Action queues and graph edit senders taken from this scene stop
    /// accepting work.
    pub(crate) fn release(&mut self, game: &mut GameContext) {
        self.actions.clear();
        self.graph.clear();
        self.gui.clear();
        if let Some(batch) = self.batch.as_mut() {
            batch.free(&mut game.render);
        }
        for texture in self.textures.drain(..) {
            game.render.device_mut().release_texture(texture);
        }
        for sound in self.sounds.drain(..) {
            game.audio.remove_sound(&sound);
        }
        self.assets = AssetBundle::default();
    }
}

/// What a scene hook can reach: the game-wide context and its own resources
pub struct SceneContext<'a> {
    /// Game-wide context
    pub game: &'a mut GameContext,
    /// The scene's own resources
    pub scene: &'a mut SceneResources,
}

impl SceneContext<'_> {
    /// The scene's action scheduler
    pub fn actions(&mut self) -> &mut ActionScheduler {
        &mut self.scene.actions
    }

    /// Queue for scheduling scene actions from inside callbacks
    pub fn queue(&self) -> ActionQueue {
        self.scene.actions.queue()
    }

    /// Queue of the game-wide scheduler, which keeps running while the
    /// scene is paused
    pub fn global_queue(&self) -> ActionQueue {
        self.game.actions.queue()
    }

    /// Sender for edits to the scene graph, applied before the next
    /// entity update
    pub fn graph_edits(&self) -> GraphEdits {
        self.scene.graph.edits()
    }

    /// Sender for scene switches and modals
    pub fn commands(&self) -> SceneCommands {
        self.game.commands()
    }

    /// Create a texture that is released when the scene unloads
    pub fn create_texture(&mut self, width: u32, height: u32) -> TextureId {
        let texture = self.game.render.device_mut().create_texture(width, height);
        self.scene.textures.push(texture);
        texture
    }

    /// Register a sound that is removed when the scene unloads
    pub fn add_sound(&mut self, clip: Rc<SoundClip>, name: &str) {
        self.game.audio.add_sound(clip, name);
        self.scene.sounds.push(name.to_string());
    }

    /// Play a registered sound
    pub fn play_sound(&mut self, name: &str) -> SceneResult<()> {
        Ok(self.game.audio.play_sound(name)?)
    }

    /// Default scene drawing, see [`SceneResources::draw`]
    pub fn draw(&mut self) -> SceneResult<()> {
        self.scene.draw(self.game)
    }
}
