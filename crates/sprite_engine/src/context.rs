//! Game-wide context handed to games and scenes

use crate::actions::ActionScheduler;
use crate::assets::AssetLoader;
use crate::audio::{AudioBackend, AudioManager};
use crate::config::EngineConfig;
use crate::input::InputState;
use crate::render::{MaterialLibrary, RenderContext, RenderDevice};
use crate::scene::{SceneCommand, SceneCommands};
use std::fmt;

/// Shared engine state.
///
/// One per running game. Everything the engine provides is reached through
/// this value; there are no process-wide singletons.
pub struct GameContext {
    /// Render context (device, batch guard, current camera)
    pub render: RenderContext,

    /// Registered materials
    pub materials: MaterialLibrary,

    /// Named sounds
    pub audio: AudioManager,

    /// Keys and buttons currently held
    pub input: InputState,

    /// Game-wide actions. Updated by the driver every frame, including
    /// while scenes are paused.
    pub actions: ActionScheduler,

    /// Source of scene assets
    pub loader: Box<dyn AssetLoader>,

    /// Configuration the game was started with
    pub config: EngineConfig,

    commands: SceneCommands,
    inbox: flume::Receiver<SceneCommand>,
}

impl GameContext {
    /// Assemble a context from its capabilities
    pub fn new(
        config: EngineConfig,
        device: Box<dyn RenderDevice>,
        audio: Box<dyn AudioBackend>,
        loader: Box<dyn AssetLoader>,
    ) -> Self {
        let (sender, inbox) = flume::unbounded();
        let mut render = RenderContext::new(device, &config.render);
        render.set_clear_color(config.render.clear_color);
        Self {
            render,
            materials: MaterialLibrary::new(),
            audio: AudioManager::new(audio, config.audio.master_volume),
            input: InputState::new(),
            actions: ActionScheduler::new(),
            loader,
            commands: SceneCommands::new(sender),
            inbox,
            config,
        }
    }

    /// Sender for scene switches and modals
    pub fn commands(&self) -> SceneCommands {
        self.commands.clone()
    }

    /// Take every command posted since the last call
    pub(crate) fn drain_scene_commands(&self) -> Vec<SceneCommand> {
        self.inbox.drain().collect()
    }
}

impl fmt::Debug for GameContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameContext")
            .field("size", &(self.render.width(), self.render.height()))
            .field("materials", &self.materials.len())
            .field("actions", &self.actions)
            .field("queued_commands", &self.inbox.len())
            .finish_non_exhaustive()
    }
}
