//! Game trait and lifecycle management

use crate::audio::AudioError;
use crate::context::GameContext;
use crate::input::InputEvent;
use crate::render::BatchError;
use crate::scene::{SceneError, SceneManager};
use thiserror::Error;

/// Game lifecycle trait
///
/// Implement this trait to run a game on the [`GameDriver`](crate::GameDriver).
/// Each frame the driver calls `on_update` and then `on_render`, never
/// interleaved. Input arrives between frames.
pub trait Game {
    /// Called once before the first frame. Register materials and sounds,
    /// pick the first scene.
    fn on_init(&mut self, _ctx: &mut GameContext) -> Result<(), GameError> {
        Ok(())
    }

    /// Advance the simulation
    ///
    /// # Arguments
    /// * `timestamp` - Host timestamp in milliseconds
    /// * `delta_time` - Clamped time since the last frame in seconds
    fn on_update(&mut self, ctx: &mut GameContext, timestamp: f64, delta_time: f32) -> Result<(), GameError>;

    /// Draw the frame. The device has already been cleared and its state
    /// and statistics reset.
    fn on_render(&mut self, ctx: &mut GameContext) -> Result<(), GameError>;

    /// React to an input event. The context's input state already reflects it.
    fn on_input(&mut self, _ctx: &mut GameContext, _event: &InputEvent) -> Result<(), GameError> {
        Ok(())
    }

    /// Called once when the driver stops
    fn on_shutdown(&mut self, _ctx: &mut GameContext) {}
}

/// Game-level errors
#[derive(Error, Debug)]
pub enum GameError {
    /// Scene failure propagated to game level
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Batch protocol violation outside of scenes
    #[error("Render error: {0}")]
    Render(#[from] BatchError),

    /// Audio failure
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Custom game error
    #[error("Game error: {0}")]
    Custom(String),
}

/// A [`Game`] made of scenes.
///
/// Switches to the initial scene on init, runs the scene manager every
/// frame and routes input to the top scene.
#[derive(Debug)]
pub struct SceneGame {
    scenes: SceneManager,
    initial: String,
}

impl SceneGame {
    /// Wrap a manager whose scenes are already registered
    pub fn new(scenes: SceneManager, initial: &str) -> Self {
        Self {
            scenes,
            initial: initial.to_string(),
        }
    }

    /// The scene manager
    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    /// The scene manager, mutably
    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }
}

impl Game for SceneGame {
    fn on_init(&mut self, ctx: &mut GameContext) -> Result<(), GameError> {
        self.scenes.switch_to(ctx, &self.initial)?;
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut GameContext, _timestamp: f64, delta_time: f32) -> Result<(), GameError> {
        Ok(self.scenes.update(ctx, delta_time)?)
    }

    fn on_render(&mut self, ctx: &mut GameContext) -> Result<(), GameError> {
        Ok(self.scenes.render(ctx)?)
    }

    fn on_input(&mut self, ctx: &mut GameContext, event: &InputEvent) -> Result<(), GameError> {
        Ok(self.scenes.on_input(ctx, event)?)
    }

    fn on_shutdown(&mut self, ctx: &mut GameContext) {
        self.scenes.shutdown(ctx);
    }
}
