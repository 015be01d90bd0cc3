//! Scene capabilities and errors

use super::lifecycle::SceneState;
use super::resources::SceneContext;
use super::scene_graph::GraphError;
use crate::assets::{AssetBundle, AssetError, AssetRequest};
use crate::audio::AudioError;
use crate::foundation::math::Vec2;
use crate::gui::GuiEvent;
use crate::input::{KeyCode, MouseButton};
use crate::render::BatchError;
use thiserror::Error;

/// Result type for scene operations
pub type SceneResult<T> = Result<T, SceneError>;

/// Scene errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// An asset the scene requested failed to load
    #[error("Scene '{scene}' failed to load: {source}")]
    Load {
        /// Scene name
        scene: String,
        /// What went wrong
        source: AssetError,
    },

    /// Operation not allowed in the scene's current state
    #[error("Cannot {operation} scene '{scene}' while {state}")]
    InvalidTransition {
        /// Scene name
        scene: String,
        /// State at the time of the call
        state: SceneState,
        /// Attempted operation
        operation: &'static str,
    },

    /// No scene registered under this name
    #[error("Unknown scene: {0}")]
    UnknownScene(String),

    /// Batch protocol violation while rendering
    #[error("Render error: {0}")]
    Render(#[from] BatchError),

    /// Scene graph misuse
    #[error("Scene graph error: {0}")]
    Graph(#[from] GraphError),

    /// Asset lookup failed
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Audio failure
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// Game specific failure
    #[error("{0}")]
    Custom(String),
}

/// Something that needs assets before it can run
pub trait Loadable {
    /// Describe the assets to fetch. Called once per load.
    fn request_assets(&self, _request: &mut AssetRequest) {}

    /// Every requested asset is available; build the scene
    fn on_loaded(&mut self, ctx: &mut SceneContext<'_>, assets: &AssetBundle) -> SceneResult<()>;

    /// The scene is about to lose its resources. Scene-owned schedulers,
    /// graphs, batches, textures and sounds are released after this returns.
    fn on_unload(&mut self, _ctx: &mut SceneContext<'_>) {}
}

/// A gameplay or menu context with its own entities and schedulers.
///
/// Every hook gets a [`SceneContext`] giving access to the game-wide context
/// and to the resources the scene owns. Input hooks only run while the scene
/// is ready (not paused).
pub trait Scene: Loadable {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Per-frame logic. Runs after the scene's actions, entities and GUI
    /// have been updated.
    fn update(&mut self, _ctx: &mut SceneContext<'_>, _delta_time: f32) -> SceneResult<()> {
        Ok(())
    }

    /// Draw the scene. The default draws the scene graph with the scene
    /// camera, then the GUI.
    fn render(&mut self, ctx: &mut SceneContext<'_>) -> SceneResult<()> {
        ctx.draw()
    }

    /// The scene was paused (`true`) or resumed (`false`)
    fn on_pause(&mut self, _ctx: &mut SceneContext<'_>, _paused: bool) {}

    /// A GUI button was pressed, released or clicked
    fn on_gui_event(&mut self, _ctx: &mut SceneContext<'_>, _event: &GuiEvent) -> SceneResult<()> {
        Ok(())
    }

    /// Pointer button pressed outside any GUI button
    fn on_mouse_down(&mut self, _ctx: &mut SceneContext<'_>, _position: Vec2, _button: MouseButton) -> SceneResult<()> {
        Ok(())
    }

    /// Pointer button released, unless it ended a GUI press
    fn on_mouse_up(&mut self, _ctx: &mut SceneContext<'_>, _position: Vec2, _button: MouseButton) -> SceneResult<()> {
        Ok(())
    }

    /// Pointer moved
    fn on_mouse_move(&mut self, _ctx: &mut SceneContext<'_>, _position: Vec2) -> SceneResult<()> {
        Ok(())
    }

    /// Key pressed
    fn on_key_down(&mut self, _ctx: &mut SceneContext<'_>, _key: KeyCode) -> SceneResult<()> {
        Ok(())
    }

    /// Key released
    fn on_key_up(&mut self, _ctx: &mut SceneContext<'_>, _key: KeyCode) -> SceneResult<()> {
        Ok(())
    }
}
