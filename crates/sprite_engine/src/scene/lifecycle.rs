//! Scene lifecycle
//!
//! A [`SceneSlot`] owns one scene together with its resources and walks it
//! through `Unloaded -> Loading -> Ready <-> Paused -> Unloading -> Unloaded`.
//! Update and render refuse to run before the scene is ready.

use super::game_scene::{Scene, SceneError, SceneResult};
use super::resources::{SceneContext, SceneResources};
use crate::assets::{AssetRequest, PendingBundle};
use crate::context::GameContext;
use crate::foundation::math::Vec2;
use crate::input::{InputEvent, MouseButton};
use std::fmt;
use std::task::Poll;

/// Where a scene is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    /// Not loaded, owns nothing
    Unloaded,
    /// Waiting for assets
    Loading,
    /// Updating and rendering
    Ready,
    /// Rendered but not updated
    Paused,
    /// Releasing resources
    Unloading,
}

impl fmt::Display for SceneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SceneState::Unloaded => "unloaded",
            SceneState::Loading => "loading",
            SceneState::Ready => "ready",
            SceneState::Paused => "paused",
            SceneState::Unloading => "unloading",
        };
        f.write_str(name)
    }
}

/// A scene plus everything it owns
pub struct SceneSlot {
    scene: Box<dyn Scene>,
    state: SceneState,
    resources: SceneResources,
    pending: Option<PendingBundle>,
}

impl SceneSlot {
    /// Wrap an unloaded scene
    pub fn new(scene: Box<dyn Scene>) -> Self {
        Self {
            scene,
            state: SceneState::Unloaded,
            resources: SceneResources::new(0.0, 0.0),
            pending: None,
        }
    }

    /// Scene name
    pub fn name(&self) -> &str {
        self.scene.name()
    }

    /// Current lifecycle state
    pub fn state(&self) -> SceneState {
        self.state
    }

    /// Resources owned by the scene
    pub fn resources(&self) -> &SceneResources {
        &self.resources
    }

    /// Resources owned by the scene, mutably
    pub fn resources_mut(&mut self) -> &mut SceneResources {
        &mut self.resources
    }

    /// Whether the scene is updating and rendering
    pub fn is_ready(&self) -> bool {
        self.state == SceneState::Ready
    }

    fn invalid(&self, operation: &'static str) -> SceneError {
        SceneError::InvalidTransition {
            scene: self.name().to_string(),
            state: self.state,
            operation,
        }
    }

    /// Acquire resources and start fetching the scene's assets
    pub fn begin_load(&mut self, game: &mut GameContext) -> SceneResult<()> {
        if self.state != SceneState::Unloaded {
            return Err(self.invalid("load"));
        }
        log::info!("Loading scene '{}'", self.name());

        self.resources.acquire(game);
        let mut request = AssetRequest::new();
        self.scene.request_assets(&mut request);
        self.pending = Some(request.start(game.loader.as_mut()));
        self.state = SceneState::Loading;
        Ok(())
    }

    /// Poll the outstanding assets. Returns `Ok(true)` once the scene is ready.
    ///
    /// On failure the scene goes back to `Unloaded` with every resource it
    /// acquired released.
    pub fn poll_load(&mut self, game: &mut GameContext) -> SceneResult<bool> {
        match self.state {
            SceneState::Loading => {}
            SceneState::Ready | SceneState::Paused => return Ok(true),
            _ => return Err(self.invalid("poll")),
        }

        let Some(pending) = self.pending.as_mut() else {
            return Err(self.invalid("poll"));
        };
        let bundle = match pending.poll() {
            Poll::Pending => return Ok(false),
            Poll::Ready(result) => result,
        };
        self.pending = None;

        let bundle = match bundle {
            Ok(bundle) => bundle,
            Err(source) => {
                self.abort_load(game);
                return Err(SceneError::Load {
                    scene: self.name().to_string(),
                    source,
                });
            }
        };

        let mut ctx = SceneContext {
            game: &mut *game,
            scene: &mut self.resources,
        };
        if let Err(error) = self.scene.on_loaded(&mut ctx, &bundle) {
            log::error!("Scene '{}' failed to build: {error}", self.name());
            self.abort_load(game);
            return Err(error);
        }
        self.resources.set_assets(bundle);
        self.state = SceneState::Ready;
        log::info!("Scene '{}' ready", self.name());
        Ok(true)
    }

    fn abort_load(&mut self, game: &mut GameContext) {
        self.resources.release(game);
        self.state = SceneState::Unloaded;
    }

    /// Advance scene actions, then entities, then GUI, then the scene's own
    /// logic. Paused scenes are skipped.
    pub fn update(&mut self, game: &mut GameContext, delta_time: f32) -> SceneResult<()> {
        match self.state {
            SceneState::Ready => {}
            SceneState::Paused => return Ok(()),
            _ => return Err(self.invalid("update")),
        }

        self.resources.actions.update(delta_time);
        self.resources.graph.update(delta_time);
        self.resources.gui.update(delta_time);

        let mut ctx = SceneContext {
            game,
            scene: &mut self.resources,
        };
        self.scene.update(&mut ctx, delta_time)
    }

    /// Draw the scene. Paused scenes still draw.
    pub fn render(&mut self, game: &mut GameContext) -> SceneResult<()> {
        if !matches!(self.state, SceneState::Ready | SceneState::Paused) {
            return Err(self.invalid("render"));
        }
        let mut ctx = SceneContext {
            game,
            scene: &mut self.resources,
        };
        self.scene.render(&mut ctx)
    }

    /// Pause or resume. Pausing stops updates and input; rendering continues.
    pub fn pause(&mut self, game: &mut GameContext, paused: bool) -> SceneResult<()> {
        let target = match (self.state, paused) {
            (SceneState::Ready, true) => SceneState::Paused,
            (SceneState::Paused, false) => SceneState::Ready,
            (SceneState::Ready, false) | (SceneState::Paused, true) => return Ok(()),
            _ => return Err(self.invalid(if paused { "pause" } else { "resume" })),
        };
        self.state = target;
        log::debug!("Scene '{}' {}", self.name(), target);

        let mut ctx = SceneContext {
            game,
            scene: &mut self.resources,
        };
        self.scene.on_pause(&mut ctx, paused);
        Ok(())
    }

    /// Release everything the scene owns. Does nothing when already unloaded.
    ///
    /// A scene still loading has its outstanding asset loads cancelled.
    pub fn unload(&mut self, game: &mut GameContext) {
        match self.state {
            SceneState::Unloaded | SceneState::Unloading => return,
            SceneState::Loading => {
                log::info!("Cancelling load of scene '{}'", self.name());
                self.pending = None;
            }
            SceneState::Ready | SceneState::Paused => {
                log::info!("Unloading scene '{}'", self.name());
                self.state = SceneState::Unloading;
                let mut ctx = SceneContext {
                    game: &mut *game,
                    scene: &mut self.resources,
                };
                self.scene.on_unload(&mut ctx);
            }
        }
        self.resources.release(game);
        self.state = SceneState::Unloaded;
    }

    /// Route an input event: GUI buttons first, then the scene's hooks for
    /// whatever the GUI did not consume. Only ready scenes receive input.
    pub fn handle_input(&mut self, game: &mut GameContext, event: &InputEvent) -> SceneResult<()> {
        if self.state != SceneState::Ready {
            return Ok(());
        }

        let consumed = match *event {
            InputEvent::MouseDown { position, .. } => self.resources.gui.on_mouse_down(position),
            InputEvent::MouseUp { position, .. } => self.resources.gui.on_mouse_up(position),
            InputEvent::MouseMove { position } => {
                self.resources.gui.on_mouse_move(position);
                false
            }
            InputEvent::KeyDown(_) | InputEvent::KeyUp(_) => false,
        };

        let events = self.resources.gui.take_events();
        let mut ctx = SceneContext {
            game,
            scene: &mut self.resources,
        };
        for gui_event in &events {
            self.scene.on_gui_event(&mut ctx, gui_event)?;
        }
        if consumed {
            return Ok(());
        }

        match *event {
            InputEvent::MouseDown { position, button } => self.scene.on_mouse_down(&mut ctx, position, button),
            InputEvent::MouseUp { position, button } => self.scene.on_mouse_up(&mut ctx, position, button),
            InputEvent::MouseMove { position } => self.scene.on_mouse_move(&mut ctx, position),
            InputEvent::KeyDown(key) => self.scene.on_key_down(&mut ctx, key),
            InputEvent::KeyUp(key) => self.scene.on_key_up(&mut ctx, key),
        }
    }

    /// Convenience for a left click at `position` (press then release)
    pub fn click(&mut self, game: &mut GameContext, position: Vec2) -> SceneResult<()> {
        let button = MouseButton::Left;
        self.handle_input(game, &InputEvent::MouseDown { position, button })?;
        self.handle_input(game, &InputEvent::MouseUp { position, button })
    }
}

impl fmt::Debug for SceneSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneSlot")
            .field("scene", &self.name())
            .field("state", &self.state)
            .field("resources", &self.resources)
            .finish()
    }
}
