//! Scene Manager - owns the active scene and the modal stack
//!
//! Scenes are registered as named factories. Switching builds a fresh scene
//! and loads it in a pending slot while the current one keeps running; the
//! swap happens once loading completes. Modals stack above the active scene
//! and may pause the layer below them.
//!
//! Scenes and callbacks never hold the manager. They post [`SceneCommand`]s
//! through [`SceneCommands`], and the manager applies them after its update
//! pass.

use super::game_scene::{Scene, SceneError, SceneResult};
use super::lifecycle::{SceneSlot, SceneState};
use crate::config::LoadFailurePolicy;
use crate::context::GameContext;
use crate::input::InputEvent;
use std::collections::HashMap;
use std::fmt;

/// Requests posted to the scene manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneCommand {
    /// Replace the active scene (and close every modal)
    SwitchTo(String),
    /// Push a modal scene
    ShowModal {
        /// Registered scene name
        name: String,
        /// Pause the layer underneath while the modal is open
        pause_below: bool,
    },
    /// Pop the top modal
    CloseModal,
}

/// Cloneable sender for [`SceneCommand`]s
#[derive(Debug, Clone)]
pub struct SceneCommands {
    sender: flume::Sender<SceneCommand>,
}

impl SceneCommands {
    pub(crate) fn new(sender: flume::Sender<SceneCommand>) -> Self {
        Self { sender }
    }

    /// Post any command
    pub fn send(&self, command: SceneCommand) {
        if self.sender.send(command).is_err() {
            log::warn!("Scene command dropped, nothing is listening");
        }
    }

    /// Request a switch to the scene registered as `name`
    pub fn switch_to(&self, name: &str) {
        self.send(SceneCommand::SwitchTo(name.to_string()));
    }

    /// Request a modal
    pub fn show_modal(&self, name: &str, pause_below: bool) {
        self.send(SceneCommand::ShowModal {
            name: name.to_string(),
            pause_below,
        });
    }

    /// Request that the top modal closes
    pub fn close_modal(&self) {
        self.send(SceneCommand::CloseModal);
    }
}

/// Builds a fresh scene instance
pub type SceneFactory = Box<dyn Fn() -> Box<dyn Scene>>;

struct ModalLayer {
    slot: SceneSlot,
    paused_below: bool,
}

fn is_live(slot: &SceneSlot) -> bool {
    matches!(slot.state(), SceneState::Ready | SceneState::Paused)
}

/// Scene Manager - coordinates scene switches, modals and input routing
pub struct SceneManager {
    factories: HashMap<String, SceneFactory>,
    active: Option<SceneSlot>,
    pending: Option<SceneSlot>,
    modals: Vec<ModalLayer>,
    policy: LoadFailurePolicy,
}

impl SceneManager {
    /// Create a manager with no registered scenes
    pub fn new(policy: LoadFailurePolicy) -> Self {
        Self {
            factories: HashMap::new(),
            active: None,
            pending: None,
            modals: Vec::new(),
            policy,
        }
    }

    /// Register a scene factory under `name`, replacing any previous one
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn Scene> + 'static,
    {
        if self.factories.insert(name.to_string(), Box::new(factory)).is_some() {
            log::warn!("Scene '{name}' registered twice, keeping the latest factory");
        }
    }

    /// Whether a factory exists for `name`
    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    fn build(&self, name: &str) -> SceneResult<SceneSlot> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| SceneError::UnknownScene(name.to_string()))?;
        Ok(SceneSlot::new(factory()))
    }

    /// Start loading `name`. The current scene keeps running until the new
    /// one is ready. A switch already in flight is abandoned.
    pub fn switch_to(&mut self, game: &mut GameContext, name: &str) -> SceneResult<()> {
        let mut slot = self.build(name)?;
        if let Some(mut previous) = self.pending.take() {
            log::info!("Abandoning switch to '{}' in favour of '{name}'", previous.name());
            previous.unload(game);
        }
        slot.begin_load(game)?;
        self.pending = Some(slot);
        Ok(())
    }

    /// Push the modal `name` above the current top layer
    pub fn show_modal(&mut self, game: &mut GameContext, name: &str, pause_below: bool) -> SceneResult<()> {
        let mut slot = self.build(name)?;
        slot.begin_load(game)?;
        if pause_below {
            if let Some(below) = self.top_mut() {
                if is_live(below) {
                    below.pause(game, true)?;
                }
            }
        }
        log::info!("Showing modal '{name}'");
        self.modals.push(ModalLayer {
            slot,
            paused_below: pause_below,
        });
        Ok(())
    }

    /// Pop the top modal, resuming the layer below if the modal paused it.
    /// Returns false when no modal is open.
    pub fn close_modal(&mut self, game: &mut GameContext) -> SceneResult<bool> {
        let Some(mut layer) = self.modals.pop() else {
            return Ok(false);
        };
        log::info!("Closing modal '{}'", layer.slot.name());
        layer.slot.unload(game);
        if layer.paused_below {
            if let Some(below) = self.top_mut() {
                if is_live(below) {
                    below.pause(game, false)?;
                }
            }
        }
        Ok(true)
    }

    fn top_mut(&mut self) -> Option<&mut SceneSlot> {
        match self.modals.last_mut() {
            Some(layer) => Some(&mut layer.slot),
            None => self.active.as_mut(),
        }
    }

    fn close_all_modals(&mut self, game: &mut GameContext) {
        while let Some(mut layer) = self.modals.pop() {
            layer.slot.unload(game);
        }
    }

    fn load_failed(&self, error: SceneError) -> SceneResult<()> {
        match self.policy {
            LoadFailurePolicy::KeepCurrent => {
                log::error!("{error}; keeping the current scene");
                Ok(())
            }
            LoadFailurePolicy::Abort => Err(error),
        }
    }

    fn poll_pending(&mut self, game: &mut GameContext) -> SceneResult<()> {
        let Some(pending) = self.pending.as_mut() else {
            return Ok(());
        };
        match pending.poll_load(game) {
            Ok(false) => Ok(()),
            Ok(true) => {
                self.close_all_modals(game);
                if let Some(mut previous) = self.active.take() {
                    previous.unload(game);
                }
                self.active = self.pending.take();
                Ok(())
            }
            Err(error) => {
                self.pending = None;
                self.load_failed(error)
            }
        }
    }

    fn poll_modals(&mut self, game: &mut GameContext) -> SceneResult<()> {
        let mut index = 0;
        while index < self.modals.len() {
            if self.modals[index].slot.state() != SceneState::Loading {
                index += 1;
                continue;
            }
            match self.modals[index].slot.poll_load(game) {
                Ok(_) => index += 1,
                Err(error) => {
                    // drop the failed modal and everything stacked on it
                    while self.modals.len() > index {
                        self.close_modal(game)?;
                    }
                    return self.load_failed(error);
                }
            }
        }
        Ok(())
    }

    fn apply_commands(&mut self, game: &mut GameContext) -> SceneResult<()> {
        for command in game.drain_scene_commands() {
            log::debug!("Applying {command:?}");
            match command {
                SceneCommand::SwitchTo(name) => self.switch_to(game, &name)?,
                SceneCommand::ShowModal { name, pause_below } => self.show_modal(game, &name, pause_below)?,
                SceneCommand::CloseModal => {
                    if !self.close_modal(game)? {
                        log::warn!("CloseModal posted with no modal open");
                    }
                }
            }
        }
        Ok(())
    }

    /// One frame of scene logic: finish pending loads, update the active
    /// scene then the modals bottom-up, then apply posted commands
    pub fn update(&mut self, game: &mut GameContext, delta_time: f32) -> SceneResult<()> {
        self.poll_pending(game)?;
        self.poll_modals(game)?;

        if let Some(active) = self.active.as_mut().filter(|slot| is_live(slot)) {
            active.update(game, delta_time)?;
        }
        for layer in self.modals.iter_mut().filter(|layer| is_live(&layer.slot)) {
            layer.slot.update(game, delta_time)?;
        }

        self.apply_commands(game)
    }

    /// Draw the active scene, then each loaded modal above it
    pub fn render(&mut self, game: &mut GameContext) -> SceneResult<()> {
        if let Some(active) = self.active.as_mut().filter(|slot| is_live(slot)) {
            active.render(game)?;
        }
        for layer in self.modals.iter_mut().filter(|layer| is_live(&layer.slot)) {
            layer.slot.render(game)?;
        }
        Ok(())
    }

    /// Forward input to the top layer only
    pub fn on_input(&mut self, game: &mut GameContext, event: &InputEvent) -> SceneResult<()> {
        match self.top_mut() {
            Some(top) => top.handle_input(game, event),
            None => Ok(()),
        }
    }

    /// Name of the active scene
    pub fn active_name(&self) -> Option<&str> {
        self.active.as_ref().map(SceneSlot::name)
    }

    /// State of the active scene
    pub fn active_state(&self) -> Option<SceneState> {
        self.active.as_ref().map(SceneSlot::state)
    }

    /// The active scene slot
    pub fn active(&self) -> Option<&SceneSlot> {
        self.active.as_ref()
    }

    /// Modal slots, bottom first
    pub fn modals(&self) -> impl Iterator<Item = &SceneSlot> {
        self.modals.iter().map(|layer| &layer.slot)
    }

    /// Number of open modals
    pub fn modal_count(&self) -> usize {
        self.modals.len()
    }

    /// Whether a switch is waiting for assets
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Unload every scene
    pub fn shutdown(&mut self, game: &mut GameContext) {
        self.close_all_modals(game);
        if let Some(mut pending) = self.pending.take() {
            pending.unload(game);
        }
        if let Some(mut active) = self.active.take() {
            active.unload(game);
        }
    }
}

impl fmt::Debug for SceneManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut scenes: Vec<_> = self.factories.keys().collect();
        scenes.sort();
        f.debug_struct("SceneManager")
            .field("registered", &scenes)
            .field("active", &self.active)
            .field("pending", &self.pending)
            .field("modals", &self.modal_count())
            .field("policy", &self.policy)
            .finish()
    }
}
