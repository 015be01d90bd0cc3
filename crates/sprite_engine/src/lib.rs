//! # Sprite Engine
//!
//! A 2D sprite game engine core for canvas-style hosts.
//!
//! ## Features
//!
//! - **Frame-loop driver**: update then render for every host frame
//! - **Batched sprite rendering**: quads grouped per material behind a
//!   device-agnostic [`RenderDevice`](render::RenderDevice)
//! - **Scenes**: entity graphs, GUI buttons and asset loading with a
//!   guaranteed release on unload, plus modal scenes
//! - **Action scheduling**: delayed, repeating and cancellable callbacks,
//!   and tweens built on them
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sprite_engine::prelude::*;
//!
//! struct Title;
//!
//! impl Loadable for Title {
//!     fn on_loaded(&mut self, ctx: &mut SceneContext<'_>, _assets: &AssetBundle) -> SceneResult<()> {
//!         ctx.actions().add(|_| log::info!("one second in"), 1.0);
//!         Ok(())
//!     }
//! }
//!
//! impl Scene for Title {
//!     fn name(&self) -> &str {
//!         "title"
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut scenes = SceneManager::new(LoadFailurePolicy::Abort);
//!     scenes.register("title", || Box::new(Title));
//!     let mut game = SceneGame::new(scenes, "title");
//!
//!     let mut driver = GameDriver::new(
//!         EngineConfig::default(),
//!         Box::new(HeadlessDevice::new(800, 600)),
//!         Box::new(NullBackend),
//!         Box::new(MemoryLoader::new()),
//!     );
//!     driver.run(&mut game, &mut FixedRateHost::new(16.0, 120))?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod actions;
pub mod assets;
pub mod audio;
pub mod config;
pub mod foundation;
pub mod gui;
pub mod input;
pub mod render;
pub mod scene;

mod application;
mod context;
mod engine;

pub use application::{Game, GameError, SceneGame};
pub use context::GameContext;
pub use engine::{EngineError, FixedRateHost, FrameSource, GameDriver, HostEvent, RunSummary, ScriptedHost};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        actions::{ActionHandle, ActionQueue, ActionScheduler, ActionStatus, Tween, TweenOptions, TweenStyle},
        assets::{Asset, AssetBundle, AssetError, AssetKind, AssetLoader, AssetRequest, MemoryLoader},
        audio::{AudioBackend, AudioManager, NullBackend, SoundClip},
        config::{Config, EngineConfig, LoadFailurePolicy},
        foundation::{
            collections::{Pool, PoolIndex},
            math::{Mat4, Rect, Transform2D, Vec2, Vec3, Vec4},
            time::{FrameClock, Stopwatch},
        },
        gui::{ButtonId, GuiEvent, GuiManager},
        input::{InputEvent, InputState, KeyCode, MouseButton},
        render::{BlendMode, Camera2D, HeadlessDevice, MaterialId, RenderDevice, SpriteBatch},
        scene::{
            GraphEdits, Loadable, NodeId, NodeKind, Scene, SceneCommands, SceneContext, SceneError, SceneGraph,
            SceneManager, SceneResult, Sprite, Text,
        },
        EngineError, FixedRateHost, Game, GameContext, GameDriver, GameError, HostEvent, SceneGame, ScriptedHost,
    };
}
