//! Scenes
//!
//! A scene is a self-contained gameplay or menu context. It owns a graph of
//! sprite and text entities, a GUI layer and its own action scheduler, all
//! held by a [`SceneSlot`] so they are released when the scene unloads.
//!
//! ## Frame order
//!
//! ```text
//! SceneManager::update
//!   poll pending loads
//!   active scene:  actions -> entities -> GUI -> Scene::update
//!   modals:        same, bottom-up
//!   apply posted SceneCommands
//! SceneManager::render
//!   active scene, then modals bottom-up
//! ```

mod entity;
mod game_scene;
mod lifecycle;
mod resources;
mod scene_graph;
mod scene_manager;


pub use entity::{NodeKind, Sprite, Text, Updatable};
pub use game_scene::{Loadable, Scene, SceneError, SceneResult};
pub use lifecycle::{SceneSlot, SceneState};
pub use resources::{SceneContext, SceneResources};
pub use scene_graph::{GraphEdits, GraphError, NodeId, SceneGraph, SceneNode};
pub use scene_manager::{SceneCommand, SceneCommands, SceneFactory, SceneManager};
