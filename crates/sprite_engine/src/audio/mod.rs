//! Audio playback
//!
//! Sounds are registered by name with an [`AudioManager`] and played through
//! an [`AudioBackend`] supplied by the host.

pub mod backend;
pub mod manager;

pub use backend::{AudioBackend, NullBackend, PlayedSound, RecordingBackend};
pub use manager::AudioManager;

use thiserror::Error;

/// Audio errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// No sound registered under this name
    #[error("Unknown sound: {0}")]
    UnknownSound(String),

    /// The backend failed
    #[error("Audio backend error: {0}")]
    Backend(String),
}

/// A decoded sound, opaque to the engine
#[derive(Debug, Clone, PartialEq)]
pub struct SoundClip {
    name: String,
    duration: f32,
}

impl SoundClip {
    /// Describe a clip
    pub fn new(name: &str, duration: f32) -> Self {
        Self {
            name: name.to_string(),
            duration,
        }
    }

    /// Clip name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length in seconds
    pub fn duration(&self) -> f32 {
        self.duration
    }
}
