//! Named sound registry with a master volume

use super::backend::AudioBackend;
use super::{AudioError, SoundClip};
use std::collections::HashMap;
use std::rc::Rc;

/// Plays registered sounds through a backend
pub struct AudioManager {
    backend: Box<dyn AudioBackend>,
    sounds: HashMap<String, Rc<SoundClip>>,
    master_volume: f32,
}

impl AudioManager {
    /// Create a manager over `backend`
    pub fn new(backend: Box<dyn AudioBackend>, master_volume: f32) -> Self {
        Self {
            backend,
            sounds: HashMap::new(),
            master_volume: master_volume.clamp(0.0, 1.0),
        }
    }

    /// Register `clip` under `name`, replacing any previous sound
    pub fn add_sound(&mut self, clip: Rc<SoundClip>, name: &str) {
        if self.sounds.insert(name.to_string(), clip).is_some() {
            log::debug!("Replaced sound '{name}'");
        }
    }

    /// Unregister a sound. Returns whether it existed.
    pub fn remove_sound(&mut self, name: &str) -> bool {
        self.sounds.remove(name).is_some()
    }

    /// Whether `name` is registered
    pub fn has_sound(&self, name: &str) -> bool {
        self.sounds.contains_key(name)
    }

    /// Play a registered sound at the master volume
    pub fn play_sound(&mut self, name: &str) -> Result<(), AudioError> {
        let Some(clip) = self.sounds.get(name) else {
            log::warn!("Tried to play unknown sound '{name}'");
            return Err(AudioError::UnknownSound(name.to_string()));
        };
        self.backend.play(clip, self.master_volume)
    }

    /// Stop everything that is playing
    pub fn stop_all(&mut self) {
        self.backend.stop_all();
    }

    /// Master volume (0.0 - 1.0)
    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Set the master volume, clamped to 0.0 - 1.0
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }
}
