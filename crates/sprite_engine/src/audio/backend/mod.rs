//! Audio backend implementations
//!
//! Platform-independent abstraction over audio playback. Decoding and mixing
//! belong to the backend; the engine only names clips and volumes.

use super::{AudioError, SoundClip};
use std::cell::RefCell;
use std::rc::Rc;

/// Audio backend trait for platform abstraction
///
/// Not `Send`: the engine drives audio from the frame loop thread.
pub trait AudioBackend {
    /// Start playing `clip` at `volume` (0.0 - 1.0)
    fn play(&mut self, clip: &SoundClip, volume: f32) -> Result<(), AudioError>;

    /// Stop all playing sounds
    fn stop_all(&mut self);
}

/// Backend that plays nothing
#[derive(Debug, Default)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn play(&mut self, _clip: &SoundClip, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop_all(&mut self) {}
}

/// One recorded `play` call
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedSound {
    /// Clip name
    pub clip: String,
    /// Effective volume
    pub volume: f32,
}

/// Backend that records calls, for tests and headless runs
#[derive(Debug, Default, Clone)]
pub struct RecordingBackend {
    played: Rc<RefCell<Vec<PlayedSound>>>,
    stops: Rc<RefCell<usize>>,
}

impl RecordingBackend {
    /// Create a backend; clones share the same record
    pub fn new() -> Self {
        Self::default()
    }

    /// Sounds played so far
    pub fn played(&self) -> Vec<PlayedSound> {
        self.played.borrow().clone()
    }

    /// Number of `stop_all` calls
    pub fn stop_count(&self) -> usize {
        *self.stops.borrow()
    }
}

impl AudioBackend for RecordingBackend {
    fn play(&mut self, clip: &SoundClip, volume: f32) -> Result<(), AudioError> {
        self.played.borrow_mut().push(PlayedSound {
            clip: clip.name().to_string(),
            volume,
        });
        Ok(())
    }

    fn stop_all(&mut self) {
        *self.stops.borrow_mut() += 1;
    }
}
