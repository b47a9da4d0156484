//! core/playback/mod.rs
//! Playback core: one active decode-and-play session at a time.
//!
//! - `engine`: the Idle/Paused/Playing/Error state machine
//! - `transport`: play order, shuffle, repeat
//! - `output` + `decoder`: the rodio/symphonia backed `AudioOutput`

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::error::Result;

mod decoder;
mod engine;
mod output;
pub mod transport;

pub use engine::PlaybackEngine;
pub use output::RodioOutput;
pub use transport::Transport;

/// Where the engine is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Paused,
    Playing,
    /// Last load failed. Cleared by the next load or stop.
    Error(String),
}

impl PlaybackState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, PlaybackState::Paused | PlaybackState::Playing)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    Started {
        path: PathBuf,
        duration_ms: Option<u64>,
        start_ms: u64,
    },
    Paused,
    Resumed,
    Stopped,
    Position {
        position_ms: u64,
    },
    TrackEnded,
    /// The track could not be loaded; the engine is in `Error`.
    Error(String),
    /// Seek did not happen; the loaded track keeps playing where it was.
    SeekFailed(String),
}

/// The audio device side of the engine.
///
/// `load` must leave the track paused at the start; the engine decides when
/// to start it.
pub trait AudioOutput {
    /// Open `path` for playback. Returns the track duration when known.
    fn load(&mut self, path: &Path) -> Result<Option<Duration>>;
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position: Duration) -> Result<()>;
    fn stop(&mut self);
    fn position(&self) -> Duration;
    /// Nothing left to play for the loaded track.
    fn is_finished(&self) -> bool;
    fn set_volume(&mut self, volume: f32);
}
