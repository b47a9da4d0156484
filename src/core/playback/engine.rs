//! core/playback/engine.rs
//! Playback engine (state machine over an `AudioOutput`).
//!
//! Owns:
//! - the output (rodio in the app, a fake in tests)
//! - the current track path + duration
//! - the end-of-track check, run from `tick()` once per second
//!
//! Emits PlayerEvent back via a channel.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::Duration;

use super::{AudioOutput, PlaybackState, PlayerEvent};

/// A track counts as finished once the position is this close to the end.
const END_SLACK: Duration = Duration::from_secs(1);

pub struct PlaybackEngine {
    output: Box<dyn AudioOutput>,
    state: PlaybackState,

    current_path: Option<PathBuf>,
    current_duration: Option<Duration>,
    volume: f32,

    // Event channel
    event_tx: Sender<PlayerEvent>,
}

impl PlaybackEngine {
    pub fn new(output: Box<dyn AudioOutput>, event_tx: Sender<PlayerEvent>) -> Self {
        Self {
            output,
            state: PlaybackState::Idle,
            current_path: None,
            current_duration: None,
            volume: 1.0,
            event_tx,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.current_duration
    }

    pub fn position(&self) -> Duration {
        if self.state.is_loaded() {
            self.output.position()
        } else {
            Duration::ZERO
        }
    }

    /// Stop whatever is playing, open `path` and start it.
    pub fn load(&mut self, path: &Path) {
        self.stop_internal();

        match self.output.load(path) {
            Ok(duration) => {
                self.current_path = Some(path.to_path_buf());
                self.current_duration = duration;
                self.state = PlaybackState::Paused;

                self.output.set_volume(self.volume);
                self.output.play();
                self.state = PlaybackState::Playing;

                log::info!("playing {}", path.display());
                self.emit(PlayerEvent::Started {
                    path: path.to_path_buf(),
                    duration_ms: duration.map(|d| d.as_millis() as u64),
                    start_ms: 0,
                });
            }
            Err(e) => {
                let msg = e.to_string();
                log::warn!("could not play {}: {msg}", path.display());
                self.state = PlaybackState::Error(msg.clone());
                self.emit(PlayerEvent::Error(msg));
            }
        }
    }

    pub fn toggle_play_pause(&mut self) {
        match self.state {
            PlaybackState::Playing => {
                self.output.pause();
                self.state = PlaybackState::Paused;
                self.emit(PlayerEvent::Paused);
            }
            PlaybackState::Paused => {
                self.output.play();
                self.state = PlaybackState::Playing;
                self.emit(PlayerEvent::Resumed);
            }
            PlaybackState::Idle | PlaybackState::Error(_) => {}
        }
    }

    pub fn seek(&mut self, ms: u64) {
        if !self.state.is_loaded() {
            return;
        }

        let mut target = Duration::from_millis(ms);
        // Seeking to *exactly* the end tends to produce EOF weirdness; clamp slightly.
        if let Some(dur) = self.current_duration {
            if target >= dur {
                target = dur.saturating_sub(Duration::from_millis(1));
            }
        }

        if let Err(e) = self.output.seek(target) {
            log::warn!("{e}");
            self.emit(PlayerEvent::SeekFailed(e.to_string()));
            return;
        }

        self.emit(PlayerEvent::Position {
            position_ms: target.as_millis() as u64,
        });
    }

    pub fn stop(&mut self) {
        let was_active = self.state != PlaybackState::Idle;
        self.stop_internal();
        if was_active {
            self.emit(PlayerEvent::Stopped);
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.output.set_volume(self.volume);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Periodic poll: report position and detect the end of the track.
    pub fn tick(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }

        let position = self.output.position();
        self.emit(PlayerEvent::Position {
            position_ms: position.as_millis() as u64,
        });

        let near_end = self
            .current_duration
            .is_some_and(|dur| position + END_SLACK >= dur);

        if near_end || self.output.is_finished() {
            log::debug!("track ended at {position:?}");
            self.stop_internal();
            self.emit(PlayerEvent::TrackEnded);
        }
    }

    fn stop_internal(&mut self) {
        self.output.stop();
        self.state = PlaybackState::Idle;
        self.current_path = None;
        self.current_duration = None;
    }

    /// Best-effort send. If nobody listens anymore, the event is dropped.
    fn emit(&self, event: PlayerEvent) {
        let _ = self.event_tx.send(event);
    }
}
