//! core/playback/output.rs
//! rodio-backed `AudioOutput`.
//!
//! Owns:
//! - OutputStream (must stay alive)
//! - Sink (per current track)
//!
//! Seeking reopens the file at the target offset instead of asking rodio to
//! seek, so `position()` is that offset plus what the sink has played since.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use super::AudioOutput;
use super::decoder::open_source_at;
use crate::core::error::{Error, Result};

pub struct RodioOutput {
    // Keep this alive for the lifetime of the output!
    stream: OutputStream,

    sink: Option<Sink>,
    path: Option<PathBuf>,
    /// Where the current sink started inside the track.
    base: Duration,
    volume: f32,
}

impl RodioOutput {
    pub fn open_default() -> Result<Self> {
        let stream =
            OutputStreamBuilder::open_default_stream().map_err(|e| Error::Output(e.to_string()))?;

        Ok(Self {
            stream,
            sink: None,
            path: None,
            base: Duration::ZERO,
            volume: 1.0,
        })
    }

    fn start_sink_at(&mut self, path: &Path, start: Duration, paused: bool) -> Result<Option<Duration>> {
        let (source, duration) = open_source_at(path, start)?;

        // rodio 0.21.x: Sink is created from the stream's mixer
        let sink = Sink::connect_new(self.stream.mixer());
        sink.set_volume(self.volume);
        if paused {
            sink.pause();
        }
        sink.append(source);

        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }
        self.base = start;
        Ok(duration)
    }
}

impl AudioOutput for RodioOutput {
    fn load(&mut self, path: &Path) -> Result<Option<Duration>> {
        self.stop();
        let duration = self.start_sink_at(path, Duration::ZERO, true)?;
        self.path = Some(path.to_path_buf());
        Ok(duration)
    }

    fn play(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        let Some(path) = self.path.clone() else {
            return Err(Error::Seek("nothing loaded".into()));
        };
        let paused = self.sink.as_ref().is_none_or(|s| s.is_paused());

        self.start_sink_at(&path, position, paused)?;
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.path = None;
        self.base = Duration::ZERO;
    }

    fn position(&self) -> Duration {
        match &self.sink {
            Some(sink) => self.base + sink.get_pos(),
            None => Duration::ZERO,
        }
    }

    fn is_finished(&self) -> bool {
        self.sink.as_ref().is_none_or(|s| s.empty())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }
}
