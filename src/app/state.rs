//! App state + messages.
//!
//! `App` is the one owner of everything the front end shows. It is only
//! mutated through `update(app, Message)`; front ends learn about changes by
//! listening on `App::subscribe()`.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::config::Config;
use crate::core::Result;
use crate::core::model::PlaylistModel;
use crate::core::playback::{
    AudioOutput, PlaybackEngine, PlaybackState, PlayerEvent, RodioOutput, Transport,
};
use crate::core::store::Store;
use crate::core::types::{PlaylistSummary, Song, SongId};

use super::update::scan;
use super::util::format_time;

pub(crate) const NO_TRACK: &str = "No track loaded";
pub(crate) const NO_FILES: &str = "No MP3 files found";

/// Message = "the user (or the clock) wants something".
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Once per `Config::tick_interval`.
    Tick,

    // Library
    Rescan,
    Import(Vec<PathBuf>),
    DeleteSong(SongId),
    ToggleFavorite(SongId),

    // Playlists
    SelectPlaylist(usize),
    CreatePlaylist(String),
    DeletePlaylist(usize),
    AddToPlaylist { playlist: usize, song: SongId },
    /// From the selected playlist.
    RemoveFromPlaylist(SongId),

    // Transport
    PlayAt(usize),
    TogglePlayPause,
    Next,
    Previous,
    ToggleShuffle,
    ToggleRepeat,
    Seek(u64), // ms
    SetVolume(f32),
}

/// What changed, so a front end knows what to redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Songs added/removed or a favorite flag flipped.
    Library,
    /// Playlist list or membership.
    Playlists,
    /// A different playlist is selected.
    Selection,
    /// Order, current index, shuffle/repeat, play/pause, position.
    Transport,
    NowPlaying,
    Status,
}

pub struct App {
    pub(crate) config: Config,
    pub(crate) store: Store,
    pub(crate) model: PlaylistModel,

    pub(crate) selected_playlist: usize,
    pub(crate) transport: Transport,

    pub(crate) engine: PlaybackEngine,
    pub(crate) playback_events: Receiver<PlayerEvent>,

    pub(crate) now_playing: String,
    pub(crate) status: String,
    pub(crate) is_playing: bool,
    pub(crate) position_ms: u64,
    pub(crate) duration_ms: Option<u64>,

    observers: Vec<Sender<Change>>,
}

impl App {
    /// Open the library with the default audio device.
    pub fn open(config: Config) -> Result<Self> {
        let output = RodioOutput::open_default()?;
        Ok(Self::with_output(config, Box::new(output)))
    }

    /// Open the library with any output (tests use a fake one).
    pub fn with_output(config: Config, output: Box<dyn AudioOutput>) -> Self {
        let store = match Store::open(&config.state_file) {
            Ok(store) => store,
            Err(e) => {
                // Keep the bad file untouched; this session just won't persist.
                log::warn!("{e}; continuing without saved state");
                Store::in_memory()
            }
        };

        let (event_tx, playback_events) = mpsc::channel();

        let mut app = Self {
            config,
            store,
            model: PlaylistModel::default(),
            selected_playlist: 0,
            transport: Transport::default(),
            engine: PlaybackEngine::new(output, event_tx),
            playback_events,
            now_playing: NO_TRACK.to_string(),
            status: String::new(),
            is_playing: false,
            position_ms: 0,
            duration_ms: None,
            observers: Vec::new(),
        };

        scan::load_library(&mut app);
        app
    }

    pub fn subscribe(&mut self) -> Receiver<Change> {
        let (tx, rx) = mpsc::channel();
        self.observers.push(tx);
        rx
    }

    pub(crate) fn notify(&mut self, change: Change) {
        // Drop observers that went away.
        self.observers.retain(|tx| tx.send(change).is_ok());
    }

    pub(crate) fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.notify(Change::Status);
    }

    pub(crate) fn set_now_playing(&mut self, text: impl Into<String>) {
        self.now_playing = text.into();
        self.notify(Change::NowPlaying);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn model(&self) -> &PlaylistModel {
        &self.model
    }

    pub fn playlists(&self) -> Vec<PlaylistSummary> {
        self.model.playlists()
    }

    pub fn selected_playlist(&self) -> usize {
        self.selected_playlist
    }

    pub fn selected_playlist_name(&self) -> &str {
        self.model
            .playlist(self.selected_playlist)
            .map(|p| p.name)
            .unwrap_or_default()
    }

    /// Songs of the selected playlist in play order (sorted, or shuffled).
    pub fn active_songs(&self) -> Vec<&Song> {
        self.transport
            .order()
            .iter()
            .filter_map(|id| self.model.song(id))
            .collect()
    }

    pub fn current_index(&self) -> Option<usize> {
        (!self.transport.is_empty()).then(|| self.transport.current())
    }

    /// Song the transport points at (may not be loaded yet).
    pub fn current_song(&self) -> Option<&Song> {
        self.transport.current_id().and_then(|id| self.model.song(id))
    }

    pub fn is_shuffling(&self) -> bool {
        self.transport.is_shuffling()
    }

    pub fn is_repeating(&self) -> bool {
        self.transport.is_repeating()
    }

    pub fn playback_state(&self) -> &PlaybackState {
        self.engine.state()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn position_ms(&self) -> u64 {
        self.position_ms
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    /// "elapsed / total" as MM:SS.
    pub fn time_label(&self) -> (String, String) {
        (
            format_time(self.position_ms),
            format_time(self.duration_ms.unwrap_or(0)),
        )
    }

    pub fn volume(&self) -> f32 {
        self.engine.volume()
    }

    pub fn now_playing(&self) -> &str {
        &self.now_playing
    }

    pub fn status(&self) -> &str {
        &self.status
    }
}
