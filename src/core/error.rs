//! core/error.rs
//! Error type shared by every core module.
//!
//! The app layer never lets these escape to the user as-is: it logs them and
//! turns them into a status line (see `app::update`).

use std::path::PathBuf;

use thiserror::Error;

use super::types::SongId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The music folder could not be created or listed.
    /// Distinct from a readable folder that simply has no music in it.
    #[error("music folder {} is inaccessible: {source}", path.display())]
    DirectoryInaccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("state file {}: {source}", path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("state file version {found} is newer than supported version {supported}")]
    UnsupportedStoreVersion { found: u32, supported: u32 },

    #[error("Open failed: {0}")]
    Open(String),

    #[error("Decode failed: {0}")]
    Decode(String),

    #[error("Seek failed: {0}")]
    Seek(String),

    #[error("Audio output unavailable: {0}")]
    Output(String),

    #[error("unknown song {0}")]
    UnknownSong(SongId),

    #[error("playlist {0} is built in and cannot be changed this way")]
    ReservedPlaylist(usize),

    #[error("no playlist at index {0}")]
    PlaylistNotFound(usize),

    #[error("playlist name is empty")]
    EmptyPlaylistName,

    #[error("a playlist named {0:?} already exists")]
    DuplicatePlaylistName(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
