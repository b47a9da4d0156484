//! core/mod.rs
//!
//! The brain of the app:
//! - Discover audio files in the music folder (filesystem listing)
//! - Give every file a content-hash identity and read its cover art
//! - Keep favorites/playlists (model + store) and play audio (playback)
//!
//! - The scan pipeline is explicit:
//!   (A) list files -> Vec<PathBuf>
//!   (B) hash + read art -> Vec<Song>
//!
//! No app state in here: the `app` module owns the one `PlaylistModel`,
//! `Store` and `PlaybackEngine` and wires them together.

pub mod error;
pub mod hash;
pub mod library;
pub mod model;
pub mod playback;
pub mod store;
pub mod tags;
pub mod types;

use std::path::{Path, PathBuf};

pub use error::{Error, Result};

use store::Store;
use types::{Song, UserPlaylist};

/// Turn already-listed paths into songs.
///
/// - Never fails hard per-file: a file that cannot be hashed is skipped
/// - Favorite flags come from the store
/// - Returns (songs, failures)
pub fn read_songs(paths: Vec<PathBuf>, store: &Store) -> (Vec<Song>, usize) {
    let mut songs: Vec<Song> = Vec::with_capacity(paths.len());
    let mut failures: usize = 0;

    for path in paths {
        let id = match hash::content_hash(&path) {
            Ok(id) => id,
            Err(e) => {
                log::warn!("skipping {}: {e}", path.display());
                failures += 1;
                continue;
            }
        };

        let track_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        songs.push(Song {
            is_favorited: store.is_favorite(&id),
            album_cover: tags::read_embedded_art(&path),
            id,
            track_name,
            path,
        });
    }

    (songs, failures)
}

/// Stage A + B for the music folder.
pub fn scan_music_dir(dir: &Path, store: &Store) -> Result<(Vec<Song>, usize)> {
    let paths = library::list_music_files(dir)?.into_paths();
    Ok(read_songs(paths, store))
}

/// User playlists as persisted, ready for `PlaylistModel::new`.
pub fn stored_playlists(store: &Store) -> Vec<UserPlaylist> {
    store
        .playlists()
        .map(|(id, record)| UserPlaylist {
            id,
            name: record.name.clone(),
            songs: record.songs.clone(),
        })
        .collect()
}
