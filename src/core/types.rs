//! Core data types shared between core logic and the app layer.
//!
//! Rule of thumb:
//! - These structs should be "boring bags of data"
//! - No filesystem code
//! - No tag parsing code
//!
//! 'Song' represents ONE audio file in the music folder plus the bits of
//! state we keep about it (favorite flag, cover art).

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Playlist id. `0` and `1` are the built-in derived views.
pub type PlaylistId = u32;

pub const ALL_SONGS_ID: PlaylistId = 0;
pub const FAVORITES_ID: PlaylistId = 1;
/// First id handed out to a user playlist.
pub const FIRST_USER_PLAYLIST_ID: PlaylistId = 2;

pub const ALL_SONGS_INDEX: usize = 0;
pub const FAVORITES_INDEX: usize = 1;

pub const ALL_SONGS_NAME: &str = "All songs";
pub const FAVORITES_NAME: &str = "Favorites";

/// Content hash of a song file (lowercase hex SHA-256).
///
/// Two files with identical bytes share an id; renaming a file keeps it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(String);

impl SongId {
    pub fn from_hex(hex: impl Into<String>) -> Self {
        SongId(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Embedded picture bytes as found in the tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    pub data: Vec<u8>,
    /// e.g. "image/jpeg"
    pub mime: String,
}

/// What a row should draw as its cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cover<'a> {
    Embedded(&'a Artwork),
    /// The generic note image.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub id: SongId,

    /// File name inside the music folder, e.g. "intro.mp3".
    pub track_name: String,

    /// Full file path on disk.
    pub path: PathBuf,

    pub album_cover: Option<Artwork>,

    pub is_favorited: bool,
}

impl Song {
    /// Name shown in lists and the now-playing line: file name without ".mp3".
    pub fn display_name(&self) -> &str {
        display_name(&self.track_name)
    }

    pub fn cover(&self) -> Cover<'_> {
        match &self.album_cover {
            Some(art) => Cover::Embedded(art),
            None => Cover::Placeholder,
        }
    }
}

pub fn display_name(track_name: &str) -> &str {
    let len = track_name.len();
    if len > 4 && track_name.is_char_boundary(len - 4) {
        let (stem, ext) = track_name.split_at(len - 4);
        if ext.eq_ignore_ascii_case(".mp3") {
            return stem;
        }
    }
    track_name
}

/// A user-created playlist as owned by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPlaylist {
    pub id: PlaylistId,
    pub name: String,
    /// Membership in insertion order.
    pub songs: Vec<SongId>,
}

/// A playlist as seen by callers: built-in or user, with resolved songs.
#[derive(Debug, Clone)]
pub struct Playlist<'a> {
    pub id: PlaylistId,
    pub name: &'a str,
    pub songs: Vec<&'a Song>,
}

/// One line of the playlist menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub index: usize,
    pub id: PlaylistId,
    pub name: String,
    pub song_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_strips_mp3_extension() {
        assert_eq!(display_name("intro.mp3"), "intro");
        assert_eq!(display_name("LOUD.MP3"), "LOUD");
        assert_eq!(display_name("notes.txt"), "notes.txt");
        assert_eq!(display_name(".mp3"), ".mp3");
    }

    #[test]
    fn missing_art_falls_back_to_placeholder() {
        let song = Song {
            id: SongId::from_hex("ab"),
            track_name: "a.mp3".into(),
            path: PathBuf::from("/music/a.mp3"),
            album_cover: None,
            is_favorited: false,
        };
        assert_eq!(song.cover(), Cover::Placeholder);
    }
}
