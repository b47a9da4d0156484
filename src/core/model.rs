//! core/model.rs
//! Playlist/song model.
//!
//! Owns the master song list and the user playlists. "All songs" and
//! "Favorites" are never stored: they are computed from the master list on
//! every read, so they cannot drift apart.
//!
//! Playlists are addressed by *index*, the position in the playlist menu:
//! 0 = All songs, 1 = Favorites, then user playlists in ascending id order.

use std::collections::HashSet;

use super::error::{Error, Result};
use super::types::{
    ALL_SONGS_ID, ALL_SONGS_INDEX, ALL_SONGS_NAME, FAVORITES_ID, FAVORITES_INDEX, FAVORITES_NAME,
    Playlist, PlaylistId, PlaylistSummary, Song, SongId, UserPlaylist,
};

const RESERVED_COUNT: usize = 2;

/// What `remove_from_playlist` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Removed from a user playlist.
    Removed,
    /// Favorites view: the song was unfavorited instead.
    Unfavorited,
    /// Was not in that playlist.
    NotPresent,
}

#[derive(Debug, Default)]
pub struct PlaylistModel {
    /// Sorted by track name.
    songs: Vec<Song>,
    /// Sorted by id.
    user: Vec<UserPlaylist>,
}

impl PlaylistModel {
    pub fn new(songs: Vec<Song>, user_playlists: Vec<UserPlaylist>) -> Self {
        let mut songs = songs;
        songs.sort_by(|a, b| a.track_name.cmp(&b.track_name));

        let mut seen: HashSet<SongId> = HashSet::with_capacity(songs.len());
        songs.retain(|s| {
            if seen.insert(s.id.clone()) {
                true
            } else {
                log::warn!(
                    "{} has the same content as another file, ignoring it",
                    s.track_name
                );
                false
            }
        });

        let mut user = user_playlists;
        user.sort_by_key(|p| p.id);
        for playlist in &mut user {
            let mut members: HashSet<SongId> = HashSet::new();
            playlist
                .songs
                .retain(|id| seen.contains(id) && members.insert(id.clone()));
        }

        Self { songs, user }
    }

    pub fn playlist_count(&self) -> usize {
        RESERVED_COUNT + self.user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn all_songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn favorites(&self) -> Vec<&Song> {
        self.songs.iter().filter(|s| s.is_favorited).collect()
    }

    pub fn song(&self, id: &SongId) -> Option<&Song> {
        self.songs.iter().find(|s| &s.id == id)
    }

    pub fn user_playlists(&self) -> &[UserPlaylist] {
        &self.user
    }

    /// User playlist at a menu index (None for the built-in views).
    pub fn user_playlist(&self, index: usize) -> Option<&UserPlaylist> {
        index
            .checked_sub(RESERVED_COUNT)
            .and_then(|i| self.user.get(i))
    }

    pub fn index_of_playlist(&self, id: PlaylistId) -> Option<usize> {
        match id {
            ALL_SONGS_ID => Some(ALL_SONGS_INDEX),
            FAVORITES_ID => Some(FAVORITES_INDEX),
            _ => self
                .user
                .iter()
                .position(|p| p.id == id)
                .map(|i| i + RESERVED_COUNT),
        }
    }

    /// Songs of a playlist, sorted by display name.
    pub fn songs_in(&self, index: usize) -> Vec<&Song> {
        match index {
            ALL_SONGS_INDEX => self.songs.iter().collect(),
            FAVORITES_INDEX => self.favorites(),
            _ => match self.user_playlist(index) {
                Some(p) => {
                    let members: HashSet<&SongId> = p.songs.iter().collect();
                    // Master list is already sorted, so filtering keeps the order.
                    self.songs
                        .iter()
                        .filter(|s| members.contains(&s.id))
                        .collect()
                }
                None => Vec::new(),
            },
        }
    }

    pub fn playlist(&self, index: usize) -> Option<Playlist<'_>> {
        let (id, name) = match index {
            ALL_SONGS_INDEX => (ALL_SONGS_ID, ALL_SONGS_NAME),
            FAVORITES_INDEX => (FAVORITES_ID, FAVORITES_NAME),
            _ => {
                let p = self.user_playlist(index)?;
                (p.id, p.name.as_str())
            }
        };

        Some(Playlist {
            id,
            name,
            songs: self.songs_in(index),
        })
    }

    pub fn playlists(&self) -> Vec<PlaylistSummary> {
        (0..self.playlist_count())
            .filter_map(|index| {
                self.playlist(index).map(|p| PlaylistSummary {
                    index,
                    id: p.id,
                    name: p.name.to_string(),
                    song_count: p.songs.len(),
                })
            })
            .collect()
    }

    pub fn toggle_favorite(&mut self, id: &SongId) -> Result<bool> {
        let song = self
            .songs
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| Error::UnknownSong(id.clone()))?;

        song.is_favorited = !song.is_favorited;
        Ok(song.is_favorited)
    }

    /// Returns false when the song was already a member.
    pub fn add_to_playlist(&mut self, index: usize, id: &SongId) -> Result<bool> {
        self.ensure_user_index(index)?;
        if self.song(id).is_none() {
            return Err(Error::UnknownSong(id.clone()));
        }

        let playlist = &mut self.user[index - RESERVED_COUNT];
        if playlist.songs.contains(id) {
            return Ok(false);
        }
        playlist.songs.push(id.clone());
        Ok(true)
    }

    pub fn remove_from_playlist(&mut self, index: usize, id: &SongId) -> Result<Removal> {
        match index {
            ALL_SONGS_INDEX => Err(Error::ReservedPlaylist(index)),
            FAVORITES_INDEX => {
                let favorited = self
                    .song(id)
                    .map(|s| s.is_favorited)
                    .ok_or_else(|| Error::UnknownSong(id.clone()))?;
                if !favorited {
                    return Ok(Removal::NotPresent);
                }
                self.toggle_favorite(id)?;
                Ok(Removal::Unfavorited)
            }
            _ => {
                self.ensure_user_index(index)?;
                let playlist = &mut self.user[index - RESERVED_COUNT];
                let before = playlist.songs.len();
                playlist.songs.retain(|s| s != id);
                if playlist.songs.len() < before {
                    Ok(Removal::Removed)
                } else {
                    Ok(Removal::NotPresent)
                }
            }
        }
    }

    /// Add an empty user playlist. `id` comes from the store's counter.
    /// Returns the new playlist's index.
    pub fn create_playlist(&mut self, id: PlaylistId, name: &str) -> Result<usize> {
        let name = self.check_playlist_name(name)?;

        let pos = self.user.partition_point(|p| p.id < id);
        self.user.insert(
            pos,
            UserPlaylist {
                id,
                name: name.to_string(),
                songs: Vec::new(),
            },
        );

        Ok(pos + RESERVED_COUNT)
    }

    /// Trimmed name, if it is usable for a new playlist.
    pub fn check_playlist_name<'n>(&self, name: &'n str) -> Result<&'n str> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyPlaylistName);
        }
        let folded = name.to_lowercase();
        if self.user.iter().any(|p| p.name.to_lowercase() == folded) {
            return Err(Error::DuplicatePlaylistName(name.to_string()));
        }
        Ok(name)
    }

    pub fn delete_playlist(&mut self, index: usize) -> Result<UserPlaylist> {
        self.ensure_user_index(index)?;
        Ok(self.user.remove(index - RESERVED_COUNT))
    }

    /// Drop a song from the master list and from every user playlist.
    pub fn remove_song(&mut self, id: &SongId) -> Option<Song> {
        let pos = self.songs.iter().position(|s| &s.id == id)?;
        for playlist in &mut self.user {
            playlist.songs.retain(|s| s != id);
        }
        Some(self.songs.remove(pos))
    }

    /// Songs that could be added to a user playlist, filtered by a
    /// case-insensitive substring of the track name.
    pub fn addable_songs(&self, index: usize, query: &str) -> Vec<&Song> {
        let Some(playlist) = self.user_playlist(index) else {
            return Vec::new();
        };
        let query = query.trim().to_lowercase();

        self.songs
            .iter()
            .filter(|s| !playlist.songs.contains(&s.id))
            .filter(|s| query.is_empty() || s.track_name.to_lowercase().contains(&query))
            .collect()
    }

    fn ensure_user_index(&self, index: usize) -> Result<()> {
        if index < RESERVED_COUNT {
            return Err(Error::ReservedPlaylist(index));
        }
        if index >= self.playlist_count() {
            return Err(Error::PlaylistNotFound(index));
        }
        Ok(())
    }
}
