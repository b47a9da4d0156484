//! core/store.rs
//! On-disk state: favorites, user playlists, id counter, last selection.
//!
//! One versioned JSON document. Every mutation rewrites it (temp file + rename),
//! last write wins. The store only knows ids and flags, never `Song`s.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::{Error, Result};
use super::types::{FIRST_USER_PLAYLIST_ID, PlaylistId, SongId};

pub const STORE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistRecord {
    pub name: String,
    pub songs: Vec<SongId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    #[serde(default)]
    favorites: BTreeMap<SongId, bool>,
    #[serde(default)]
    playlists: BTreeMap<PlaylistId, PlaylistRecord>,
    #[serde(default = "first_user_playlist_id")]
    next_playlist_id: PlaylistId,
    #[serde(default)]
    selected_playlist: usize,
}

fn first_user_playlist_id() -> PlaylistId {
    FIRST_USER_PLAYLIST_ID
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            favorites: BTreeMap::new(),
            playlists: BTreeMap::new(),
            next_playlist_id: FIRST_USER_PLAYLIST_ID,
            selected_playlist: 0,
        }
    }
}

#[derive(Debug)]
pub struct Store {
    /// None = in-memory only (tests, or a state file we could not read).
    path: Option<PathBuf>,
    data: StoreFile,
}

impl Store {
    /// Load the state file. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let data = match fs::read(&path) {
            Ok(bytes) => {
                let data: StoreFile = serde_json::from_slice(&bytes).map_err(|source| {
                    Error::Store {
                        path: path.clone(),
                        source,
                    }
                })?;
                if data.version > STORE_VERSION {
                    return Err(Error::UnsupportedStoreVersion {
                        found: data.version,
                        supported: STORE_VERSION,
                    });
                }
                data
            }
            Err(e) if e.kind() == ErrorKind::NotFound => StoreFile::default(),
            Err(e) => return Err(Error::io(&path, e)),
        };

        Ok(Self {
            path: Some(path),
            data,
        })
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: StoreFile::default(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_favorite(&self, id: &SongId) -> bool {
        self.data.favorites.get(id).copied().unwrap_or(false)
    }

    pub fn set_favorite(&mut self, id: &SongId, favorite: bool) -> Result<()> {
        self.data.favorites.insert(id.clone(), favorite);
        self.flush()
    }

    /// Drop everything keyed by this song (its file was deleted).
    pub fn forget_song(&mut self, id: &SongId) -> Result<()> {
        self.data.favorites.remove(id);
        for record in self.data.playlists.values_mut() {
            record.songs.retain(|s| s != id);
        }
        self.flush()
    }

    pub fn playlists(&self) -> impl Iterator<Item = (PlaylistId, &PlaylistRecord)> {
        self.data.playlists.iter().map(|(id, r)| (*id, r))
    }

    pub fn put_playlist(&mut self, id: PlaylistId, record: PlaylistRecord) -> Result<()> {
        self.data.playlists.insert(id, record);
        self.flush()
    }

    pub fn remove_playlist(&mut self, id: PlaylistId) -> Result<()> {
        self.data.playlists.remove(&id);
        self.flush()
    }

    /// Hand out the next user playlist id and persist the counter.
    pub fn allocate_playlist_id(&mut self) -> Result<PlaylistId> {
        // Never hand out a reserved id, even from a hand-edited file.
        let id = self.data.next_playlist_id.max(FIRST_USER_PLAYLIST_ID);
        self.data.next_playlist_id = id + 1;
        self.flush()?;
        Ok(id)
    }

    pub fn selected_playlist(&self) -> usize {
        self.data.selected_playlist
    }

    pub fn set_selected_playlist(&mut self, index: usize) -> Result<()> {
        if self.data.selected_playlist == index {
            return Ok(());
        }
        self.data.selected_playlist = index;
        self.flush()
    }

    fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let json = serde_json::to_vec_pretty(&self.data).map_err(|source| Error::Store {
            path: path.clone(),
            source,
        })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| Error::io(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| Error::io(path, e))?;

        log::debug!("state saved to {}", path.display());
        Ok(())
    }
}
