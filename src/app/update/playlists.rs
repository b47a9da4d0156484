//! app/update/playlists.rs
//! Playlist selection and editing.
//!
//! Every edit goes model first, then store. A failed store write is logged
//! and reported but the in-memory change stays (last write wins next time).

use crate::core::model::Removal;
use crate::core::store::PlaylistRecord;
use crate::core::types::{FAVORITES_INDEX, SongId};

use super::super::state::{App, Change};
use super::scan::{activate_playlist, refresh_active};

pub(crate) fn select_playlist(app: &mut App, index: usize) {
    if index == app.selected_playlist {
        return;
    }
    if index >= app.model.playlist_count() {
        app.set_status(format!("No playlist at position {index}."));
        return;
    }
    activate_playlist(app, index);
}

pub(crate) fn create_playlist(app: &mut App, name: String) {
    let name = match app.model.check_playlist_name(&name) {
        Ok(n) => n.to_string(),
        Err(e) => {
            app.set_status(format!("Cannot create playlist: {e}"));
            return;
        }
    };

    let id = match app.store.allocate_playlist_id() {
        Ok(id) => id,
        Err(e) => {
            log::error!("{e}");
            app.set_status(format!("Cannot create playlist: {e}"));
            return;
        }
    };

    match app.model.create_playlist(id, &name) {
        Ok(index) => {
            persist_playlist(app, index);
            log::info!("created playlist {name:?} (id {id})");
            app.set_status(format!("Created playlist {name}"));
            app.notify(Change::Playlists);
        }
        Err(e) => app.set_status(format!("Cannot create playlist: {e}")),
    }
}

/// Delete a user playlist. The selection follows: deleting at or before the
/// selected index moves it back by one; deleting the selected playlist
/// activates the one before it.
pub(crate) fn delete_playlist(app: &mut App, index: usize) {
    let removed = match app.model.delete_playlist(index) {
        Ok(p) => p,
        Err(e) => {
            app.set_status(format!("Cannot delete playlist: {e}"));
            return;
        }
    };

    if let Err(e) = app.store.remove_playlist(removed.id) {
        log::warn!("could not save playlist deletion: {e}");
    }
    log::info!("deleted playlist {:?}", removed.name);
    app.set_status(format!("Deleted playlist {}", removed.name));
    app.notify(Change::Playlists);

    let selected = app.selected_playlist;
    if index == selected {
        activate_playlist(app, selected - 1);
    } else if index < selected {
        app.selected_playlist = selected - 1;
        if let Err(e) = app.store.set_selected_playlist(selected - 1) {
            log::warn!("could not save selected playlist: {e}");
        }
        app.notify(Change::Selection);
    }
}

pub(crate) fn add_to_playlist(app: &mut App, index: usize, song: SongId) {
    match app.model.add_to_playlist(index, &song) {
        Ok(true) => {
            persist_playlist(app, index);
            if index == app.selected_playlist {
                refresh_active(app);
            }
            app.notify(Change::Playlists);
        }
        Ok(false) => {}
        Err(e) => app.set_status(format!("Cannot add to playlist: {e}")),
    }
}

/// Remove from the selected playlist. In Favorites this unfavorites.
pub(crate) fn remove_from_playlist(app: &mut App, song: SongId) {
    let index = app.selected_playlist;

    match app.model.remove_from_playlist(index, &song) {
        Ok(Removal::Removed) => {
            persist_playlist(app, index);
        }
        Ok(Removal::Unfavorited) => {
            debug_assert_eq!(index, FAVORITES_INDEX);
            if let Err(e) = app.store.set_favorite(&song, false) {
                log::warn!("could not save favorite: {e}");
            }
            app.notify(Change::Library);
        }
        Ok(Removal::NotPresent) => return,
        Err(e) => {
            app.set_status(format!("Cannot remove from playlist: {e}"));
            return;
        }
    }

    refresh_active(app);
    app.notify(Change::Playlists);
}

fn persist_playlist(app: &mut App, index: usize) {
    let Some(p) = app.model.user_playlist(index) else {
        return;
    };
    let (id, record) = (
        p.id,
        PlaylistRecord {
            name: p.name.clone(),
            songs: p.songs.clone(),
        },
    );

    if let Err(e) = app.store.put_playlist(id, record) {
        log::warn!("could not save playlist: {e}");
        app.set_status(format!("Could not save playlist: {e}"));
    }
}
