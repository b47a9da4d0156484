//! app/update/songs.rs
//! Per-song edits: favorite flag, deletion.

use crate::core::library;
use crate::core::types::{FAVORITES_INDEX, SongId};

use super::super::state::{App, Change, NO_FILES, NO_TRACK};
use super::scan::refresh_active;

pub(crate) fn toggle_favorite(app: &mut App, id: SongId) {
    let favorite = match app.model.toggle_favorite(&id) {
        Ok(f) => f,
        Err(e) => {
            app.set_status(format!("Cannot change favorite: {e}"));
            return;
        }
    };

    if let Err(e) = app.store.set_favorite(&id, favorite) {
        log::warn!("could not save favorite: {e}");
        app.set_status(format!("Could not save favorite: {e}"));
    }

    if app.selected_playlist == FAVORITES_INDEX {
        refresh_active(app);
    }
    app.notify(Change::Library);
    app.notify(Change::Playlists);
}

/// Delete the file from the music folder and forget everything about it.
pub(crate) fn delete_song(app: &mut App, id: SongId) {
    let Some(song) = app.model.song(&id) else {
        app.set_status("Delete failed: song not found (rescan?).");
        return;
    };
    let path = song.path.clone();
    let name = song.track_name.clone();

    if let Err(e) = library::delete_file(&path) {
        log::error!("{e}");
        app.set_status(format!("Delete failed: {e}"));
        return;
    }

    // The transport may already point elsewhere (e.g. unfavorited while playing).
    if app.engine.current_path() == Some(path.as_path()) {
        app.engine.stop();
        app.set_now_playing(NO_TRACK);
    }

    app.model.remove_song(&id);
    if let Err(e) = app.store.forget_song(&id) {
        log::warn!("could not save deletion of {name}: {e}");
    }

    refresh_active(app);
    if app.model.is_empty() {
        app.set_now_playing(NO_FILES);
    }

    log::info!("deleted {name}");
    app.set_status(format!("Deleted {name}"));
    app.notify(Change::Library);
    app.notify(Change::Playlists);
}
