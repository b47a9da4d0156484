//! app/update/scan.rs
//! Library (re)load and playlist activation.
//!
//! - Uses the explicit core pipeline:
//!   (A) core::library::list_music_files(dir) -> Vec<PathBuf>
//!   (B) core::read_songs(paths, store) -> (Vec<Song>, failures)
//! - Then rebuilds the model and points the transport at the selected playlist.

use std::path::PathBuf;

use crate::core;
use crate::core::library;
use crate::core::model::PlaylistModel;
use crate::core::types::SongId;

use super::super::state::{App, Change, NO_FILES, NO_TRACK};

/// Startup scan: build everything from disk + store, then activate the
/// last-selected playlist.
pub(crate) fn load_library(app: &mut App) {
    rebuild_model(app);

    let mut selected = app.store.selected_playlist();
    if selected >= app.model.playlist_count() {
        log::info!("saved playlist index {selected} no longer exists, showing All songs");
        selected = 0;
    }
    activate_playlist(app, selected);
}

/// Rescan the folder. Playback keeps going if the playing song survived.
pub(crate) fn rescan(app: &mut App) {
    let playing = app
        .engine
        .state()
        .is_loaded()
        .then(|| app.transport.current_id().cloned())
        .flatten();

    rebuild_model(app);

    if app.selected_playlist >= app.model.playlist_count() {
        activate_playlist(app, 0);
        return;
    }

    let selected = app.selected_playlist;
    match playing {
        Some(id) if app.model.song(&id).is_some() => refresh_active(app),
        _ => activate_playlist(app, selected),
    }
}

pub(crate) fn import(app: &mut App, sources: Vec<PathBuf>) {
    let report = match library::import_files(&sources, &app.config.music_dir) {
        Ok(r) => r,
        Err(e) => {
            log::error!("import failed: {e}");
            app.set_status(format!("Import error: {e}"));
            return;
        }
    };

    rescan(app);

    app.set_status(format!(
        "Imported {} files ({} skipped, {} failed)",
        report.imported.len(),
        report.skipped.len(),
        report.failed.len()
    ));
}

fn rebuild_model(app: &mut App) {
    let (songs, failures) = match core::scan_music_dir(&app.config.music_dir, &app.store) {
        Ok(r) => r,
        Err(e) => {
            // Degrade to an empty library; the UI shows "No MP3 files found".
            log::error!("{e}");
            app.model = PlaylistModel::new(Vec::new(), core::stored_playlists(&app.store));
            app.set_status(format!("Scan error: {e}"));
            app.notify(Change::Library);
            app.notify(Change::Playlists);
            return;
        }
    };

    app.model = PlaylistModel::new(songs, core::stored_playlists(&app.store));

    let count = app.model.all_songs().len();
    log::info!(
        "loaded {count} songs from {}",
        app.config.music_dir.display()
    );
    app.set_status(if failures == 0 {
        format!("Loaded {count} songs")
    } else {
        format!("Loaded {count} songs ({failures} unreadable)")
    });

    app.notify(Change::Library);
    app.notify(Change::Playlists);
}

/// Switch to playlist `index` and reset transport state: stop the track,
/// clear position, shuffle and repeat. Also used after deleting the selected
/// playlist, so it does not skip "already selected".
pub(crate) fn activate_playlist(app: &mut App, index: usize) {
    app.engine.stop();

    app.selected_playlist = index;
    let ids = active_ids(app);
    app.transport.reset(ids);

    app.is_playing = false;
    app.position_ms = 0;
    app.duration_ms = None;

    if let Err(e) = app.store.set_selected_playlist(index) {
        log::warn!("could not save selected playlist: {e}");
    }

    let idle_text = if app.model.is_empty() { NO_FILES } else { NO_TRACK };
    app.set_now_playing(idle_text);

    app.notify(Change::Selection);
    app.notify(Change::Transport);
}

/// Contents of the selected playlist changed; keep shuffle/repeat and the
/// current song.
pub(crate) fn refresh_active(app: &mut App) {
    let ids = active_ids(app);
    app.transport.refresh(ids);
    app.notify(Change::Transport);
}

fn active_ids(app: &App) -> Vec<SongId> {
    app.model
        .songs_in(app.selected_playlist)
        .iter()
        .map(|s| s.id.clone())
        .collect()
}
