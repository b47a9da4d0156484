//! app/update/mod.rs
//! Update logic (router).
//! Mutates state in response to `Message` events.

use super::state::{App, Message};

mod playback;
mod playlists;
pub(crate) mod scan;
mod songs;

pub fn update(app: &mut App, message: Message) {
    match message {
        Message::Tick => playback::tick(app),

        // Library
        Message::Rescan => scan::rescan(app),
        Message::Import(paths) => scan::import(app, paths),
        Message::DeleteSong(id) => songs::delete_song(app, id),
        Message::ToggleFavorite(id) => songs::toggle_favorite(app, id),

        // Playlists
        Message::SelectPlaylist(i) => playlists::select_playlist(app, i),
        Message::CreatePlaylist(name) => playlists::create_playlist(app, name),
        Message::DeletePlaylist(i) => playlists::delete_playlist(app, i),
        Message::AddToPlaylist { playlist, song } => {
            playlists::add_to_playlist(app, playlist, song)
        }
        Message::RemoveFromPlaylist(id) => playlists::remove_from_playlist(app, id),

        // Transport
        Message::PlayAt(i) => playback::play_at(app, i),
        Message::TogglePlayPause => playback::toggle_play_pause(app),
        Message::Next => playback::next(app),
        Message::Previous => playback::previous(app),
        Message::ToggleShuffle => playback::toggle_shuffle(app),
        Message::ToggleRepeat => playback::toggle_repeat(app),
        Message::Seek(ms) => playback::seek(app, ms),
        Message::SetVolume(v) => playback::set_volume(app, v),
    }

    // Engine events raised by the message (Started, TrackEnded, ...).
    playback::drain_events(app);
}
