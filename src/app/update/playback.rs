//! app/update/playback.rs
//! App <-> playback engine bridge.
//!
//! - The transport decides *which* song; the engine plays it.
//! - `now_playing`, `is_playing`, position and duration are only updated from
//!   engine events, drained after every message.

use rand::thread_rng;

use crate::core::playback::PlayerEvent;

use super::super::state::{App, Change};

pub(crate) fn tick(app: &mut App) {
    app.engine.tick();
}

pub(crate) fn drain_events(app: &mut App) {
    while let Ok(ev) = app.playback_events.try_recv() {
        handle_event(app, ev);
    }
}

/// Load and start whatever the transport points at.
pub(crate) fn play_current(app: &mut App) {
    let Some(id) = app.transport.current_id() else {
        app.set_status("No track selected.");
        return;
    };

    let Some(song) = app.model.song(id) else {
        app.set_status("Play failed: track not found (rescan?).");
        return;
    };

    let path = song.path.clone();
    app.engine.load(&path);
    app.notify(Change::Transport);
}

pub(crate) fn play_at(app: &mut App, index: usize) {
    if app.transport.jump(index).is_none() {
        app.set_status(format!("No track at position {index}."));
        return;
    }
    play_current(app);
}

pub(crate) fn toggle_play_pause(app: &mut App) {
    if app.engine.state().is_loaded() {
        app.engine.toggle_play_pause();
    } else if !app.transport.is_empty() {
        play_current(app);
    }
}

pub(crate) fn next(app: &mut App) {
    if app.transport.advance().is_some() {
        play_current(app);
    }
}

pub(crate) fn previous(app: &mut App) {
    if app.transport.retreat().is_some() {
        play_current(app);
    }
}

/// Shuffle on: random order. Off: sorted again. Either way playback restarts
/// from the first song of the new order.
pub(crate) fn toggle_shuffle(app: &mut App) {
    let Some(on) = app.transport.toggle_shuffle(&mut thread_rng()) else {
        return;
    };
    log::debug!("shuffle {}", if on { "on" } else { "off" });
    play_current(app);
}

pub(crate) fn toggle_repeat(app: &mut App) {
    let on = app.transport.toggle_repeat();
    log::debug!("repeat {}", if on { "on" } else { "off" });
    app.notify(Change::Transport);
}

pub(crate) fn seek(app: &mut App, ms: u64) {
    app.engine.seek(ms);
}

pub(crate) fn set_volume(app: &mut App, volume: f32) {
    app.engine.set_volume(volume);
}

pub(crate) fn handle_event(app: &mut App, event: PlayerEvent) {
    match event {
        PlayerEvent::Started {
            path,
            duration_ms,
            start_ms,
        } => {
            app.is_playing = true;
            app.duration_ms = duration_ms;
            app.position_ms = start_ms;

            let title = match app.current_song() {
                Some(song) => song.display_name().to_string(),
                None => path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            };
            app.set_now_playing(title);
            app.notify(Change::Transport);
        }
        PlayerEvent::Paused => {
            app.is_playing = false;
            app.notify(Change::Transport);
        }
        PlayerEvent::Resumed => {
            app.is_playing = true;
            app.notify(Change::Transport);
        }
        PlayerEvent::Stopped => {
            app.is_playing = false;
            app.position_ms = 0;
            app.duration_ms = None;
            app.notify(Change::Transport);
        }
        PlayerEvent::Position { position_ms } => {
            app.position_ms = position_ms;
            app.notify(Change::Transport);
        }
        PlayerEvent::TrackEnded => {
            app.is_playing = false;
            app.position_ms = 0;

            // Repeat-one keeps the index; otherwise wrap to the next song.
            if app.transport.on_track_end().is_some() {
                play_current(app);
            }
        }
        PlayerEvent::Error(err) => {
            app.is_playing = false;
            app.position_ms = 0;
            app.duration_ms = None;
            app.set_now_playing(format!("Error playing track: {err}"));
            app.set_status(format!("Playback error: {err}"));
        }
        PlayerEvent::SeekFailed(err) => app.set_status(err),
    }
}
