//! Songbook (headless)
//!
//! Opens the music folder, selects the playlist that was selected last time
//! and plays it from the top, polling playback once per tick. Shuffle,
//! repeat and playlist edits belong to a front end; this binary only plays.
//!
//! Configuration comes from the environment (see `config.rs`):
//! - `SONGBOOK_MUSIC_DIR`, `SONGBOOK_STATE_FILE`
//! - `RUST_LOG` (default `info`)

use std::process::ExitCode;
use std::thread;

use songbook::core::playback::PlaybackState;
use songbook::{App, Change, Config, Message, update};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    log::info!("music folder: {}", config.music_dir.display());
    log::info!("state file: {}", config.state_file.display());

    let tick = config.tick_interval;
    let mut app = match App::open(config) {
        Ok(app) => app,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let changes = app.subscribe();

    log::info!("{}", app.status());
    if app.active_songs().is_empty() {
        log::info!("{} is empty: {}", app.selected_playlist_name(), app.now_playing());
        return ExitCode::SUCCESS;
    }

    log::info!("playing playlist {}", app.selected_playlist_name());
    update(&mut app, Message::PlayAt(0));

    // Consecutive load failures; give up once every song failed in a row.
    let mut failures = 0usize;

    loop {
        let state = app.playback_state().clone();
        match state {
            PlaybackState::Error(_) => {
                failures += 1;
                if failures >= app.active_songs().len() {
                    log::error!("no playable tracks in {}", app.selected_playlist_name());
                    return ExitCode::FAILURE;
                }
                update(&mut app, Message::Next);
                continue;
            }
            PlaybackState::Playing => failures = 0,
            PlaybackState::Idle | PlaybackState::Paused => {}
        }

        thread::sleep(tick);
        update(&mut app, Message::Tick);

        for change in changes.try_iter() {
            if change == Change::NowPlaying {
                log::info!("now playing: {}", app.now_playing());
            }
        }
    }
}
