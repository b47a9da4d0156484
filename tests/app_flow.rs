//! End-to-end app tests
//!
//! Real music folder + state file in a temp dir, fake audio output.
//! Focus on what a user does: pick playlists, favorite, skip, shuffle.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use songbook::core::Error;
use songbook::core::playback::{AudioOutput, PlaybackState};
use songbook::core::types::SongId;
use songbook::{App, Change, Config, Message, update};
use tempfile::TempDir;

// ===== Test Helpers =====

#[derive(Default)]
struct Shared {
    position: Duration,
    loads: Vec<PathBuf>,
    playing: bool,
    fail_seek: bool,
}

struct FakeOutput {
    shared: Rc<RefCell<Shared>>,
}

const TRACK_LEN: Duration = Duration::from_secs(30);

impl AudioOutput for FakeOutput {
    fn load(&mut self, path: &Path) -> songbook::core::Result<Option<Duration>> {
        let name = path.file_name().unwrap().to_string_lossy();
        if name.starts_with("broken") {
            return Err(Error::Decode("no supported audio track found".into()));
        }
        let mut s = self.shared.borrow_mut();
        s.loads.push(path.to_path_buf());
        s.position = Duration::ZERO;
        Ok(Some(TRACK_LEN))
    }
    fn play(&mut self) {
        self.shared.borrow_mut().playing = true;
    }
    fn pause(&mut self) {
        self.shared.borrow_mut().playing = false;
    }
    fn seek(&mut self, position: Duration) -> songbook::core::Result<()> {
        let mut s = self.shared.borrow_mut();
        if s.fail_seek {
            return Err(Error::Seek("reopen failed".into()));
        }
        s.position = position;
        Ok(())
    }
    fn stop(&mut self) {
        self.shared.borrow_mut().playing = false;
    }
    fn position(&self) -> Duration {
        self.shared.borrow().position
    }
    fn is_finished(&self) -> bool {
        false
    }
    fn set_volume(&mut self, _volume: f32) {}
}

struct Harness {
    dir: TempDir,
    shared: Rc<RefCell<Shared>>,
}

impl Harness {
    fn with_files(names: &[&str]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let music = dir.path().join("Music");
        fs::create_dir_all(&music).unwrap();
        for name in names {
            // Distinct bytes per file, so distinct hashes.
            fs::write(music.join(name), format!("fake audio for {name}")).unwrap();
        }
        Self {
            dir,
            shared: Rc::new(RefCell::new(Shared::default())),
        }
    }

    fn config(&self) -> Config {
        Config::rooted_at(self.dir.path())
    }

    fn music_dir(&self) -> PathBuf {
        self.config().music_dir
    }

    fn open(&self) -> App {
        let output = FakeOutput {
            shared: Rc::clone(&self.shared),
        };
        App::with_output(self.config(), Box::new(output))
    }

    fn last_loaded(&self) -> String {
        let s = self.shared.borrow();
        let p = s.loads.last().expect("nothing loaded");
        p.file_name().unwrap().to_string_lossy().into_owned()
    }

    fn set_position(&self, pos: Duration) {
        self.shared.borrow_mut().position = pos;
    }
}

fn active_names(app: &App) -> Vec<String> {
    app.active_songs()
        .iter()
        .map(|s| s.track_name.clone())
        .collect()
}

fn id_of(app: &App, name: &str) -> SongId {
    app.model()
        .all_songs()
        .iter()
        .find(|s| s.track_name == name)
        .map(|s| s.id.clone())
        .unwrap()
}

fn favorites(app: &App) -> Vec<String> {
    app.model()
        .favorites()
        .iter()
        .map(|s| s.track_name.clone())
        .collect()
}

// ===== Library =====

#[test]
fn scan_sorts_and_favorites_derive() {
    let h = Harness::with_files(&["b.mp3", "a.mp3"]);
    let mut app = h.open();

    assert_eq!(active_names(&app), vec!["a.mp3", "b.mp3"]);

    let b = id_of(&app, "b.mp3");
    update(&mut app, Message::ToggleFavorite(b));

    assert_eq!(favorites(&app), vec!["b.mp3"]);
    update(&mut app, Message::SelectPlaylist(1));
    assert_eq!(active_names(&app), vec!["b.mp3"]);
}

#[test]
fn empty_folder_says_so() {
    let h = Harness::with_files(&[]);
    let app = h.open();

    assert!(app.active_songs().is_empty());
    assert_eq!(app.now_playing(), "No MP3 files found");
}

#[test]
fn missing_folder_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::rooted_at(dir.path());
    let app = App::with_output(
        config.clone(),
        Box::new(FakeOutput {
            shared: Rc::default(),
        }),
    );

    assert!(config.music_dir.is_dir());
    assert_eq!(app.now_playing(), "No MP3 files found");
}

#[test]
fn state_survives_restart() {
    let h = Harness::with_files(&["a.mp3", "b.mp3", "c.mp3"]);

    {
        let mut app = h.open();
        let a = id_of(&app, "a.mp3");
        let c = id_of(&app, "c.mp3");

        update(&mut app, Message::ToggleFavorite(a));
        update(&mut app, Message::CreatePlaylist("Road trip".into()));
        update(
            &mut app,
            Message::AddToPlaylist {
                playlist: 2,
                song: c,
            },
        );
        update(&mut app, Message::SelectPlaylist(2));
    }

    let app = h.open();
    assert_eq!(favorites(&app), vec!["a.mp3"]);
    assert_eq!(app.selected_playlist(), 2);
    assert_eq!(app.selected_playlist_name(), "Road trip");
    assert_eq!(active_names(&app), vec!["c.mp3"]);
}

#[test]
fn import_skips_existing_and_rescans() {
    let h = Harness::with_files(&["a.mp3"]);
    let outside = tempfile::tempdir().unwrap();
    let new = outside.path().join("new.mp3");
    let dup = outside.path().join("a.mp3");
    fs::write(&new, "brand new").unwrap();
    fs::write(&dup, "different bytes, same name").unwrap();

    let mut app = h.open();
    update(&mut app, Message::Import(vec![new, dup]));

    assert_eq!(active_names(&app), vec!["a.mp3", "new.mp3"]);
    assert_eq!(
        fs::read_to_string(h.music_dir().join("a.mp3")).unwrap(),
        "fake audio for a.mp3"
    );
    assert_eq!(app.status(), "Imported 1 files (1 skipped, 0 failed)");
}

#[test]
fn deleting_the_playing_song_stops_it_and_cleans_up() {
    let h = Harness::with_files(&["a.mp3", "b.mp3"]);
    let mut app = h.open();
    let a = id_of(&app, "a.mp3");

    update(&mut app, Message::ToggleFavorite(a.clone()));
    update(&mut app, Message::CreatePlaylist("Mix".into()));
    update(
        &mut app,
        Message::AddToPlaylist {
            playlist: 2,
            song: a.clone(),
        },
    );
    update(&mut app, Message::PlayAt(0));
    assert_eq!(app.playback_state(), &PlaybackState::Playing);

    update(&mut app, Message::DeleteSong(a));

    assert!(!h.music_dir().join("a.mp3").exists());
    assert_eq!(app.playback_state(), &PlaybackState::Idle);
    assert_eq!(active_names(&app), vec!["b.mp3"]);
    assert!(favorites(&app).is_empty());
    assert!(app.model().user_playlist(2).unwrap().songs.is_empty());
}

// ===== Playlists =====

#[test]
fn switching_playlists_resets_transport() {
    let h = Harness::with_files(&["a.mp3", "b.mp3", "c.mp3"]);
    let mut app = h.open();
    let b = id_of(&app, "b.mp3");
    update(&mut app, Message::ToggleFavorite(b));

    update(&mut app, Message::PlayAt(2));
    update(&mut app, Message::ToggleRepeat);
    assert!(app.is_repeating());

    update(&mut app, Message::SelectPlaylist(1));

    assert_eq!(app.playback_state(), &PlaybackState::Idle);
    assert!(!app.is_repeating());
    assert!(!app.is_shuffling());
    assert!(!app.is_playing());
    assert_eq!(app.position_ms(), 0);
    assert_eq!(app.current_index(), Some(0));
    assert_eq!(app.now_playing(), "No track loaded");
}

#[test]
fn reselecting_the_same_playlist_keeps_playing() {
    let h = Harness::with_files(&["a.mp3", "b.mp3"]);
    let mut app = h.open();

    update(&mut app, Message::PlayAt(1));
    update(&mut app, Message::SelectPlaylist(0));

    assert_eq!(app.playback_state(), &PlaybackState::Playing);
    assert_eq!(app.current_index(), Some(1));
}

#[test]
fn adding_twice_keeps_one_entry() {
    let h = Harness::with_files(&["a.mp3"]);
    let mut app = h.open();
    let a = id_of(&app, "a.mp3");
    update(&mut app, Message::CreatePlaylist("Once".into()));

    for _ in 0..2 {
        update(
            &mut app,
            Message::AddToPlaylist {
                playlist: 2,
                song: a.clone(),
            },
        );
    }

    assert_eq!(app.playlists()[2].song_count, 1);
}

#[test]
fn duplicate_playlist_name_is_refused() {
    let h = Harness::with_files(&["a.mp3"]);
    let mut app = h.open();

    update(&mut app, Message::CreatePlaylist("Gym".into()));
    update(&mut app, Message::CreatePlaylist(" Gym ".into()));

    assert_eq!(app.playlists().len(), 3);
    assert!(app.status().starts_with("Cannot create playlist"));
}

#[test]
fn deleting_selected_playlist_selects_previous() {
    let h = Harness::with_files(&["a.mp3"]);
    let mut app = h.open();
    update(&mut app, Message::CreatePlaylist("One".into()));
    update(&mut app, Message::CreatePlaylist("Two".into()));
    update(&mut app, Message::SelectPlaylist(3));
    let a = id_of(&app, "a.mp3");
    update(
        &mut app,
        Message::AddToPlaylist {
            playlist: 3,
            song: a,
        },
    );
    update(&mut app, Message::PlayAt(0));
    update(&mut app, Message::ToggleShuffle);
    update(&mut app, Message::ToggleRepeat);
    assert_eq!(app.playback_state(), &PlaybackState::Playing);

    update(&mut app, Message::DeletePlaylist(3));

    assert_eq!(app.selected_playlist(), 2);
    assert_eq!(app.selected_playlist_name(), "One");
    assert_eq!(app.playback_state(), &PlaybackState::Idle);
    assert!(!app.is_shuffling());
    assert!(!app.is_repeating());
    assert!(!app.is_playing());
    assert_eq!(app.now_playing(), "No track loaded");
}

#[test]
fn deleting_an_earlier_playlist_keeps_the_selection() {
    let h = Harness::with_files(&["a.mp3"]);
    let mut app = h.open();
    update(&mut app, Message::CreatePlaylist("One".into()));
    update(&mut app, Message::CreatePlaylist("Two".into()));
    update(&mut app, Message::SelectPlaylist(3));

    update(&mut app, Message::DeletePlaylist(2));

    assert_eq!(app.selected_playlist(), 2);
    assert_eq!(app.selected_playlist_name(), "Two");
}

#[test]
fn builtin_playlists_cannot_be_deleted() {
    let h = Harness::with_files(&["a.mp3"]);
    let mut app = h.open();
    update(&mut app, Message::SelectPlaylist(1));

    update(&mut app, Message::DeletePlaylist(0));
    update(&mut app, Message::DeletePlaylist(1));

    assert_eq!(app.playlists().len(), 2);
    assert_eq!(app.selected_playlist(), 1);
    assert!(app.status().starts_with("Cannot delete playlist"));
}

#[test]
fn deleting_a_song_that_left_the_view_still_stops_it() {
    let h = Harness::with_files(&["a.mp3", "b.mp3"]);
    let mut app = h.open();
    let a = id_of(&app, "a.mp3");
    let b = id_of(&app, "b.mp3");
    update(&mut app, Message::ToggleFavorite(a.clone()));
    update(&mut app, Message::ToggleFavorite(b));
    update(&mut app, Message::SelectPlaylist(1));
    update(&mut app, Message::PlayAt(0));
    assert_eq!(h.last_loaded(), "a.mp3");

    // Unfavorited while playing: gone from the view, still audible.
    update(&mut app, Message::ToggleFavorite(a.clone()));
    assert_eq!(active_names(&app), vec!["b.mp3"]);
    assert_eq!(app.playback_state(), &PlaybackState::Playing);

    update(&mut app, Message::DeleteSong(a));

    assert_eq!(app.playback_state(), &PlaybackState::Idle);
    assert!(!app.is_playing());
    assert_eq!(app.now_playing(), "No track loaded");
    assert!(!h.music_dir().join("a.mp3").exists());
}

#[test]
fn removing_from_favorites_unfavorites() {
    let h = Harness::with_files(&["a.mp3", "b.mp3"]);
    let mut app = h.open();
    let a = id_of(&app, "a.mp3");
    let b = id_of(&app, "b.mp3");
    update(&mut app, Message::ToggleFavorite(a.clone()));
    update(&mut app, Message::ToggleFavorite(b));
    update(&mut app, Message::SelectPlaylist(1));

    update(&mut app, Message::RemoveFromPlaylist(a));

    assert_eq!(active_names(&app), vec!["b.mp3"]);
    assert_eq!(app.model().all_songs().len(), 2);
    assert_eq!(favorites(&app), vec!["b.mp3"]);
}

// ===== Transport =====

#[test]
fn previous_then_next_returns_to_start() {
    let h = Harness::with_files(&["a.mp3", "b.mp3", "c.mp3"]);
    let mut app = h.open();
    update(&mut app, Message::PlayAt(0));

    update(&mut app, Message::Previous);
    assert_eq!(h.last_loaded(), "c.mp3");

    update(&mut app, Message::Next);
    assert_eq!(h.last_loaded(), "a.mp3");
    assert_eq!(app.current_index(), Some(0));
    assert_eq!(app.now_playing(), "a");
}

#[test]
fn track_end_advances_and_repeat_replays() {
    let h = Harness::with_files(&["a.mp3", "b.mp3"]);
    let mut app = h.open();
    update(&mut app, Message::PlayAt(0));

    h.set_position(TRACK_LEN - Duration::from_millis(500));
    update(&mut app, Message::Tick);
    assert_eq!(h.last_loaded(), "b.mp3");
    assert_eq!(app.playback_state(), &PlaybackState::Playing);

    update(&mut app, Message::ToggleRepeat);
    h.set_position(TRACK_LEN);
    update(&mut app, Message::Tick);
    assert_eq!(h.last_loaded(), "b.mp3");
    assert_eq!(h.shared.borrow().loads.len(), 3);
}

#[test]
fn shuffle_then_unshuffle_restores_order() {
    let names = ["a.mp3", "b.mp3", "c.mp3", "d.mp3", "e.mp3", "f.mp3"];
    let h = Harness::with_files(&names);
    let mut app = h.open();

    update(&mut app, Message::ToggleShuffle);
    assert!(app.is_shuffling());
    let mut shuffled = active_names(&app);
    shuffled.sort();
    assert_eq!(shuffled, names);
    assert_eq!(app.current_index(), Some(0));

    update(&mut app, Message::ToggleShuffle);
    assert!(!app.is_shuffling());
    assert_eq!(active_names(&app), names);
    assert_eq!(h.last_loaded(), "a.mp3");
}

#[test]
fn pause_resume_and_seek() {
    let h = Harness::with_files(&["a.mp3"]);
    let mut app = h.open();
    update(&mut app, Message::PlayAt(0));
    assert_eq!(app.duration_ms(), Some(30_000));

    update(&mut app, Message::TogglePlayPause);
    assert!(!app.is_playing());
    assert_eq!(app.playback_state(), &PlaybackState::Paused);

    update(&mut app, Message::Seek(12_000));
    assert_eq!(app.position_ms(), 12_000);
    assert_eq!(app.time_label(), ("00:12".to_string(), "00:30".to_string()));

    update(&mut app, Message::TogglePlayPause);
    assert!(app.is_playing());
}

#[test]
fn failed_seek_keeps_playing() {
    let h = Harness::with_files(&["a.mp3"]);
    let mut app = h.open();
    update(&mut app, Message::PlayAt(0));
    update(&mut app, Message::Seek(4_000));
    h.shared.borrow_mut().fail_seek = true;

    update(&mut app, Message::Seek(20_000));

    assert_eq!(app.playback_state(), &PlaybackState::Playing);
    assert!(app.is_playing());
    assert_eq!(app.now_playing(), "a");
    assert_eq!(app.position_ms(), 4_000);
    assert_eq!(app.duration_ms(), Some(30_000));
    assert!(app.status().starts_with("Seek failed"));
}

#[test]
fn broken_file_surfaces_an_error() {
    let h = Harness::with_files(&["a.mp3", "broken.mp3"]);
    let mut app = h.open();

    update(&mut app, Message::PlayAt(1));

    assert!(matches!(app.playback_state(), PlaybackState::Error(_)));
    assert!(app.now_playing().starts_with("Error playing track"));
    assert!(!app.is_playing());

    // No retry: ticking does nothing until the user moves on.
    update(&mut app, Message::Tick);
    assert!(matches!(app.playback_state(), PlaybackState::Error(_)));

    update(&mut app, Message::Next);
    assert_eq!(h.last_loaded(), "a.mp3");
}

#[test]
fn observers_hear_about_changes() {
    let h = Harness::with_files(&["a.mp3"]);
    let mut app = h.open();
    let changes = app.subscribe();
    let a = id_of(&app, "a.mp3");

    update(&mut app, Message::ToggleFavorite(a));
    update(&mut app, Message::PlayAt(0));

    let seen: Vec<Change> = changes.try_iter().collect();
    assert!(seen.contains(&Change::Library));
    assert!(seen.contains(&Change::NowPlaying));
    assert!(seen.contains(&Change::Transport));
}
