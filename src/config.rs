//! Where things live, and how often playback is polled.
//!
//! Defaults sit under the platform data dir; the environment can override
//! them (handy for tests and for keeping a second library around).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const APP_DIR: &str = "songbook";
pub const MUSIC_SUBDIR: &str = "Music";
pub const STATE_FILE: &str = "state.json";

pub const MUSIC_DIR_ENV: &str = "SONGBOOK_MUSIC_DIR";
pub const STATE_FILE_ENV: &str = "SONGBOOK_STATE_FILE";

/// Playback position poll / end-of-track check.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct Config {
    pub music_dir: PathBuf,
    pub state_file: PathBuf,
    pub tick_interval: Duration,
}

impl Config {
    /// Music folder and state file side by side under `root`.
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            music_dir: root.join(MUSIC_SUBDIR),
            state_file: root.join(STATE_FILE),
            tick_interval: TICK_INTERVAL,
        }
    }

    /// Defaults, then environment overrides.
    pub fn from_env() -> Self {
        let root = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);
        let mut config = Self::rooted_at(root);

        if let Some(dir) = env::var_os(MUSIC_DIR_ENV) {
            config.music_dir = PathBuf::from(dir);
        }
        if let Some(file) = env::var_os(STATE_FILE_ENV) {
            config.state_file = PathBuf::from(file);
        }

        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
