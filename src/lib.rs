//! Songbook
//!
//! Local MP3 playback core: a music folder scanned into songs with
//! content-hash ids, favorites and user playlists saved on disk, and a
//! playback engine that plays one file at a time.
//!
//! # How to drive it
//! Think "message loop":
//!
//! - `App` = the *entire memory* of the player
//! - `Message` = "something happened" (button pressed, one second passed)
//! - `update(app, message)` = handles it and mutates `App`
//! - `App::subscribe()` = tells a front end what to redraw
//!
//! Send `Message::Tick` once per `Config::tick_interval` so the engine can
//! report position and move on when a track ends.

pub mod app;
pub mod config;
pub mod core;

pub use app::{App, Change, Message, update};
pub use config::Config;
