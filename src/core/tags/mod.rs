//! core/tags/mod.rs
//!
//! ID3 metadata reading.
//! Public API:
//! - [`read_embedded_art`] pulls cover art out of an MP3 (absent on any tag problem).

mod art;

pub use art::read_embedded_art;
