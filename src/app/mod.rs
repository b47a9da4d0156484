//! app/mod.rs
//!
//! The state owner a front end talks to:
//! - app state ('App')
//! - intents ('Message')
//! - update logic ('update()')
//! - change notifications ('Change', via `App::subscribe`)
//! - small helpers ('util')
//!
//! Drawing is the front end's business; nothing here renders.

pub(crate) mod state;
pub(crate) mod update;
pub mod util;

pub use state::{App, Change, Message};
pub use update::update;
