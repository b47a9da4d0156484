use std::path::Path;

use id3::Tag;
use id3::frame::Content;

use crate::core::types::Artwork;

/// First embedded picture (APIC/PIC), if the file has a readable tag with one.
///
/// Missing or malformed tags are not an error here: the song just gets the
/// placeholder cover.
pub fn read_embedded_art(path: &Path) -> Option<Artwork> {
    let tag = match Tag::read_from_path(path) {
        Ok(t) => t,
        Err(e) => {
            log::debug!("no readable tag in {}: {e}", path.display());
            return None;
        }
    };

    for f in tag.frames() {
        if f.id() != "APIC" && f.id() != "PIC" {
            continue;
        }
        if let Content::Picture(p) = f.content() {
            // id3 crate stores mime like "image/jpeg" etc
            return Some(Artwork {
                data: p.data.clone(),
                mime: p.mime_type.clone(),
            });
        }
    }

    None
}
