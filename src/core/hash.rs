//! core/hash.rs
//! Content identity: SHA-256 over the file bytes.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use super::error::{Error, Result};
use super::types::SongId;

const CHUNK: usize = 64 * 1024;

pub fn content_hash(path: &Path) -> Result<SongId> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut reader = BufReader::new(file);

    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; CHUNK];
    loop {
        let n = reader.read(&mut buf).map_err(|e| Error::io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(SongId::from_hex(hex::encode(hasher.finalize())))
}
