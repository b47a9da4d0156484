//! core/library.rs
//! The music folder: listing, importing and deleting files.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::error::{Error, Result};

/// Result of listing the music folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Folder is readable but holds no music.
    Empty,
    /// MP3 files, sorted by file name.
    Found(Vec<PathBuf>),
}

impl ScanOutcome {
    pub fn into_paths(self) -> Vec<PathBuf> {
        match self {
            ScanOutcome::Empty => Vec::new(),
            ScanOutcome::Found(paths) => paths,
        }
    }
}

/// What `import_files` did with each source.
#[derive(Debug, Default, Clone)]
pub struct ImportReport {
    pub imported: Vec<PathBuf>,
    /// Already present in the folder, or not an MP3.
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| Error::DirectoryInaccessible {
        path: dir.to_path_buf(),
        source,
    })
}

/// List MP3 files directly inside `dir`, creating it first if needed.
pub fn list_music_files(dir: &Path) -> Result<ScanOutcome> {
    if !dir.exists() {
        ensure_dir(dir)?;
        log::info!("created music folder {}", dir.display());
        return Ok(ScanOutcome::Empty);
    }

    let entries = fs::read_dir(dir).map_err(|source| Error::DirectoryInaccessible {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::DirectoryInaccessible {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_file() && is_mp3(&path) {
            out.push(path);
        }
    }

    if out.is_empty() {
        return Ok(ScanOutcome::Empty);
    }

    out.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(ScanOutcome::Found(out))
}

/// Copy external MP3 files into `dir`. Files whose name already exists there
/// are left alone.
pub fn import_files(sources: &[PathBuf], dir: &Path) -> Result<ImportReport> {
    ensure_dir(dir)?;

    let mut report = ImportReport::default();

    for src in sources {
        let Some(name) = src.file_name() else {
            report.skipped.push(src.clone());
            continue;
        };

        if !is_mp3(src) {
            log::debug!("not an mp3, skipping {}", src.display());
            report.skipped.push(src.clone());
            continue;
        }

        let dest = dir.join(name);
        if dest.exists() {
            log::info!("file already exists: {}", dest.display());
            report.skipped.push(src.clone());
            continue;
        }

        match fs::copy(src, &dest) {
            Ok(_) => report.imported.push(dest),
            Err(e) => {
                log::warn!("failed to copy {}: {e}", src.display());
                report.failed.push((src.clone(), e.to_string()));
            }
        }
    }

    Ok(report)
}

pub fn delete_file(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        // Already gone is as good as deleted.
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(path, e)),
    }
}

pub(crate) fn is_mp3(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("mp3"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let p = dir.join(name);
        fs::write(&p, bytes).unwrap();
        p
    }

    #[test]
    fn missing_folder_is_created_and_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("Music");

        let outcome = list_music_files(&dir).unwrap();

        assert_eq!(outcome, ScanOutcome::Empty);
        assert!(dir.is_dir());
    }

    #[test]
    fn lists_only_mp3_sorted_by_name() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "b.mp3", b"b");
        touch(tmp.path(), "a.MP3", b"a");
        touch(tmp.path(), "cover.jpg", b"c");
        fs::create_dir(tmp.path().join("nested.mp3")).unwrap();

        let paths = list_music_files(tmp.path()).unwrap().into_paths();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.MP3", "b.mp3"]);
    }

    #[test]
    fn a_file_in_place_of_the_folder_is_inaccessible() {
        let tmp = tempfile::tempdir().unwrap();
        let not_a_dir = touch(tmp.path(), "Music", b"oops");

        let err = list_music_files(&not_a_dir).unwrap_err();
        assert!(matches!(err, Error::DirectoryInaccessible { .. }));
    }

    #[test]
    fn import_skips_existing_and_non_mp3() {
        let src = tempfile::tempdir().unwrap();
        let music = tempfile::tempdir().unwrap();

        let new = touch(src.path(), "new.mp3", b"new");
        let dup = touch(src.path(), "dup.mp3", b"incoming");
        let txt = touch(src.path(), "readme.txt", b"hi");
        touch(music.path(), "dup.mp3", b"original");

        let report = import_files(&[new, dup.clone(), txt.clone()], music.path()).unwrap();

        assert_eq!(report.imported, vec![music.path().join("new.mp3")]);
        assert_eq!(report.skipped, vec![dup, txt]);
        assert!(report.failed.is_empty());
        assert_eq!(fs::read(music.path().join("dup.mp3")).unwrap(), b"original");
    }

    #[test]
    fn deleting_twice_is_fine() {
        let tmp = tempfile::tempdir().unwrap();
        let p = touch(tmp.path(), "gone.mp3", b"x");

        delete_file(&p).unwrap();
        delete_file(&p).unwrap();
        assert!(!p.exists());
    }
}
