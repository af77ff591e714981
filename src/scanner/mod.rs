pub mod resolve;

use crate::AUDIO_EXTENSIONS;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

pub use resolve::{Resolver, resolve_with};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Root {path} is not a directory")]
    NotADirectory { path: String },
}

/// Lowercased basename → root-relative path for every audio file under a root.
///
/// The first file seen for a basename is canonical. Later files with the same
/// basename are kept in `duplicates` for reporting only.
#[derive(Debug, Default, Clone)]
pub struct AudioIndex {
    entries: HashMap<String, String>,
    duplicates: BTreeMap<String, Vec<String>>,
}

impl AudioIndex {
    /// Build an index from root-relative, `/`-separated paths in encounter order.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = AudioIndex::default();
        for rel in paths {
            index.insert(rel.into());
        }
        index
    }

    fn insert(&mut self, rel: String) {
        let key = basename(&rel).to_lowercase();
        if self.entries.contains_key(&key) {
            self.duplicates.entry(key).or_default().push(rel);
        } else {
            self.entries.insert(key, rel);
        }
    }

    /// Look up a lowercased basename.
    pub fn get(&self, basename: &str) -> Option<&str> {
        self.entries.get(basename).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shadowed files, keyed by lowercased basename.
    pub fn duplicates(&self) -> &BTreeMap<String, Vec<String>> {
        &self.duplicates
    }

    /// Total number of shadowed occurrences across all basenames.
    pub fn duplicate_count(&self) -> usize {
        self.duplicates.values().map(Vec::len).sum()
    }
}

/// Walk `root` and index every audio file.
///
/// Traversal is sorted by file name at each level, so the canonical entry for a
/// duplicated basename is stable across runs and filesystems.
pub fn index_audio(root: &Path) -> Result<AudioIndex, ScanError> {
    if !std::fs::metadata(root)?.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.display().to_string(),
        });
    }

    let mut index = AudioIndex::default();
    for entry in walk_files(root) {
        if !has_extension(entry.path(), AUDIO_EXTENSIONS) {
            continue;
        }
        if let Some(rel) = relative_path(root, entry.path()) {
            index.insert(rel);
        }
    }

    log::info!("Indexed {} audio file(s) under {}", index.len(), root.display());
    if !index.duplicates.is_empty() {
        log::warn!(
            "Duplicate basenames detected ({}). Using first seen; others noted.",
            index.duplicates.len()
        );
        for (name, shadowed) in &index.duplicates {
            log::debug!("{} shadows {}", index.entries[name], shadowed.join(", "));
        }
    }

    Ok(index)
}

/// Regular files under `root`, depth-first, sorted by name. Symlinks are followed;
/// unreadable entries and link loops are skipped.
pub(crate) fn walk_files(root: &Path) -> impl Iterator<Item = walkdir::DirEntry> {
    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
}

pub(crate) fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    allowed.contains(&ext.as_str())
}

/// `path` relative to `root` with `/` separators. `None` if `path` is outside `root`.
pub(crate) fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let joined = parts.join("/");
    if rel.to_str().is_none() {
        log::warn!(
            "Non-UTF-8 file name {} indexed as {}; its link will not load",
            path.display(),
            joined
        );
    }
    Some(joined)
}

/// Final component of a `/`- or `\`-separated path.
pub(crate) fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn first_seen_wins_and_rest_are_duplicates() {
        let index = AudioIndex::from_paths([
            "azure/jane.aac",
            "aws/Jane.AAC",
            "old/jane.aac",
            "gcp/bob.m4a",
        ]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("jane.aac"), Some("azure/jane.aac"));
        assert_eq!(
            index.duplicates().get("jane.aac"),
            Some(&vec!["aws/Jane.AAC".to_string(), "old/jane.aac".to_string()])
        );
        assert_eq!(index.duplicate_count(), 2);
        assert!(index.duplicates().get("bob.m4a").is_none());
    }

    #[test]
    fn lookup_is_by_lowercased_basename() {
        let index = AudioIndex::from_paths(["a/b/Voice_01.M4A"]);
        assert_eq!(index.get("voice_01.m4a"), Some("a/b/Voice_01.M4A"));
        assert_eq!(index.get("Voice_01.M4A"), None);
    }

    #[test]
    fn basename_handles_both_separators() {
        assert_eq!(basename("a/b/c.aac"), "c.aac");
        assert_eq!(basename(r"a\b\c.aac"), "c.aac");
        assert_eq!(basename("c.aac"), "c.aac");
        assert_eq!(basename(""), "");
    }

    #[test]
    fn index_audio_walks_sorted_and_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::create_dir_all(root.join("a/nested")).unwrap();
        fs::write(root.join("b/jane.aac"), b"x").unwrap();
        fs::write(root.join("a/nested/jane.aac"), b"x").unwrap();
        fs::write(root.join("a/typo.ACC"), b"x").unwrap();
        fs::write(root.join("a/notes.txt"), b"x").unwrap();
        fs::write(root.join("clip.wav"), b"x").unwrap();

        let index = index_audio(root).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("jane.aac"), Some("a/nested/jane.aac"));
        assert_eq!(index.get("typo.acc"), Some("a/typo.ACC"));
        assert_eq!(
            index.duplicates().get("jane.aac"),
            Some(&vec!["b/jane.aac".to_string()])
        );
    }

    #[cfg(unix)]
    #[test]
    fn index_audio_follows_symlinked_files() {
        let store = tempfile::tempdir().unwrap();
        let real = store.path().join("real.aac");
        fs::write(&real, b"x").unwrap();

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("audio")).unwrap();
        std::os::unix::fs::symlink(&real, root.join("audio/jane.aac")).unwrap();

        let index = index_audio(root).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("jane.aac"), Some("audio/jane.aac"));
    }

    #[cfg(unix)]
    #[test]
    fn index_audio_skips_symlink_loops() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("a/jane.aac"), b"x").unwrap();
        std::os::unix::fs::symlink(root, root.join("a/loop")).unwrap();

        let index = index_audio(root).unwrap();
        assert_eq!(index.get("jane.aac"), Some("a/jane.aac"));
    }

    #[cfg(unix)]
    #[test]
    fn relative_path_replaces_non_utf8_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let root = Path::new("/srv/samples");
        let path = root.join(OsStr::from_bytes(b"a/jane\xff.aac"));
        assert_eq!(
            relative_path(root, &path).as_deref(),
            Some("a/jane\u{FFFD}.aac")
        );
    }

    #[test]
    fn index_audio_rejects_file_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.aac");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(
            index_audio(&file),
            Err(ScanError::NotADirectory { .. })
        ));
    }

    #[test]
    fn index_audio_missing_root_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            index_audio(&dir.path().join("nope")),
            Err(ScanError::Io(_))
        ));
    }
}
