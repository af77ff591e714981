use std::path::{Component, Path, PathBuf};

use super::{AudioIndex, basename};
use crate::AUDIO_EXTENSIONS;
use crate::models::Resolution;

/// Matches cited filenames against the audio under one root.
pub struct Resolver<'a> {
    root: PathBuf,
    index: &'a AudioIndex,
}

impl<'a> Resolver<'a> {
    pub fn new(root: impl Into<PathBuf>, index: &'a AudioIndex) -> Self {
        Self { root: root.into(), index }
    }

    pub fn resolve(&self, filename: &str) -> Resolution {
        resolve_with(filename, self.index, |rel| self.root.join(rel).is_file())
    }
}

/// Resolve a cited filename. First match wins:
///
/// 1. empty filename → missing
/// 2. `root/filename` is a regular file → that path
/// 3. basename (case-folded) is indexed → indexed path
/// 4. stem + each of `AUDIO_EXTENSIONS`, in order, is indexed → first hit
/// 5. otherwise missing, with the original filename kept for display
///
/// `is_file` answers step 2 for a root-relative path.
pub fn resolve_with<F>(filename: &str, index: &AudioIndex, is_file: F) -> Resolution
where
    F: Fn(&Path) -> bool,
{
    if filename.is_empty() {
        return Resolution::missing(filename);
    }

    if let Some(rel) = literal_relative(filename) {
        if is_file(Path::new(&rel)) {
            return Resolution::found(rel);
        }
    }

    let base = basename(filename);
    if let Some(path) = index.get(&base.to_lowercase()) {
        return Resolution::found(path);
    }

    // Wrong or misspelled extension in the sheet
    let stem = stem(base);
    for ext in AUDIO_EXTENSIONS {
        let candidate = format!("{}.{}", stem, ext).to_lowercase();
        if let Some(path) = index.get(&candidate) {
            return Resolution::found(path);
        }
    }

    Resolution::missing(filename)
}

/// Normalized `/`-separated form of a cited path, if it stays inside the root.
fn literal_relative(filename: &str) -> Option<String> {
    let unified = filename.replace('\\', "/");
    let path = Path::new(&unified);
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(p) => parts.push(p.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Basename without its last extension. Dotfiles keep their name.
fn stem(base: &str) -> &str {
    match base.rfind('.') {
        Some(0) | None => base,
        Some(i) => &base[..i],
    }
}
