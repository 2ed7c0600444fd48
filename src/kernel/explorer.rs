//! Directory tree cache: lazily fetched listings keyed by path, plus the
//! expansion set and selection the tree view renders from.

use std::path::{Path, PathBuf};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::kernel::effect::Effect;
use crate::kernel::services::ports::DirEntry;

#[derive(Debug, Default)]
pub struct ExplorerState {
    root: Option<PathBuf>,
    entries: FxHashMap<PathBuf, Vec<DirEntry>>,
    expanded: FxHashSet<PathBuf>,
    selected: Option<PathBuf>,
}

impl ExplorerState {
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn is_expanded(&self, path: &Path) -> bool {
        self.expanded.contains(path)
    }

    /// Cached listing for `path`. `None` while expanded means the fetch is
    /// still in flight (or failed); the view renders it as loading or empty.
    pub fn children(&self, path: &Path) -> Option<&[DirEntry]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    /// Replace the root wholesale: cache, expansion and selection reset, and
    /// the new root (if any) is auto-expanded.
    pub fn set_root(&mut self, root: Option<PathBuf>) -> (bool, Vec<Effect>) {
        self.entries.clear();
        self.expanded.clear();
        self.selected = None;
        self.root = root;

        let mut effects = Vec::new();
        if let Some(root) = self.root.clone() {
            self.expanded.insert(root.clone());
            effects.push(Effect::LoadDir(root));
        }
        (true, effects)
    }

    /// Flip expansion for a directory. A fetch is issued only when expanding
    /// a path with no cached listing; collapsing never drops the cache.
    pub fn toggle(&mut self, path: PathBuf) -> (bool, Option<Effect>) {
        if self.expanded.remove(&path) {
            return (true, None);
        }

        self.expanded.insert(path.clone());
        let effect = if self.entries.contains_key(&path) {
            None
        } else {
            Some(Effect::LoadDir(path))
        };
        (true, effect)
    }

    pub fn select(&mut self, path: Option<PathBuf>) -> bool {
        if self.selected == path {
            return false;
        }
        self.selected = path;
        true
    }

    /// Overwrite exactly one cache entry with a fresh listing.
    pub fn apply_loaded(&mut self, path: PathBuf, entries: Vec<DirEntry>) -> bool {
        if self.entries.get(&path) == Some(&entries) {
            return false;
        }
        self.entries.insert(path, entries);
        true
    }

    /// A failed fetch leaves the expansion set alone; the path simply has no
    /// listing until a later refresh succeeds.
    pub fn apply_load_error(&mut self, path: &Path, error: &str) {
        tracing::warn!(path = %path.display(), error, "directory listing failed");
    }

    /// Refresh effect for the parent of a just-mutated path, if the parent
    /// listing is cached.
    pub fn parent_refresh(&self, path: &Path) -> Option<Effect> {
        let parent = path.parent()?;
        if self.entries.contains_key(parent) {
            Some(Effect::LoadDir(parent.to_path_buf()))
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/explorer.rs"]
mod tests;
