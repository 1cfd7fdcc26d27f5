//! Resolution cache shared by native resolutions of one project.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use super::native::ResolvedModule;

/// Successful native resolutions, keyed by `(containing directory, name)`.
///
/// One cache per project root. Only the native resolver writes to it;
/// synthesized alternate-syntax resolutions are never stored.
#[derive(Debug)]
pub struct ResolutionCache {
    root: String,
    entries: Mutex<FxHashMap<(String, String), ResolvedModule>>,
}

impl ResolutionCache {
    /// Create an empty cache for the project rooted at `root`.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            entries: Mutex::new(FxHashMap::default()),
        }
    }

    /// Project root this cache belongs to.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Cached resolution of `name` from files in `dir`.
    pub fn get(&self, dir: &str, name: &str) -> Option<ResolvedModule> {
        self.entries
            .lock()
            .get(&(dir.to_string(), name.to_string()))
            .cloned()
    }

    /// Store a successful resolution.
    pub fn insert(&self, dir: &str, name: &str, resolved: ResolvedModule) {
        self.entries
            .lock()
            .insert((dir.to_string(), name.to_string()), resolved);
    }

    /// Number of cached resolutions.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
