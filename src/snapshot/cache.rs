//! Snapshot cache.
//!
//! Derived, disposable state: dropping any entry (or all of them) loses
//! nothing, because documents stay the source of truth.
//!
//! ```text
//! SnapshotCache
//! └── FxHashMap<path, CachedSnapshot>
//!     ├── snapshot        ── what the engine gets
//!     └── source_version  ── for compiled paths: the source version it reflects
//! ```

use rustc_hash::FxHashMap;

use super::snapshot::Snapshot;
use crate::document::Version;

#[derive(Debug, Clone)]
struct CachedSnapshot {
    snapshot: Snapshot,
    source_version: Option<Version>,
}

/// Path-keyed snapshot cache with version-based validity.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    entries: FxHashMap<String, CachedSnapshot>,
}

impl SnapshotCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached snapshot for a host-native path.
    pub fn get(&self, path: &str) -> Option<Snapshot> {
        self.entries.get(path).map(|e| e.snapshot.clone())
    }

    /// Cached snapshot for a compiled path, if it reflects at least
    /// `source_version`.
    pub fn get_compiled(&self, path: &str, source_version: Version) -> Option<Snapshot> {
        self.entries
            .get(path)
            .filter(|e| e.source_version.is_some_and(|v| v >= source_version))
            .map(|e| e.snapshot.clone())
    }

    /// Cache a host-native snapshot.
    pub fn insert(&mut self, path: &str, snapshot: Snapshot) {
        self.entries.insert(
            path.to_string(),
            CachedSnapshot {
                snapshot,
                source_version: None,
            },
        );
    }

    /// Cache a compiled snapshot built against `source_version`.
    pub fn insert_compiled(&mut self, path: &str, snapshot: Snapshot, source_version: Version) {
        self.entries.insert(
            path.to_string(),
            CachedSnapshot {
                snapshot,
                source_version: Some(source_version),
            },
        );
    }

    /// Drop one entry. Returns whether it existed.
    pub fn invalidate(&mut self, path: &str) -> bool {
        self.entries.remove(path).is_some()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
