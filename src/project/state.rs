//! Mutable per-project state, guarded as one unit.

use crate::document::DocumentStore;
use crate::metadata::MetadataStore;
use crate::snapshot::SnapshotCache;

/// Counters kept for the lifetime of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectStats {
    /// Document registrations and updates.
    pub registrations: u64,
    /// Compile attempts that were committed, successful or not.
    pub compiles: u64,
    /// Compile attempts that failed.
    pub failures: u64,
    /// Snapshots served from the cache.
    pub snapshot_hits: u64,
    /// Snapshots rebuilt.
    pub snapshot_misses: u64,
}

/// Everything the project lock protects.
///
/// The document store, snapshot cache and metadata are updated together,
/// so they share one lock.
#[derive(Debug, Default)]
pub(crate) struct ProjectState {
    pub(crate) store: DocumentStore,
    pub(crate) cache: SnapshotCache,
    pub(crate) metadata: MetadataStore,
    pub(crate) stats: ProjectStats,
}
