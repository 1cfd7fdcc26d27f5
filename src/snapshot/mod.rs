//! Snapshots and the snapshot cache.

mod cache;
#[allow(clippy::module_inception)]
mod snapshot;

pub use cache::SnapshotCache;
pub use snapshot::Snapshot;
