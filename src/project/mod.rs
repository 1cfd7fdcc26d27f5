//! Per-project context: documents, snapshots, resolution and compiles.

#[cfg(feature = "batch")]
mod batch;
mod builder;
mod core;
mod manager;
mod state;

#[cfg(feature = "batch")]
pub use batch::WarmReport;
pub use builder::ProjectBuilder;
pub use core::{Project, UNKNOWN_SCRIPT_VERSION};
pub use state::ProjectStats;
