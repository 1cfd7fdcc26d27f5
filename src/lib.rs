//! # transpile-overlay
//!
//! A virtual source overlay that lets a type-analysis engine for a host
//! language see files written in alternate syntaxes that compile down to it.
//!
//! For every alternate-syntax file `foo.alt` the overlay serves a synthesized
//! compiled file `foo.alt.host`, compiled lazily from the latest source text
//! and recompiled only when the source version advances:
//!
//! - **Documents**: editor buffers and disk files, versioned
//! - **Snapshots**: immutable, cached, invalidated by version comparison
//! - **Resolution**: imports of alternate-syntax files resolve to compiled paths
//! - **Transpilers**: a registry of compilers, extensible by plugins
//! - **Metadata**: position maps for translating positions back to sources
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use transpile_overlay::prelude::*;
//!
//! let config = ConfigBuilder::new(Path::new("/work/app")).build()?;
//! let project = Project::builder(config)
//!     .with_transpiler(TranspilerDescriptor::from_fn(".up", ".ts", |_: &str, src: &str| {
//!         Ok(Transpiled::code(src.to_uppercase()))
//!     }))
//!     .build()?;
//!
//! project.register_or_update("/work/app/a.up", "export const x = 1", 1);
//! let resolved = project.resolve_module_names(&["./a"], "/work/app/main.ts");
//! let snapshot = project.get_snapshot("/work/app/a.up.ts");
//! # let _ = (resolved, snapshot);
//! # Ok::<(), transpile_overlay::OverlayError>(())
//! ```
//!
//! ## Modules
//!
//! - [`project`]: per-project context and the snapshot manager
//! - [`host`]: the engine-facing host contract
//! - [`transpiler`]: descriptors, registry, command transpilers, plugins
//! - [`document`]: documents, the document store, editor URIs
//! - [`snapshot`]: snapshots and the snapshot cache
//! - [`resolve`]: module resolution and the alternate-syntax shim
//! - [`metadata`]: per-source position maps
//! - [`config`]: project configuration
//! - [`mod@fs`]: backing store
//! - [`path`]: extension arithmetic
//! - [`diagnostic`]: errors and compile-failure reporting

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod diagnostic;
pub mod document;
pub mod fs;
pub mod host;
pub mod metadata;
pub mod path;
pub mod prelude;
pub mod project;
pub mod resolve;
pub mod snapshot;
pub mod transpiler;

// =============================================================================
// Core API
// =============================================================================

pub use config::{CompilerOptions, ConfigBuilder, ProjectConfig};
pub use host::LanguageServiceHost;
#[cfg(feature = "batch")]
pub use project::WarmReport;
pub use project::{Project, ProjectBuilder, ProjectStats};
pub use snapshot::Snapshot;
pub use transpiler::{Transpiled, Transpiler, TranspilerDescriptor, TranspilerRegistry};

// =============================================================================
// Diagnostics
// =============================================================================

pub use diagnostic::{
    CollectingSink, CompileFailure, DiagnosticSink, OverlayError, PluginError, TranspileError,
};
