//! Prelude module for convenient imports.
//!
//! ```
//! use transpile_overlay::prelude::*;
//! ```

// Project
#[cfg(feature = "batch")]
pub use crate::project::WarmReport;
pub use crate::project::{Project, ProjectBuilder, ProjectStats};

// Engine contract
pub use crate::host::LanguageServiceHost;
pub use crate::resolve::{NativeResolver, RelativeResolver, ResolvedModule};
pub use crate::snapshot::Snapshot;

// Configuration
pub use crate::config::{CompilerOptions, ConfigBuilder, ProjectConfig};

// Documents
pub use crate::document::{EditorDocument, Registration, Version};

// Transpilers
pub use crate::transpiler::{
    CommandSpec, PluginSource, PositionMap, Transpiled, Transpiler, TranspilerDescriptor,
    TranspilerRegistry,
};

// Backing store
pub use crate::fs::{DiskFs, FileSystem, MapFs};

// Diagnostics
pub use crate::diagnostic::{
    CollectingSink, CompileFailure, DiagnosticSink, FailureFormat, OverlayError, TranspileError,
    format_failure,
};
pub use crate::metadata::FileMetadata;
