//! Errors, compile-failure reporting, and failure formatting.

mod error;
mod format;
mod sink;

pub use error::{OverlayError, PluginError, TranspileError};
pub use format::{DisplayStyle, FailureFormat, format_failure, format_failures};
pub use sink::{CollectingSink, CompileFailure, DiagnosticSink, TracingSink};
