//! Side channel for compile failures.
//!
//! `get_snapshot` never returns an error: a failing compile degrades to the
//! last good text and the failure goes here instead.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use super::error::TranspileError;

/// A compile failure, reported once per failed attempt.
#[derive(Debug, Clone)]
pub struct CompileFailure {
    /// Alternate-syntax file that failed to compile.
    pub source_path: String,
    /// Compiled path whose snapshot fell back to stale text.
    pub compiled_path: String,
    /// Source extension of the transpiler that ran.
    pub extension: String,
    /// Source version that was attempted.
    pub version: i64,
    /// What went wrong.
    pub error: TranspileError,
    /// When the attempt happened.
    pub at: DateTime<Utc>,
}

/// Receiver for compile failures.
pub trait DiagnosticSink: Send + Sync {
    /// Called with the project lock held; keep it short.
    fn report(&self, failure: &CompileFailure);
}

/// Logs failures through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, failure: &CompileFailure) {
        tracing::warn!(
            source = %failure.source_path,
            extension = %failure.extension,
            version = failure.version,
            error = %failure.error,
            "transpile failed, serving last good output"
        );
    }
}

/// Keeps every failure in memory for later inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    failures: Mutex<Vec<CompileFailure>>,
}

impl CollectingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of failures reported so far.
    pub fn len(&self) -> usize {
        self.failures.lock().len()
    }

    /// Whether nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.failures.lock().is_empty()
    }

    /// Copy of all failures, oldest first.
    pub fn failures(&self) -> Vec<CompileFailure> {
        self.failures.lock().clone()
    }

    /// Remove and return all failures.
    pub fn drain(&self) -> Vec<CompileFailure> {
        std::mem::take(&mut *self.failures.lock())
    }

    /// Failures for one source path.
    pub fn for_source(&self, source_path: &str) -> Vec<CompileFailure> {
        self.failures
            .lock()
            .iter()
            .filter(|f| f.source_path == source_path)
            .cloned()
            .collect()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, failure: &CompileFailure) {
        self.failures.lock().push(failure.clone());
    }
}
