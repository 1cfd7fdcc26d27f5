//! Snapshot manager: the engine's `getScriptSnapshot`.
//!
//! ```text
//! get_snapshot(path)
//! ├── compiled path?  ── no ──▶ cached? ─▶ document text ─▶ backing store ─▶ empty
//! └── yes
//!     ├── source version (editor document, else read from disk at version 0)
//!     ├── cached snapshot reflects that version? ─▶ return it
//!     ├── source newer than compiled document? ─▶ compile + commit
//!     └── snapshot of the compiled document (fresh, or last good on failure)
//! ```
//!
//! Compiles are demand-driven: at most one attempt per source version
//! advance, however often the engine asks.

use std::sync::Arc;

use chrono::Utc;

use super::core::Project;
use super::state::ProjectState;
use crate::diagnostic::{CompileFailure, TranspileError};
use crate::document::{DISK_VERSION, Version};
use crate::path::strip_extension;
use crate::snapshot::Snapshot;
use crate::transpiler::{Transpiled, TranspilerDescriptor};

/// One compile of one source version, detached from the project lock.
#[derive(Debug, Clone)]
pub(crate) struct CompileJob {
    pub(crate) transpiler: TranspilerDescriptor,
    pub(crate) source: String,
    pub(crate) compiled: String,
    pub(crate) text: Arc<str>,
    pub(crate) version: Version,
}

impl CompileJob {
    pub(crate) fn run(&self) -> Result<Transpiled, TranspileError> {
        tracing::debug!(source = %self.source, version = self.version, "compiling");
        self.transpiler.compile(&self.source, &self.text)
    }
}

impl Project {
    /// Snapshot of `path` for the engine. Never fails.
    ///
    /// Unknown paths missing from the backing store yield an empty snapshot.
    /// A failed compile yields the compiled document's previous text (empty
    /// if it never compiled) and is reported to the diagnostic sink.
    pub fn get_snapshot(&self, path: &str) -> Snapshot {
        let mut state = self.state.lock();
        let state = &mut *state;

        match self.registry.compiled_target(path) {
            Some(transpiler) => self.compiled_snapshot(state, path, transpiler),
            None => self.native_snapshot(state, path),
        }
    }

    fn native_snapshot(&self, state: &mut ProjectState, path: &str) -> Snapshot {
        if let Some(snapshot) = state.cache.get(path) {
            state.stats.snapshot_hits += 1;
            return snapshot;
        }
        state.stats.snapshot_misses += 1;

        let snapshot = match state.store.get(path) {
            Some(doc) => Snapshot::new(Arc::clone(doc.text()), doc.version()),
            None => match self.fs.read(path) {
                Some(text) => Snapshot::new(text, DISK_VERSION),
                None => return Snapshot::empty(),
            },
        };
        state.cache.insert(path, snapshot.clone());
        snapshot
    }

    fn compiled_snapshot(
        &self,
        state: &mut ProjectState,
        path: &str,
        transpiler: TranspilerDescriptor,
    ) -> Snapshot {
        let source = strip_extension(path);
        let Some((text, source_version)) = self.source_text(state, source) else {
            tracing::debug!(compiled = %path, %source, "compiled path without a source");
            return Snapshot::empty();
        };

        if let Some(snapshot) = state.cache.get_compiled(path, source_version) {
            state.stats.snapshot_hits += 1;
            return snapshot;
        }
        state.stats.snapshot_misses += 1;

        let compiled_version = state.store.ensure_compiled(path, source).version();
        if source_version > compiled_version {
            let job = CompileJob {
                transpiler,
                source: source.to_string(),
                compiled: path.to_string(),
                text,
                version: source_version,
            };
            let result = job.run();
            self.commit(state, &job, result);
        }

        let doc = state.store.ensure_compiled(path, source);
        let snapshot = Snapshot::new(Arc::clone(doc.text()), doc.version());
        state.cache.insert_compiled(path, snapshot.clone(), source_version);
        snapshot
    }

    /// Text and version of a source, materializing it from the backing
    /// store if no editor has opened it.
    pub(crate) fn source_text(
        &self,
        state: &mut ProjectState,
        source: &str,
    ) -> Option<(Arc<str>, Version)> {
        if let Some(doc) = state.store.get(source) {
            return Some((Arc::clone(doc.text()), doc.version()));
        }
        let text = self.fs.read(source)?;
        let doc = state.store.load_from_disk(source, text);
        Some((Arc::clone(doc.text()), doc.version()))
    }

    /// Apply a compile result to the compiled document.
    ///
    /// Skipped (returns `false`) when the source text changed since the job
    /// was taken, or the document already reflects `job.version` or later.
    /// On failure the text is kept, the version still advances, and the
    /// failure goes to the sink.
    pub(crate) fn commit(
        &self,
        state: &mut ProjectState,
        job: &CompileJob,
        result: Result<Transpiled, TranspileError>,
    ) -> bool {
        let source_unchanged = state
            .store
            .source_document(&job.source)
            .is_some_and(|doc| Arc::ptr_eq(doc.text(), &job.text));
        if !source_unchanged {
            tracing::debug!(source = %job.source, "discarding compile of replaced source text");
            return false;
        }

        let doc = state.store.ensure_compiled(&job.compiled, &job.source);
        if doc.version() >= job.version {
            tracing::debug!(
                compiled = %job.compiled,
                current = doc.version(),
                produced = job.version,
                "discarding superseded compile"
            );
            return false;
        }

        state.stats.compiles += 1;
        match result {
            Ok(output) => {
                doc.set(output.code, job.version);
                state.metadata.record(
                    &job.source,
                    &job.compiled,
                    output.position_map,
                    job.version,
                );
                tracing::debug!(source = %job.source, version = job.version, "compiled");
            }
            Err(error) => {
                doc.set_version(job.version);
                state.stats.failures += 1;
                self.sink.report(&CompileFailure {
                    source_path: job.source.clone(),
                    compiled_path: job.compiled.clone(),
                    extension: job.transpiler.extension().to_string(),
                    version: job.version,
                    error,
                    at: Utc::now(),
                });
            }
        }
        state.cache.invalidate(&job.compiled);
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tempfile::TempDir;

    use super::*;
    use crate::config::ConfigBuilder;
    use crate::diagnostic::CollectingSink;
    use crate::fs::MapFs;

    fn project(
        dir: &TempDir,
        fs: Arc<MapFs>,
        sink: Arc<CollectingSink>,
        calls: Arc<AtomicUsize>,
    ) -> Project {
        let config = ConfigBuilder::new(dir.path()).build().unwrap();
        Project::builder(config)
            .no_plugins()
            .with_fs(fs)
            .with_sink(sink)
            .with_transpiler(TranspilerDescriptor::from_fn(".alt", ".host", move |_: &str, s: &str| {
                calls.fetch_add(1, Ordering::SeqCst);
                if s.starts_with("bad") {
                    Err(TranspileError::failed("malformed input"))
                } else {
                    Ok(Transpiled::code(format!("compiled({s})")))
                }
            }))
            .build()
            .unwrap()
    }

    #[test]
    fn test_disk_source_compiles_once() {
        let dir = TempDir::new().unwrap();
        let fs = Arc::new(MapFs::new());
        fs.insert("/p/a.alt", "X");
        let calls = Arc::new(AtomicUsize::new(0));
        let project = project(&dir, fs, Arc::new(CollectingSink::new()), Arc::clone(&calls));

        let first = project.get_snapshot("/p/a.alt.host");
        let second = project.get_snapshot("/p/a.alt.host");

        assert_eq!(first.text(), "compiled(X)");
        assert_eq!(first.version(), DISK_VERSION);
        assert!(first.same_buffer(&second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let stats = project.stats();
        assert_eq!(stats.snapshot_misses, 1);
        assert_eq!(stats.snapshot_hits, 1);
    }

    #[test]
    fn test_failure_keeps_last_good_and_reports_once() {
        let dir = TempDir::new().unwrap();
        let sink = Arc::new(CollectingSink::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let project = project(&dir, Arc::new(MapFs::new()), Arc::clone(&sink), Arc::clone(&calls));

        project.register_or_update("/p/a.alt", "ok", 1);
        assert_eq!(project.get_snapshot("/p/a.alt.host").text(), "compiled(ok)");

        project.register_or_update("/p/a.alt", "bad", 2);
        assert_eq!(project.get_snapshot("/p/a.alt.host").text(), "compiled(ok)");
        assert_eq!(project.get_snapshot("/p/a.alt.host").text(), "compiled(ok)");

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        let failures = sink.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].version, 2);
        assert_eq!(failures[0].compiled_path, "/p/a.alt.host");
        assert_eq!(project.stats().failures, 1);
    }

    #[test]
    fn test_commit_discards_superseded_result() {
        let dir = TempDir::new().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let project = project(&dir, Arc::new(MapFs::new()), Arc::new(CollectingSink::new()), calls);

        project.register_or_update("/p/a.alt", "two", 2);
        assert_eq!(project.get_snapshot("/p/a.alt.host").text(), "compiled(two)");

        let job = CompileJob {
            transpiler: project.registry().get(".alt").unwrap(),
            source: "/p/a.alt".into(),
            compiled: "/p/a.alt.host".into(),
            text: Arc::from("one"),
            version: 1,
        };
        let mut state = project.state.lock();
        assert!(!project.commit(&mut state, &job, Ok(Transpiled::code("stale"))));
        drop(state);

        assert_eq!(project.get_snapshot("/p/a.alt.host").text(), "compiled(two)");
    }

    #[test]
    fn test_editor_at_disk_version_recompiles() {
        let dir = TempDir::new().unwrap();
        let fs = Arc::new(MapFs::new());
        fs.insert("/p/a.alt", "disk");
        let calls = Arc::new(AtomicUsize::new(0));
        let project = project(&dir, fs, Arc::new(CollectingSink::new()), Arc::clone(&calls));

        assert_eq!(project.get_snapshot("/p/a.alt.host").text(), "compiled(disk)");

        project.register_or_update("/p/a.alt", "editor", 0);
        assert_eq!(project.get_snapshot("/p/a.alt.host").text(), "compiled(editor)");
        assert_eq!(project.get_snapshot("/p/a.alt.host").text(), "compiled(editor)");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_commit_discards_result_for_replaced_source() {
        let dir = TempDir::new().unwrap();
        let fs = Arc::new(MapFs::new());
        fs.insert("/p/a.alt", "disk");
        let calls = Arc::new(AtomicUsize::new(0));
        let project = project(&dir, fs, Arc::new(CollectingSink::new()), calls);

        let job = {
            let mut state = project.state.lock();
            let (text, version) = project.source_text(&mut state, "/p/a.alt").unwrap();
            CompileJob {
                transpiler: project.registry().get(".alt").unwrap(),
                source: "/p/a.alt".into(),
                compiled: "/p/a.alt.host".into(),
                text,
                version,
            }
        };
        let result = job.run();

        project.register_or_update("/p/a.alt", "editor", 0);
        let mut state = project.state.lock();
        assert!(!project.commit(&mut state, &job, result));
        drop(state);

        assert_eq!(project.get_snapshot("/p/a.alt.host").text(), "compiled(editor)");
    }

    #[test]
    fn test_missing_native_file_not_cached() {
        let dir = TempDir::new().unwrap();
        let fs = Arc::new(MapFs::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let project = project(&dir, Arc::clone(&fs), Arc::new(CollectingSink::new()), calls);

        assert!(project.get_snapshot("/p/late.host").is_empty());
        fs.insert("/p/late.host", "now");
        assert_eq!(project.get_snapshot("/p/late.host").text(), "now");
    }
}
