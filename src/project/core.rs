//! The per-project context.
//!
//! A [`Project`] owns everything that would otherwise be process-wide:
//! the transpiler registry, the document store, the snapshot cache, the
//! metadata store and the project version. It is created by
//! [`Project::open`] (or a [`ProjectBuilder`]) and torn down by
//! [`Project::close`].
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use transpile_overlay::prelude::*;
//!
//! let project = Project::open(Path::new("/work/app"))?;
//! project.register_or_update("/work/app/src/a.cof", "x = 1", 1);
//!
//! let snapshot = project.get_snapshot("/work/app/src/a.cof.ts");
//! println!("{}", snapshot.text());
//!
//! let stats = project.close();
//! println!("{} compiles", stats.compiles);
//! # Ok::<(), transpile_overlay::OverlayError>(())
//! ```

use std::path::Path;
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::Mutex;

use super::builder::ProjectBuilder;
use super::state::{ProjectState, ProjectStats};
use crate::config::{CompilerOptions, ProjectConfig};
use crate::diagnostic::{DiagnosticSink, OverlayError};
use crate::document::{EditorDocument, Registration, Version};
use crate::fs::FileSystem;
use crate::metadata::FileMetadata;
use crate::path::CompoundName;
use crate::resolve::{NativeResolver, ResolutionCache, ResolutionShim, ResolvedModule};
use crate::transpiler::{PluginReport, PluginSource, TranspilerRegistry, load_plugins};

/// Sentinel version for paths the project has no document for.
pub const UNKNOWN_SCRIPT_VERSION: &str = "0";

/// One open project.
pub struct Project {
    pub(crate) config: ProjectConfig,
    pub(crate) registry: Arc<TranspilerRegistry>,
    pub(crate) fs: Arc<dyn FileSystem>,
    pub(crate) sink: Arc<dyn DiagnosticSink>,
    pub(crate) resolver: Arc<dyn NativeResolver>,
    pub(crate) resolution_cache: ResolutionCache,
    pub(crate) state: Mutex<ProjectState>,
    pub(crate) plugin_loader: Mutex<Option<JoinHandle<PluginReport>>>,
}

impl Project {
    /// Create a builder for explicit configuration.
    pub fn builder(config: ProjectConfig) -> ProjectBuilder {
        ProjectBuilder::new(config)
    }

    /// Open the project at `root`: load its configuration, register the
    /// configured transpilers and start loading plugins in the background.
    ///
    /// Fails if the configuration is missing or invalid, or the root
    /// directory cannot be established.
    pub fn open(root: &Path) -> Result<Self, OverlayError> {
        let config = ProjectConfig::load(root)?;
        Self::builder(config).build()
    }

    /// Tear the project down, dropping every document and cached snapshot.
    ///
    /// Waits for a still-running plugin loader first.
    pub fn close(self) -> ProjectStats {
        self.wait_for_plugins();
        let state = self.state.into_inner();
        tracing::debug!(
            root = %self.config.root_dir(),
            documents = state.store.len(),
            compiles = state.stats.compiles,
            "project closed"
        );
        self.resolution_cache.clear();
        state.stats
    }

    // =========================================================================
    // Documents
    // =========================================================================

    /// Register a new document or update an existing one.
    ///
    /// Bumps the project version and drops the cached snapshots the change
    /// invalidates.
    pub fn register_or_update(&self, path: &str, text: &str, version: Version) -> Registration {
        let mut state = self.state.lock();
        let state = &mut *state;

        let registration = state
            .store
            .register_or_update(path, text, version, &self.registry);
        for invalidated in registration.invalidated() {
            state.cache.invalidate(invalidated);
        }
        state.stats.registrations += 1;
        registration
    }

    /// Register a document delivered by the editor protocol.
    pub fn open_document(&self, document: &EditorDocument) -> Result<Registration, OverlayError> {
        let path = document.path()?;
        Ok(self.register_or_update(&path, &document.text, Version::from(document.version)))
    }

    /// Whether the engine has been told about `path`.
    pub fn is_known(&self, path: &str) -> bool {
        self.state.lock().store.is_known(path)
    }

    /// Every known path, in first-registration order.
    pub fn known_paths(&self) -> Vec<String> {
        self.state.lock().store.known_paths()
    }

    /// Number of registrations so far.
    pub fn project_version(&self) -> u64 {
        self.state.lock().store.project_version()
    }

    /// Version the engine should associate with `path`.
    ///
    /// Compiled paths report their source's version, so the engine refetches
    /// as soon as the source advances. Unknown paths report `"0"`.
    pub fn script_version(&self, path: &str) -> String {
        let state = self.state.lock();
        let Some(doc) = state.store.get(path) else {
            return UNKNOWN_SCRIPT_VERSION.to_string();
        };
        let version = doc
            .depends_on()
            .and_then(|source| state.store.get(source))
            .map_or(doc.version(), |source| source.version());
        version.to_string()
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolve `names` imported from `containing_file`.
    pub fn resolve_module_names(
        &self,
        names: &[&str],
        containing_file: &str,
    ) -> Vec<Option<ResolvedModule>> {
        let state = self.state.lock();
        let shim = ResolutionShim {
            store: &state.store,
            fs: self.fs.as_ref(),
            registry: &self.registry,
            resolver: self.resolver.as_ref(),
            options: self.config.compiler_options(),
            cache: &self.resolution_cache,
        };
        shim.resolve_module_names(names, containing_file)
    }

    // =========================================================================
    // Metadata & Display
    // =========================================================================

    /// Metadata of the last successful compile of `source_path`.
    pub fn metadata(&self, source_path: &str) -> Option<FileMetadata> {
        self.state.lock().metadata.get(source_path).cloned()
    }

    /// Map a position in a compiled document back to its source.
    ///
    /// Returns the source path with the original `(line, column)`. `None`
    /// if `compiled_path` is not a compiled path, has never compiled, or
    /// the position falls outside the recorded map.
    pub fn translate_position(
        &self,
        compiled_path: &str,
        line: u32,
        column: u32,
    ) -> Option<(String, u32, u32)> {
        self.registry.compiled_target(compiled_path)?;
        let source = CompoundName::parse(compiled_path)?.source_path();
        let metadata = self.metadata(source)?;
        let (line, column) = metadata.original_position(line, column)?;
        Some((metadata.source_path, line, column))
    }

    /// User-facing name of `path`: compiled paths show as their source.
    pub fn display_name(&self, path: &str) -> String {
        self.registry.display_name(path).to_string()
    }

    // =========================================================================
    // Plugins
    // =========================================================================

    /// Load plugins synchronously into this project's registry.
    pub fn load_plugins<I>(&self, plugins: I) -> PluginReport
    where
        I: IntoIterator,
        I::Item: PluginSource,
    {
        load_plugins(plugins, &self.registry)
    }

    /// Wait for the background plugin loader, if one is still pending.
    ///
    /// Returns its report the first time; `None` afterwards or when no
    /// loader was started.
    pub fn wait_for_plugins(&self) -> Option<PluginReport> {
        let handle = self.plugin_loader.lock().take()?;
        match handle.join() {
            Ok(report) => Some(report),
            Err(_) => {
                tracing::warn!("plugin loader panicked");
                None
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The project configuration.
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Resolved compiler options handed to the engine.
    pub fn compilation_settings(&self) -> &CompilerOptions {
        self.config.compiler_options()
    }

    /// The transpiler registry shared with plugin loaders.
    pub fn registry(&self) -> &Arc<TranspilerRegistry> {
        &self.registry
    }

    /// Counters so far.
    pub fn stats(&self) -> ProjectStats {
        self.state.lock().stats
    }
}

impl std::fmt::Debug for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Project")
            .field("root_dir", &self.config.root_dir())
            .field("registry", &self.registry)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
