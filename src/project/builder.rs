//! Builder pattern for `Project`.

use std::sync::Arc;

use parking_lot::Mutex;

use super::core::Project;
use super::state::ProjectState;
use crate::config::ProjectConfig;
use crate::diagnostic::{DiagnosticSink, OverlayError, TracingSink};
use crate::fs::{DiskFs, FileSystem};
use crate::resolve::{NativeResolver, RelativeResolver, ResolutionCache};
use crate::transpiler::{TranspilerDescriptor, TranspilerRegistry, spawn_plugin_loader};

/// Builder for configuring a [`Project`].
///
/// Use `Project::builder()` to create a builder. Defaults: the real disk,
/// failures logged through `tracing`, [`RelativeResolver`], a fresh
/// registry, and plugins loaded from the configured directory.
pub struct ProjectBuilder {
    config: ProjectConfig,
    registry: Option<Arc<TranspilerRegistry>>,
    transpilers: Vec<TranspilerDescriptor>,
    fs: Option<Arc<dyn FileSystem>>,
    sink: Option<Arc<dyn DiagnosticSink>>,
    resolver: Option<Arc<dyn NativeResolver>>,
    load_plugins: bool,
}

impl ProjectBuilder {
    pub(crate) fn new(config: ProjectConfig) -> Self {
        Self {
            config,
            registry: None,
            transpilers: Vec::new(),
            fs: None,
            sink: None,
            resolver: None,
            load_plugins: true,
        }
    }

    // =========================================================================
    // Transpilers
    // =========================================================================

    /// Share an existing registry (e.g. between projects).
    pub fn with_registry(mut self, registry: Arc<TranspilerRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Register a built-in transpiler.
    ///
    /// Built-ins go in after the configured command transpilers, so they
    /// win on the same extension; plugins loaded later win over both.
    pub fn with_transpiler(mut self, descriptor: TranspilerDescriptor) -> Self {
        self.transpilers.push(descriptor);
        self
    }

    /// Skip plugin loading.
    ///
    /// Best for: tests and embeddings that register everything up front.
    pub fn no_plugins(mut self) -> Self {
        self.load_plugins = false;
        self
    }

    // =========================================================================
    // Collaborators
    // =========================================================================

    /// Read unopened files through `fs` instead of the disk.
    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = Some(fs);
        self
    }

    /// Report compile failures to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Use a different native resolution algorithm.
    pub fn with_resolver(mut self, resolver: Arc<dyn NativeResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Build the project.
    ///
    /// Fails if a transpiler declared in the configuration is invalid.
    pub fn build(self) -> Result<Project, OverlayError> {
        let registry = self.registry.unwrap_or_default();

        for spec in self.config.transpilers().iter().cloned() {
            let descriptor = spec.into_descriptor().map_err(|e| OverlayError::InvalidConfig {
                path: self
                    .config
                    .config_path()
                    .unwrap_or(self.config.project_root())
                    .to_path_buf(),
                message: e.to_string(),
            })?;
            registry.register(descriptor);
        }
        for descriptor in self.transpilers {
            registry.register(descriptor);
        }

        let plugin_loader = self.load_plugins.then(|| {
            spawn_plugin_loader(self.config.plugin_dir().to_path_buf(), Arc::clone(&registry))
        });

        tracing::debug!(
            root = %self.config.root_dir(),
            transpilers = ?registry.extensions(),
            plugins = self.load_plugins,
            "project opened"
        );

        Ok(Project {
            resolution_cache: ResolutionCache::new(self.config.root_dir()),
            config: self.config,
            registry,
            fs: self.fs.unwrap_or_else(|| Arc::new(DiskFs)),
            sink: self.sink.unwrap_or_else(|| Arc::new(TracingSink)),
            resolver: self.resolver.unwrap_or_else(|| Arc::new(RelativeResolver)),
            state: Mutex::new(ProjectState::default()),
            plugin_loader: Mutex::new(plugin_loader),
        })
    }
}
