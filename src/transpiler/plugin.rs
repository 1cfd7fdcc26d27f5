//! Plugin discovery and loading.
//!
//! A plugin contributes zero or more transpiler descriptors. On disk, a
//! plugin is a manifest file in the plugin directory named
//! `<name>.transpiler.json`:
//!
//! ```json
//! { "transpilers": [ { "extension": ".cof", "targetExtension": ".ts", "command": "coffee" } ] }
//! ```
//!
//! Loading is best-effort: each plugin is attempted independently, and a
//! failure is logged and recorded without stopping the others.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use serde::Deserialize;

use super::command::CommandSpec;
use super::descriptor::TranspilerDescriptor;
use super::registry::TranspilerRegistry;
use crate::diagnostic::PluginError;

/// File name suffix that marks a plugin manifest.
pub const PLUGIN_SUFFIX: &str = ".transpiler.json";

/// Something that can contribute transpilers.
pub trait PluginSource: Send {
    /// Name used in logs and reports.
    fn name(&self) -> &str;

    /// Produce the descriptors this plugin contributes.
    fn load(&self) -> Result<Vec<TranspilerDescriptor>, PluginError>;
}

// =============================================================================
// Manifest Plugins
// =============================================================================

#[derive(Deserialize)]
struct PluginManifest {
    #[serde(default)]
    transpilers: Vec<CommandSpec>,
}

/// A plugin manifest file.
#[derive(Debug, Clone)]
pub struct ManifestPlugin {
    path: PathBuf,
    name: String,
}

impl ManifestPlugin {
    /// Wrap a manifest path. The name is the file name minus the suffix.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = file_name
            .strip_suffix(PLUGIN_SUFFIX)
            .unwrap_or(&file_name)
            .to_string();
        Self { path, name }
    }

    /// Manifest location.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PluginSource for ManifestPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Vec<TranspilerDescriptor>, PluginError> {
        let text = fs::read_to_string(&self.path).map_err(|source| PluginError::Io {
            path: self.path.clone(),
            source,
        })?;
        let manifest: PluginManifest =
            serde_json::from_str(&text).map_err(|e| PluginError::InvalidManifest {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        manifest
            .transpilers
            .into_iter()
            .map(CommandSpec::into_descriptor)
            .collect()
    }
}

/// Find plugin manifests in `dir`, sorted by file name.
///
/// A missing or unreadable directory yields no plugins.
pub fn discover_plugins(dir: &Path) -> Vec<ManifestPlugin> {
    let Ok(entries) = fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "no plugin directory");
        return Vec::new();
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(PLUGIN_SUFFIX) && n.len() > PLUGIN_SUFFIX.len())
        })
        .collect();
    paths.sort();
    paths.into_iter().map(ManifestPlugin::new).collect()
}

// =============================================================================
// Loading
// =============================================================================

/// Outcome of a plugin loading pass.
#[derive(Debug, Default)]
pub struct PluginReport {
    /// Plugins that loaded, in load order.
    pub loaded: Vec<String>,
    /// Descriptors registered across all loaded plugins.
    pub registered: usize,
    /// Plugins that failed, with the reason.
    pub failures: Vec<(String, PluginError)>,
}

impl PluginReport {
    /// Whether every plugin loaded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Load each plugin and register what it contributes.
///
/// A plugin's descriptors are registered only if the whole plugin loaded.
pub fn load_plugins<I>(plugins: I, registry: &TranspilerRegistry) -> PluginReport
where
    I: IntoIterator,
    I::Item: PluginSource,
{
    let mut report = PluginReport::default();
    for plugin in plugins {
        let name = plugin.name().to_string();
        match plugin.load() {
            Ok(descriptors) => {
                let count = descriptors.len();
                for descriptor in descriptors {
                    registry.register(descriptor);
                }
                tracing::info!(plugin = %name, transpilers = count, "plugin loaded");
                report.registered += count;
                report.loaded.push(name);
            }
            Err(error) => {
                tracing::warn!(plugin = %name, %error, "plugin failed to load");
                report.failures.push((name, error));
            }
        }
    }
    report
}

/// Discover and load every manifest plugin in `dir`.
pub fn load_plugin_dir(dir: &Path, registry: &TranspilerRegistry) -> PluginReport {
    load_plugins(discover_plugins(dir), registry)
}

/// Load plugins from `dir` on a background thread.
///
/// Queries keep running meanwhile; registrations take effect for whatever
/// query comes after them. Join the handle only if the report matters.
pub fn spawn_plugin_loader(dir: PathBuf, registry: Arc<TranspilerRegistry>) -> JoinHandle<PluginReport> {
    thread::spawn(move || load_plugin_dir(&dir, &registry))
}

impl<P: PluginSource + ?Sized> PluginSource for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn load(&self) -> Result<Vec<TranspilerDescriptor>, PluginError> {
        (**self).load()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::transpiler::Transpiled;

    struct Inline(&'static str, &'static str);

    impl PluginSource for Inline {
        fn name(&self) -> &str {
            "inline"
        }

        fn load(&self) -> Result<Vec<TranspilerDescriptor>, PluginError> {
            Ok(vec![TranspilerDescriptor::from_fn(self.0, self.1, |_: &str, s: &str| {
                Ok(Transpiled::code(s))
            })])
        }
    }

    struct Broken;

    impl PluginSource for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn load(&self) -> Result<Vec<TranspilerDescriptor>, PluginError> {
            Err(PluginError::InvalidDescriptor("nope".into()))
        }
    }

    #[test]
    fn test_failure_does_not_abort_others() {
        let registry = TranspilerRegistry::new();
        let plugins: Vec<Box<dyn PluginSource>> = vec![
            Box::new(Broken),
            Box::new(Inline(".cof", ".ts")),
        ];
        let report = load_plugins(plugins, &registry);

        assert_eq!(report.loaded, vec!["inline".to_string()]);
        assert_eq!(report.registered, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "broken");
        assert!(registry.contains(".cof"));
    }

    #[test]
    fn test_discover_plugins() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.transpiler.json"), "{}").unwrap();
        fs::write(dir.path().join("a.transpiler.json"), "{}").unwrap();
        fs::write(dir.path().join("readme.md"), "").unwrap();
        fs::write(dir.path().join(".transpiler.json"), "{}").unwrap();
        fs::create_dir(dir.path().join("dir.transpiler.json")).unwrap();

        let names: Vec<_> = discover_plugins(dir.path())
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_missing_dir_is_empty() {
        assert!(discover_plugins(Path::new("/nonexistent/plugins")).is_empty());
    }

    #[test]
    fn test_load_plugin_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("coffee.transpiler.json"),
            r#"{"transpilers": [{"extension": ".cof", "targetExtension": ".ts", "command": "coffee"}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("empty.transpiler.json"), "{}").unwrap();
        fs::write(dir.path().join("bad.transpiler.json"), "{ not json").unwrap();

        let registry = TranspilerRegistry::new();
        let report = load_plugin_dir(dir.path(), &registry);

        assert_eq!(report.loaded, vec!["coffee".to_string(), "empty".to_string()]);
        assert_eq!(report.registered, 1);
        assert!(matches!(
            report.failures.as_slice(),
            [(name, PluginError::InvalidManifest { .. })] if name == "bad"
        ));
        assert_eq!(registry.get(".cof").unwrap().target_extension(), ".ts");
    }

    #[test]
    fn test_spawn_plugin_loader() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("x.transpiler.json"),
            r#"{"transpilers": [{"extension": "x", "targetExtension": "ts", "command": "xc"}]}"#,
        )
        .unwrap();

        let registry = Arc::new(TranspilerRegistry::new());
        let handle = spawn_plugin_loader(dir.path().to_path_buf(), Arc::clone(&registry));
        let report = handle.join().unwrap();

        assert!(report.is_clean());
        assert!(registry.contains(".x"));
    }
}
