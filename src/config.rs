//! Project configuration.
//!
//! A project is configured by a JSON file at its root (`tsconfig.json` by
//! default). Only three parts of it matter here:
//!
//! ```json
//! {
//!   "compilerOptions": { "rootDir": "src", "strict": true },
//!   "transpilers": [
//!     { "extension": ".cof", "targetExtension": ".ts", "command": "coffee", "args": ["-bcs"] }
//!   ],
//!   "plugins": { "directory": ".overlay/plugins" }
//! }
//! ```
//!
//! `compilerOptions` is passed through to the engine untouched, except that
//! `rootDir` is resolved to an absolute path and the flags the engine needs
//! to accept synthesized files are forced on.
//!
//! Use [`ConfigBuilder`] to configure programmatically.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::diagnostic::OverlayError;
use crate::path::{normalize_path, to_slash};
use crate::transpiler::CommandSpec;

/// Configuration file looked up at the project root.
pub const DEFAULT_CONFIG_FILE: &str = "tsconfig.json";

/// Plugin directory, relative to the project root.
pub const DEFAULT_PLUGIN_DIR: &str = ".overlay/plugins";

/// Library file name reported when the options don't name one.
pub const DEFAULT_LIB_FILE_NAME: &str = "lib.d.ts";

/// Options forced on so the engine accepts synthesized files.
const FORCED_FLAGS: [&str; 2] = ["allowArbitraryExtensions", "allowJs"];

// =============================================================================
// CompilerOptions
// =============================================================================

/// Engine compiler options: an open JSON object with typed accessors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompilerOptions(Map<String, Value>);

impl CompilerOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON object.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Raw option value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Boolean option.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// String option.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Set an option.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// The `rootDir` option.
    pub fn root_dir(&self) -> Option<&str> {
        self.get_str("rootDir")
    }

    /// Library file name the engine should load by default.
    pub fn default_lib_file_name(&self) -> &str {
        self.get_str("defaultLibFileName").unwrap_or(DEFAULT_LIB_FILE_NAME)
    }

    /// Underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    fn force_overlay_flags(&mut self) {
        for flag in FORCED_FLAGS {
            self.set(flag, true);
        }
    }
}

// =============================================================================
// ProjectConfig
// =============================================================================

/// Resolved configuration of one project.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    root_dir: String,
    compiler_options: CompilerOptions,
    transpilers: Vec<CommandSpec>,
    plugin_dir: PathBuf,
}

impl ProjectConfig {
    /// Load `tsconfig.json` from `project_root`.
    ///
    /// Fails if the file is missing or malformed, or if the root
    /// directory does not exist.
    pub fn load(project_root: &Path) -> Result<Self, OverlayError> {
        ConfigBuilder::new(project_root).load()
    }

    /// Absolute project root (where the config file lives).
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Configuration file the settings were read from, if any.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Absolute source root, engine-style.
    pub fn root_dir(&self) -> &str {
        &self.root_dir
    }

    /// Compiler options, with `rootDir` resolved and overlay flags forced.
    pub fn compiler_options(&self) -> &CompilerOptions {
        &self.compiler_options
    }

    /// Command-backed transpilers declared in the config.
    pub fn transpilers(&self) -> &[CommandSpec] {
        &self.transpilers
    }

    /// Directory scanned for plugin manifests.
    pub fn plugin_dir(&self) -> &Path {
        &self.plugin_dir
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    #[serde(default)]
    compiler_options: Map<String, Value>,
    #[serde(default)]
    transpilers: Vec<CommandSpec>,
    #[serde(default)]
    plugins: PluginsSection,
}

#[derive(Deserialize, Default)]
struct PluginsSection {
    directory: Option<String>,
}

// =============================================================================
// ConfigBuilder
// =============================================================================

/// Configuration builder for fluent API.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use transpile_overlay::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new(Path::new("/work/app"))
///     .option("strict", true)
///     .plugin_dir("/work/plugins")
///     .build()?;
/// # Ok::<(), transpile_overlay::OverlayError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    project_root: PathBuf,
    config_file: String,
    options: CompilerOptions,
    transpilers: Vec<CommandSpec>,
    plugin_dir: Option<PathBuf>,
}

impl ConfigBuilder {
    /// Create a builder for the project at `project_root`.
    pub fn new(project_root: &Path) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_file: DEFAULT_CONFIG_FILE.to_string(),
            options: CompilerOptions::new(),
            transpilers: Vec::new(),
            plugin_dir: None,
        }
    }

    /// Use a different configuration file name.
    ///
    /// Default: `tsconfig.json`
    pub fn config_file(mut self, name: impl Into<String>) -> Self {
        self.config_file = name.into();
        self
    }

    /// Set a compiler option. Overrides the file's value.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.set(key, value);
        self
    }

    /// Declare a command-backed transpiler.
    pub fn transpiler(mut self, spec: CommandSpec) -> Self {
        self.transpilers.push(spec);
        self
    }

    /// Set the plugin directory (relative paths resolve against the project root).
    pub fn plugin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.plugin_dir = Some(dir.into());
        self
    }

    /// Read the configuration file and merge the builder's settings over it.
    pub fn load(self) -> Result<ProjectConfig, OverlayError> {
        let path = self.project_root.join(&self.config_file);
        if !path.is_file() {
            return Err(OverlayError::MissingConfig { path });
        }
        let text = fs::read_to_string(&path)?;
        let file: ConfigFile =
            serde_json::from_str(&text).map_err(|e| OverlayError::InvalidConfig {
                path: path.clone(),
                message: e.to_string(),
            })?;

        let mut options = CompilerOptions::from_map(file.compiler_options);
        for (key, value) in self.options.0 {
            options.set(key, value);
        }
        let mut transpilers = file.transpilers;
        transpilers.extend(self.transpilers);
        let plugin_dir = self
            .plugin_dir
            .or_else(|| file.plugins.directory.map(PathBuf::from));

        finish(&self.project_root, Some(path), options, transpilers, plugin_dir)
    }

    /// Build without reading any file.
    pub fn build(self) -> Result<ProjectConfig, OverlayError> {
        finish(
            &self.project_root,
            None,
            self.options,
            self.transpilers,
            self.plugin_dir,
        )
    }
}

fn finish(
    project_root: &Path,
    config_path: Option<PathBuf>,
    mut options: CompilerOptions,
    transpilers: Vec<CommandSpec>,
    plugin_dir: Option<PathBuf>,
) -> Result<ProjectConfig, OverlayError> {
    let project_root = normalize_path(project_root);
    if !project_root.is_dir() {
        return Err(OverlayError::UnreadableRoot { path: project_root });
    }

    let root_dir = match options.root_dir() {
        Some(dir) => normalize_path(&project_root.join(dir)),
        None => project_root.clone(),
    };
    if !root_dir.is_dir() {
        return Err(OverlayError::UnreadableRoot { path: root_dir });
    }
    let root_dir = to_slash(&root_dir);

    options.set("rootDir", root_dir.clone());
    options.force_overlay_flags();

    let plugin_dir =
        project_root.join(plugin_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_PLUGIN_DIR)));

    Ok(ProjectConfig {
        project_root,
        config_path,
        root_dir,
        compiler_options: options,
        transpilers,
        plugin_dir,
    })
}
