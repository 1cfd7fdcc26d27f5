//! The query contract the analysis engine drives.
//!
//! The engine only ever talks to a [`LanguageServiceHost`]. [`Project`]
//! implements it, serving compiled documents as if they were ordinary
//! host-language files.

use crate::config::CompilerOptions;
use crate::project::Project;
use crate::resolve::ResolvedModule;
use crate::snapshot::Snapshot;

/// Host object handed to the analysis engine.
pub trait LanguageServiceHost {
    /// Every file the engine should analyze.
    fn script_file_names(&self) -> Vec<String>;

    /// Version string of a file; `"0"` for unknown files.
    fn script_version(&self, path: &str) -> String;

    /// Current text of a file.
    fn script_snapshot(&self, path: &str) -> Snapshot;

    /// Coarse change counter for the whole project.
    fn project_version(&self) -> String;

    /// Compiler options.
    fn compilation_settings(&self) -> CompilerOptions;

    /// Resolve imports of `containing_file`, one result per name.
    fn resolve_module_names(&self, names: &[&str], containing_file: &str)
    -> Vec<Option<ResolvedModule>>;

    /// Library file loaded for `options`.
    fn default_lib_file_name(&self, options: &CompilerOptions) -> String {
        options.default_lib_file_name().to_string()
    }

    /// Output sink. Nothing is ever written.
    fn write_file(&self, _name: &str, _content: &str) {}
}

impl LanguageServiceHost for Project {
    fn script_file_names(&self) -> Vec<String> {
        self.known_paths()
    }

    fn script_version(&self, path: &str) -> String {
        Project::script_version(self, path)
    }

    fn script_snapshot(&self, path: &str) -> Snapshot {
        self.get_snapshot(path)
    }

    fn project_version(&self) -> String {
        Project::project_version(self).to_string()
    }

    fn compilation_settings(&self) -> CompilerOptions {
        Project::compilation_settings(self).clone()
    }

    fn resolve_module_names(
        &self,
        names: &[&str],
        containing_file: &str,
    ) -> Vec<Option<ResolvedModule>> {
        Project::resolve_module_names(self, names, containing_file)
    }
}
