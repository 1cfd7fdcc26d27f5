//! Module resolution shim.
//!
//! Native resolution first; when it fails, names that point at
//! alternate-syntax files resolve to their compiled paths.

use super::cache::ResolutionCache;
use super::native::{ModuleResolutionHost, NativeResolver, ResolvedModule};
use crate::config::CompilerOptions;
use crate::document::DocumentStore;
use crate::fs::FileSystem;
use crate::path::{extension_of, resolve_relative};
use crate::transpiler::{TranspilerDescriptor, TranspilerRegistry};

/// A view over one project's state, used for a single resolution request.
///
/// Also serves as the native resolver's lookup host, so files that only
/// exist in memory resolve too.
pub struct ResolutionShim<'a> {
    pub(crate) store: &'a DocumentStore,
    pub(crate) fs: &'a dyn FileSystem,
    pub(crate) registry: &'a TranspilerRegistry,
    pub(crate) resolver: &'a dyn NativeResolver,
    pub(crate) options: &'a CompilerOptions,
    pub(crate) cache: &'a ResolutionCache,
}

impl ResolutionShim<'_> {
    /// Resolve each of `names`, imported from `containing_file`.
    ///
    /// One result per name, in order; `None` means unresolved.
    pub fn resolve_module_names(
        &self,
        names: &[&str],
        containing_file: &str,
    ) -> Vec<Option<ResolvedModule>> {
        names
            .iter()
            .map(|name| self.resolve(name, containing_file))
            .collect()
    }

    fn resolve(&self, name: &str, containing_file: &str) -> Option<ResolvedModule> {
        self.resolver
            .resolve(name, containing_file, self.options, self, self.cache)
            .or_else(|| self.synthesize(name, containing_file))
    }

    /// Resolution to a compiled path. Never cached.
    fn synthesize(&self, name: &str, containing_file: &str) -> Option<ResolvedModule> {
        let base = resolve_relative(containing_file, name)?;

        if let Some(transpiler) = self.registry.get(extension_of(&base)) {
            return self
                .file_exists(&base)
                .then(|| synthesized(&transpiler, &base));
        }

        // extensionless: try every registered source extension
        self.registry.descriptors().into_iter().find_map(|transpiler| {
            let source = format!("{base}{}", transpiler.extension());
            self.file_exists(&source)
                .then(|| synthesized(&transpiler, &source))
        })
    }
}

fn synthesized(transpiler: &TranspilerDescriptor, source: &str) -> ResolvedModule {
    let compiled = transpiler.compiled_path(source);
    tracing::debug!(%source, %compiled, "resolved to compiled path");
    ResolvedModule::local(compiled, transpiler.target_extension())
}

// Synthesized compiled documents stay invisible here, so the native
// resolver never reaches (or caches) a compiled path.
impl ModuleResolutionHost for ResolutionShim<'_> {
    fn file_exists(&self, path: &str) -> bool {
        self.store.source_document(path).is_some() || self.fs.exists(path)
    }

    fn read_file(&self, path: &str) -> Option<String> {
        match self.store.source_document(path) {
            Some(doc) => Some(doc.text().to_string()),
            None => self.fs.read(path),
        }
    }
}
