//! Extension-keyed transpiler registry.
//!
//! Append/overwrite only: a later registration for the same source
//! extension replaces the earlier one, and nothing is ever removed. This is
//! what lets plugins override built-ins.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::descriptor::TranspilerDescriptor;
use crate::path::{CompoundName, normalize_extension};

/// Mapping from source extension to transpiler.
///
/// Shared between the project (lookups) and the background plugin loader
/// (registrations), hence the interior lock.
#[derive(Default)]
pub struct TranspilerRegistry {
    entries: RwLock<FxHashMap<String, TranspilerDescriptor>>,
}

impl TranspilerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with built-in descriptors.
    pub fn with_builtins(builtins: impl IntoIterator<Item = TranspilerDescriptor>) -> Self {
        let registry = Self::new();
        for descriptor in builtins {
            registry.register(descriptor);
        }
        registry
    }

    /// Insert or overwrite by source extension. Returns the replaced entry.
    pub fn register(&self, descriptor: TranspilerDescriptor) -> Option<TranspilerDescriptor> {
        let extension = descriptor.extension().to_string();
        let previous = self.entries.write().insert(extension.clone(), descriptor);
        if previous.is_some() {
            tracing::debug!(%extension, "transpiler overridden");
        } else {
            tracing::debug!(%extension, "transpiler registered");
        }
        previous
    }

    /// Look up the transpiler for a source extension (dot optional).
    pub fn get(&self, extension: &str) -> Option<TranspilerDescriptor> {
        if extension.trim_start_matches('.').is_empty() {
            return None;
        }
        self.entries.read().get(&normalize_extension(extension)).cloned()
    }

    /// Whether a source extension is registered.
    pub fn contains(&self, extension: &str) -> bool {
        self.get(extension).is_some()
    }

    /// Registered source extensions, sorted.
    pub fn extensions(&self) -> Vec<String> {
        let mut extensions: Vec<String> = self.entries.read().keys().cloned().collect();
        extensions.sort();
        extensions
    }

    /// All descriptors, sorted by source extension.
    pub fn descriptors(&self) -> Vec<TranspilerDescriptor> {
        let mut descriptors: Vec<_> = self.entries.read().values().cloned().collect();
        descriptors.sort_by(|a, b| a.extension().cmp(b.extension()));
        descriptors
    }

    /// Number of registered transpilers.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// The transpiler whose compiled form `path` is, if any.
    ///
    /// `path` must end in `<source ext><target ext>` where the source
    /// extension is registered and its target extension matches exactly.
    pub fn compiled_target(&self, path: &str) -> Option<TranspilerDescriptor> {
        let name = CompoundName::parse(path)?;
        self.get(name.source_extension)
            .filter(|t| t.target_extension() == name.target_extension)
    }

    /// User-facing name for a path: compiled paths collapse to their source.
    ///
    /// ```
    /// use transpile_overlay::transpiler::{Transpiled, TranspilerDescriptor, TranspilerRegistry};
    ///
    /// let registry = TranspilerRegistry::new();
    /// assert_eq!(registry.display_name("foo.alt.host"), "foo.alt.host");
    ///
    /// registry.register(TranspilerDescriptor::from_fn(".alt", ".host", |_: &str, s: &str| {
    ///     Ok(Transpiled::code(s))
    /// }));
    /// assert_eq!(registry.display_name("foo.alt.host"), "foo.alt");
    /// ```
    pub fn display_name<'a>(&self, path: &'a str) -> &'a str {
        match CompoundName::parse(path) {
            Some(name) if self.compiled_target(path).is_some() => name.source_path(),
            _ => path,
        }
    }
}

impl std::fmt::Debug for TranspilerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspilerRegistry")
            .field("extensions", &self.extensions())
            .finish()
    }
}
