//! The virtual document store.
//!
//! Owns every document's lifetime, the ordered set of paths the engine is
//! told about, and the project version counter.

use indexmap::IndexSet;
use rustc_hash::FxHashMap;

use super::document::{Document, UNCOMPILED, Version};
use crate::path::extension_of;
use crate::transpiler::TranspilerRegistry;

/// What a registration touched, so the caller knows which cache entries to drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// A host-language file.
    Native {
        /// The registered path.
        path: String,
    },
    /// An alternate-syntax file and its synthesized compiled path.
    Alternate {
        /// The registered source path.
        source: String,
        /// The paired compiled path.
        compiled: String,
    },
}

impl Registration {
    /// Paths whose cached snapshots are now invalid.
    pub fn invalidated(&self) -> Vec<&str> {
        match self {
            Self::Native { path } => vec![path],
            Self::Alternate { source, compiled } => vec![compiled, source],
        }
    }
}

/// Documents, known paths, and the project version.
#[derive(Debug, Default)]
pub struct DocumentStore {
    known: IndexSet<String>,
    documents: FxHashMap<String, Document>,
    project_version: u64,
}

impl DocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or update an editor document.
    ///
    /// Alternate-syntax paths get a paired compiled document (created empty
    /// if missing) and it is the compiled path that becomes known. Every
    /// call bumps the project version once. A version older than the one
    /// already stored leaves the text alone. An editor taking over a disk
    /// source marks the compiled document uncompiled, whatever its version.
    pub fn register_or_update(
        &mut self,
        path: &str,
        text: &str,
        version: Version,
        registry: &TranspilerRegistry,
    ) -> Registration {
        self.project_version += 1;
        let took_over_disk = self.upsert_editor(path, text, version);

        match registry.get(extension_of(path)) {
            Some(transpiler) => {
                let compiled = transpiler.compiled_path(path);
                let doc = self
                    .documents
                    .entry(compiled.clone())
                    .or_insert_with(|| Document::compiled(compiled.as_str(), path));
                if took_over_disk {
                    doc.set_version(UNCOMPILED);
                }
                self.known.insert(compiled.clone());
                tracing::debug!(source = %path, %compiled, version, "alternate document registered");
                Registration::Alternate {
                    source: path.to_string(),
                    compiled,
                }
            }
            None => {
                self.known.insert(path.to_string());
                tracing::debug!(%path, version, "document registered");
                Registration::Native {
                    path: path.to_string(),
                }
            }
        }
    }

    /// Returns whether a disk document was replaced.
    fn upsert_editor(&mut self, path: &str, text: &str, version: Version) -> bool {
        match self.documents.get_mut(path) {
            Some(doc) if doc.is_editor() && version < doc.version() => {
                tracing::debug!(
                    %path,
                    current = doc.version(),
                    incoming = version,
                    "ignoring out-of-order document version"
                );
                false
            }
            Some(doc) => {
                let was_disk = doc.promote_to_editor();
                doc.set(text, version);
                was_disk
            }
            None => {
                self.documents
                    .insert(path.to_string(), Document::editor(path, text, version));
                false
            }
        }
    }

    /// Whether the engine has been told about `path`.
    pub fn is_known(&self, path: &str) -> bool {
        self.known.contains(path)
    }

    /// Known paths, in first-registration order.
    pub fn known_paths(&self) -> Vec<String> {
        self.known.iter().cloned().collect()
    }

    /// Number of registrations so far.
    pub fn project_version(&self) -> u64 {
        self.project_version
    }

    /// Document at `path`, if any.
    pub fn get(&self, path: &str) -> Option<&Document> {
        self.documents.get(path)
    }

    pub(crate) fn get_mut(&mut self, path: &str) -> Option<&mut Document> {
        self.documents.get_mut(path)
    }

    /// Whether any document, compiled ones included, exists under `path`.
    pub fn has_document(&self, path: &str) -> bool {
        self.documents.contains_key(path)
    }

    /// Editor or disk document at `path`. Compiled documents are skipped.
    pub fn source_document(&self, path: &str) -> Option<&Document> {
        self.documents
            .get(path)
            .filter(|doc| doc.depends_on().is_none())
    }

    /// Materialize a document read from the backing store, unless one exists.
    pub(crate) fn load_from_disk(&mut self, path: &str, text: String) -> &Document {
        self.documents
            .entry(path.to_string())
            .or_insert_with(|| Document::disk(path, text))
    }

    /// The compiled document at `compiled`, created empty if missing.
    pub(crate) fn ensure_compiled(&mut self, compiled: &str, source: &str) -> &mut Document {
        self.documents
            .entry(compiled.to_string())
            .or_insert_with(|| Document::compiled(compiled, source))
    }

    /// `(compiled path, source path)` for every synthesized document, sorted.
    pub fn compiled_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<_> = self
            .documents
            .values()
            .filter_map(|doc| Some((doc.path().to_string(), doc.depends_on()?.to_string())))
            .collect();
        pairs.sort();
        pairs
    }

    /// Number of documents held.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no documents are held.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transpiler::{Transpiled, TranspilerDescriptor};

    fn registry() -> TranspilerRegistry {
        TranspilerRegistry::with_builtins([TranspilerDescriptor::from_fn(".alt", ".host", |_: &str, s: &str| {
            Ok(Transpiled::code(s))
        })])
    }

    #[test]
    fn test_native_registration() {
        let registry = registry();
        let mut store = DocumentStore::new();

        let reg = store.register_or_update("/p/a.host", "x", 1, &registry);
        assert_eq!(reg, Registration::Native { path: "/p/a.host".into() });
        assert!(store.is_known("/p/a.host"));
        assert_eq!(store.project_version(), 1);
        assert_eq!(store.get("/p/a.host").unwrap().version(), 1);
    }

    #[test]
    fn test_alternate_registration_pairs_compiled() {
        let registry = registry();
        let mut store = DocumentStore::new();

        let reg = store.register_or_update("/p/a.alt", "X", 1, &registry);
        assert_eq!(reg.invalidated(), vec!["/p/a.alt.host", "/p/a.alt"]);
        assert!(store.is_known("/p/a.alt.host"));
        assert!(!store.is_known("/p/a.alt"));

        let compiled = store.get("/p/a.alt.host").unwrap();
        assert_eq!(compiled.version(), UNCOMPILED);
        assert_eq!(compiled.depends_on(), Some("/p/a.alt"));
        assert_eq!(
            store.compiled_pairs(),
            vec![("/p/a.alt.host".to_string(), "/p/a.alt".to_string())]
        );
    }

    #[test]
    fn test_reregistration_is_idempotent_on_membership() {
        let registry = registry();
        let mut store = DocumentStore::new();

        store.register_or_update("/p/b.host", "1", 1, &registry);
        store.register_or_update("/p/a.host", "1", 1, &registry);
        store.register_or_update("/p/b.host", "2", 2, &registry);

        assert_eq!(store.known_paths(), vec!["/p/b.host".to_string(), "/p/a.host".to_string()]);
        assert_eq!(store.project_version(), 3);
        assert_eq!(&**store.get("/p/b.host").unwrap().text(), "2");
    }

    #[test]
    fn test_out_of_order_version_ignored() {
        let registry = registry();
        let mut store = DocumentStore::new();

        store.register_or_update("/p/a.alt", "new", 5, &registry);
        store.register_or_update("/p/a.alt", "old", 4, &registry);

        let doc = store.get("/p/a.alt").unwrap();
        assert_eq!(doc.version(), 5);
        assert_eq!(&**doc.text(), "new");
        assert_eq!(store.project_version(), 2);
    }

    #[test]
    fn test_editor_replaces_disk() {
        let registry = registry();
        let mut store = DocumentStore::new();

        store.load_from_disk("/p/a.alt", "disk".into());
        store.load_from_disk("/p/a.alt", "ignored".into());
        assert_eq!(&**store.get("/p/a.alt").unwrap().text(), "disk");

        store.register_or_update("/p/a.alt", "editor", 1, &registry);
        let doc = store.get("/p/a.alt").unwrap();
        assert!(doc.is_editor());
        assert_eq!(&**doc.text(), "editor");
    }

    #[test]
    fn test_editor_over_disk_resets_compiled() {
        let registry = registry();
        let mut store = DocumentStore::new();

        store.load_from_disk("/p/a.alt", "disk".into());
        store
            .ensure_compiled("/p/a.alt.host", "/p/a.alt")
            .set("compiled(disk)", 0);

        store.register_or_update("/p/a.alt", "editor", 0, &registry);
        let compiled = store.get("/p/a.alt.host").unwrap();
        assert_eq!(compiled.version(), UNCOMPILED);
        assert_eq!(&**compiled.text(), "compiled(disk)");

        // later editor updates leave the compiled version alone
        store.ensure_compiled("/p/a.alt.host", "/p/a.alt").set("compiled(editor)", 0);
        store.register_or_update("/p/a.alt", "editor", 0, &registry);
        assert_eq!(store.get("/p/a.alt.host").unwrap().version(), 0);
    }
}
