//! Per-source metadata recorded by compiles.
//!
//! One entry per source path, created on the first successful compile and
//! updated on each later one. Entries live for the whole session.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::document::Version;
use crate::transpiler::PositionMap;

/// What the last successful compile of a source produced, besides code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// Alternate-syntax source path.
    pub source_path: String,
    /// Compiled document this metadata belongs to.
    pub compiled_path: String,
    /// Position map from the last successful compile, if it produced one.
    pub position_map: Option<Arc<PositionMap>>,
    /// Source version of the last successful compile.
    pub compiled_version: Version,
}

impl FileMetadata {
    /// Translate a compiled `(line, column)` back to the source.
    ///
    /// Without a position map, coordinates pass through unchanged.
    pub fn original_position(&self, line: u32, column: u32) -> Option<(u32, u32)> {
        match &self.position_map {
            Some(map) => map.original_position(line, column),
            None => Some((line, column)),
        }
    }
}

/// Source path → [`FileMetadata`].
#[derive(Debug, Default)]
pub struct MetadataStore {
    entries: FxHashMap<String, FileMetadata>,
}

impl MetadataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful compile, replacing the previous position map.
    pub fn record(
        &mut self,
        source_path: &str,
        compiled_path: &str,
        position_map: Option<PositionMap>,
        compiled_version: Version,
    ) {
        let metadata = FileMetadata {
            source_path: source_path.to_string(),
            compiled_path: compiled_path.to_string(),
            position_map: position_map.map(Arc::new),
            compiled_version,
        };
        self.entries.insert(source_path.to_string(), metadata);
    }

    /// Metadata for a source path.
    pub fn get(&self, source_path: &str) -> Option<&FileMetadata> {
        self.entries.get(source_path)
    }

    /// Number of sources with metadata.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no compile has succeeded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
