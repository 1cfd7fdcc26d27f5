//! Document types.

use std::sync::Arc;

use super::uri::uri_to_path;
use crate::diagnostic::OverlayError;

/// Document version. Editor versions are positive; synthesized documents
/// start at [`UNCOMPILED`].
pub type Version = i64;

/// Version of a compiled document that has never been compiled.
pub const UNCOMPILED: Version = -1;

/// Version given to sources read from the backing store.
pub const DISK_VERSION: Version = 0;

/// Where a document's text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentKind {
    /// Live editor buffer.
    Editor,
    /// Materialized from the backing store.
    Disk,
    /// Synthesized compiled form of an alternate-syntax source.
    Compiled {
        /// The source this document is compiled from.
        source: String,
    },
}

/// Authoritative text and version of one path.
#[derive(Debug, Clone)]
pub struct Document {
    path: String,
    text: Arc<str>,
    version: Version,
    kind: DocumentKind,
}

impl Document {
    /// An editor-backed document.
    pub fn editor(path: impl Into<String>, text: impl Into<Arc<str>>, version: Version) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            version,
            kind: DocumentKind::Editor,
        }
    }

    /// A document materialized from the backing store.
    pub fn disk(path: impl Into<String>, text: impl Into<Arc<str>>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            version: DISK_VERSION,
            kind: DocumentKind::Disk,
        }
    }

    /// An empty, never-compiled document for `source`.
    pub fn compiled(path: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: Arc::from(""),
            version: UNCOMPILED,
            kind: DocumentKind::Compiled {
                source: source.into(),
            },
        }
    }

    /// Document path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Current text.
    pub fn text(&self) -> &Arc<str> {
        &self.text
    }

    /// Current version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Document kind.
    pub fn kind(&self) -> &DocumentKind {
        &self.kind
    }

    /// The source path, for compiled documents.
    pub fn depends_on(&self) -> Option<&str> {
        match &self.kind {
            DocumentKind::Compiled { source } => Some(source),
            _ => None,
        }
    }

    /// Whether this is a live editor buffer.
    pub fn is_editor(&self) -> bool {
        self.kind == DocumentKind::Editor
    }

    /// Replace text and version.
    pub(crate) fn set(&mut self, text: impl Into<Arc<str>>, version: Version) {
        self.text = text.into();
        self.version = version;
    }

    /// Advance the version without touching the text.
    pub(crate) fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    /// Turn a disk-backed document into an editor buffer. Returns whether
    /// the kind changed.
    pub(crate) fn promote_to_editor(&mut self) -> bool {
        if self.kind != DocumentKind::Disk {
            return false;
        }
        self.kind = DocumentKind::Editor;
        true
    }
}

/// A document as delivered by the editor protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorDocument {
    /// Document URI (`file:///...`).
    pub uri: String,
    /// Full text.
    pub text: String,
    /// Editor version.
    pub version: i32,
}

impl EditorDocument {
    /// Create an editor document.
    pub fn new(uri: impl Into<String>, text: impl Into<String>, version: i32) -> Self {
        Self {
            uri: uri.into(),
            text: text.into(),
            version,
        }
    }

    /// File system path named by the URI.
    pub fn path(&self) -> Result<String, OverlayError> {
        uri_to_path(&self.uri)
    }
}
