//! Immutable text snapshots handed to the engine.

use std::sync::Arc;

use crate::document::Version;

/// Immutable view of a document's text at one point in time.
///
/// Cheap to clone: the text is shared with the document it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    text: Arc<str>,
    version: Version,
}

impl Snapshot {
    /// Create a snapshot of `text` at `version`.
    pub fn new(text: impl Into<Arc<str>>, version: Version) -> Self {
        Self {
            text: text.into(),
            version,
        }
    }

    /// The empty snapshot served for unknown, missing files.
    pub fn empty() -> Self {
        Self::new("", 0)
    }

    /// Full text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Shared handle to the text.
    pub fn shared_text(&self) -> Arc<str> {
        Arc::clone(&self.text)
    }

    /// Version of the document this snapshot was taken from.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Text length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text between two byte offsets, clamped to the text and to char
    /// boundaries. The engine's `getText(start, end)`.
    pub fn get_text(&self, start: usize, end: usize) -> &str {
        let end = floor_char_boundary(&self.text, end.min(self.text.len()));
        let start = floor_char_boundary(&self.text, start.min(end));
        &self.text[start..end]
    }

    /// Whether two snapshots share the same underlying buffer.
    pub fn same_buffer(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.text, &other.text)
    }
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_text_clamps() {
        let snap = Snapshot::new("hello world", 1);
        assert_eq!(snap.get_text(0, 5), "hello");
        assert_eq!(snap.get_text(6, 100), "world");
        assert_eq!(snap.get_text(8, 2), "");
    }

    #[test]
    fn test_get_text_char_boundaries() {
        let snap = Snapshot::new("aé b", 1);
        // byte 2 is inside 'é'
        assert_eq!(snap.get_text(0, 2), "a");
        assert_eq!(snap.get_text(2, 5), "é b");
    }

    #[test]
    fn test_empty() {
        let snap = Snapshot::empty();
        assert!(snap.is_empty());
        assert_eq!(snap.len(), 0);
    }

    #[test]
    fn test_shared_buffer() {
        let a = Snapshot::new("x", 1);
        let b = a.clone();
        assert!(a.same_buffer(&b));
        assert!(!a.same_buffer(&Snapshot::new("x", 1)));
    }
}
