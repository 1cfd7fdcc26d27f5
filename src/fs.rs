//! Backing store abstraction.
//!
//! Files that no editor has opened are read through a [`FileSystem`]:
//! the real disk in production, an in-memory map in tests and embeddings.

use std::fs;
use std::path::Path;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Read-only view of persistent storage.
pub trait FileSystem: Send + Sync {
    /// Read a file as UTF-8 text. `None` if missing, a directory, or not text.
    fn read(&self, path: &str) -> Option<String>;

    /// Whether a regular file exists at `path`.
    fn exists(&self, path: &str) -> bool {
        self.read(path).is_some()
    }
}

// =============================================================================
// DiskFs
// =============================================================================

/// The real file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFs;

impl FileSystem for DiskFs {
    fn read(&self, path: &str) -> Option<String> {
        let path = Path::new(path);
        if !fs::metadata(path).ok()?.is_file() {
            return None;
        }
        let bytes = fs::read(path).ok()?;
        decode_utf8(&bytes).map(str::to_owned)
    }

    fn exists(&self, path: &str) -> bool {
        Path::new(path).is_file()
    }
}

/// Decode bytes as UTF-8, stripping BOM if present.
pub fn decode_utf8(buf: &[u8]) -> Option<&str> {
    let buf = buf.strip_prefix(b"\xef\xbb\xbf").unwrap_or(buf);
    std::str::from_utf8(buf).ok()
}

// =============================================================================
// MapFs
// =============================================================================

/// A simple map-based file system.
///
/// Mutable through a shared reference so a test can keep an `Arc` to it
/// while a project reads from it.
///
/// # Example
///
/// ```
/// use transpile_overlay::fs::{FileSystem, MapFs};
///
/// let fs = MapFs::new();
/// fs.insert("/p/a.cof", "x = 1");
/// assert!(fs.exists("/p/a.cof"));
/// assert_eq!(fs.read("/p/a.cof").as_deref(), Some("x = 1"));
/// ```
#[derive(Debug, Default)]
pub struct MapFs {
    files: RwLock<FxHashMap<String, String>>,
}

impl MapFs {
    /// Create an empty file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from `(path, content)` pairs.
    pub fn from_files<I, P, C>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, C)>,
        P: Into<String>,
        C: Into<String>,
    {
        let fs = Self::new();
        for (path, content) in files {
            fs.insert(path, content);
        }
        fs
    }

    /// Insert or replace a file.
    pub fn insert(&self, path: impl Into<String>, content: impl Into<String>) {
        self.files.write().insert(path.into(), content.into());
    }

    /// Remove a file.
    pub fn remove(&self, path: &str) -> Option<String> {
        self.files.write().remove(path)
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }

    /// All file paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<_> = self.files.read().keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl FileSystem for MapFs {
    fn read(&self, path: &str) -> Option<String> {
        self.files.read().get(path).cloned()
    }

    fn exists(&self, path: &str) -> bool {
        self.files.read().contains_key(path)
    }
}
