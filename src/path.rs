//! Path and extension arithmetic.
//!
//! Alternate-syntax files are served to the engine under a compound name:
//! the source path with the transpiler's target extension appended.
//!
//! ```text
//! src/app.cof        ── source path (extension ".cof")
//! src/app.cof.ts     ── compiled path (extensions ".cof" + ".ts")
//! ```
//!
//! Everything here operates on engine-style string paths (forward slashes),
//! and only ever looks at the final path component when searching for dots,
//! so directories like `v1.2/` never contribute an extension.

use std::path::{Path, PathBuf};

// =============================================================================
// Extensions
// =============================================================================

/// Byte offset where the final path component starts.
#[inline]
fn file_name_start(path: &str) -> usize {
    path.rfind(['/', '\\']).map_or(0, |i| i + 1)
}

/// Returns the final extension of `path`, including the leading dot.
///
/// Returns `""` when the file name has no dot, or when its only dots are
/// leading (`.gitignore`, `..`). A trailing bare dot yields `"."`.
///
/// ```
/// use transpile_overlay::path::extension_of;
///
/// assert_eq!(extension_of("src/app.cof"), ".cof");
/// assert_eq!(extension_of("src/app.cof.ts"), ".ts");
/// assert_eq!(extension_of("v1.2/Makefile"), "");
/// assert_eq!(extension_of("notes."), ".");
/// ```
pub fn extension_of(path: &str) -> &str {
    let name = &path[file_name_start(path)..];
    let stem = name.trim_start_matches('.');
    if stem.is_empty() {
        return "";
    }
    match name.rfind('.') {
        Some(i) if i >= name.len() - stem.len() => &name[i..],
        _ => "",
    }
}

/// Whether `ext` is a real extension (more than a bare dot).
#[inline]
fn is_proper(ext: &str) -> bool {
    ext.len() > 1
}

/// Removes exactly the final extension from `path`.
///
/// A trailing bare dot is not an extension and is preserved.
pub fn strip_extension(path: &str) -> &str {
    let ext = extension_of(path);
    if is_proper(ext) {
        &path[..path.len() - ext.len()]
    } else {
        path
    }
}

/// Returns the two final extensions of `path` as `(inner, outer)`.
///
/// `"app.cof.ts"` yields `(".cof", ".ts")`. Returns `None` unless both
/// are proper extensions.
pub fn last_two_extensions(path: &str) -> Option<(&str, &str)> {
    CompoundName::parse(path).map(|name| (name.source_extension, name.target_extension))
}

/// Normalize an extension to carry exactly one leading dot.
pub fn normalize_extension(ext: &str) -> String {
    format!(".{}", ext.trim_start_matches('.'))
}

// =============================================================================
// CompoundName
// =============================================================================

/// A path split into `stem + source_extension + target_extension`.
///
/// This is the two-level parse used to recognize compiled paths. It says
/// nothing about whether the extensions are registered; see
/// [`TranspilerRegistry::compiled_target`](crate::transpiler::TranspilerRegistry::compiled_target).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompoundName<'a> {
    /// Path without either extension.
    pub stem: &'a str,
    /// Second-to-last extension (the alternate syntax).
    pub source_extension: &'a str,
    /// Last extension (the host language).
    pub target_extension: &'a str,
    source_path: &'a str,
}

impl<'a> CompoundName<'a> {
    /// Parse a path with at least two proper extensions.
    pub fn parse(path: &'a str) -> Option<Self> {
        let target_extension = extension_of(path);
        if !is_proper(target_extension) {
            return None;
        }
        let source_path = &path[..path.len() - target_extension.len()];
        let source_extension = extension_of(source_path);
        if !is_proper(source_extension) {
            return None;
        }
        Some(Self {
            stem: &source_path[..source_path.len() - source_extension.len()],
            source_extension,
            target_extension,
            source_path,
        })
    }

    /// The source path: stem plus source extension.
    pub fn source_path(&self) -> &'a str {
        self.source_path
    }
}

/// Appends a transpiler's target extension to a source path.
#[inline]
pub fn compiled_path(source_path: &str, target_extension: &str) -> String {
    format!("{source_path}{target_extension}")
}

// =============================================================================
// Relative Resolution
// =============================================================================

/// Whether a module name is written relative to its importer.
#[inline]
pub fn is_relative_module(name: &str) -> bool {
    name == "." || name == ".." || name.starts_with("./") || name.starts_with("../")
}

/// Directory part of a path, without the trailing separator.
pub fn parent_dir(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(0) => "/",
        Some(i) => &path[..i],
        None => "",
    }
}

/// Resolve a relative or absolute module name against its importing file.
///
/// Returns `None` for bare names (`"lodash"`), which only the engine's
/// native algorithm knows how to look up.
pub fn resolve_relative(containing_file: &str, name: &str) -> Option<String> {
    let joined = if name.starts_with('/') {
        name.to_string()
    } else if is_relative_module(name) {
        match parent_dir(containing_file) {
            "" => name.to_string(),
            dir => format!("{dir}/{name}"),
        }
    } else {
        return None;
    };
    Some(normalize_segments(&joined))
}

/// Collapse `.` and `..` segments and duplicate separators.
pub fn normalize_segments(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }
    let joined = parts.join("/");
    if absolute { format!("/{joined}") } else { joined }
}

// =============================================================================
// File System Paths
// =============================================================================

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Render a file system path the way the engine names files.
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
