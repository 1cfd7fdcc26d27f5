//! Error types.
//!
//! Three tiers, by how far a failure may travel:
//!
//! - [`OverlayError`]: fatal at project open (no usable root or config).
//! - [`PluginError`]: isolated to one plugin, collected into a report.
//! - [`TranspileError`]: isolated to one compile, never crosses `get_snapshot`.

use std::path::PathBuf;

use thiserror::Error;

/// Error opening a project or decoding editor input.
///
/// # Example
///
/// ```ignore
/// match Project::open(root) {
///     Ok(project) => { /* serve queries */ }
///     Err(OverlayError::MissingConfig { path }) => {
///         eprintln!("no project config at {}", path.display());
///     }
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum OverlayError {
    /// The project configuration file does not exist.
    #[error("missing project configuration: {}", path.display())]
    MissingConfig {
        /// Expected location of the configuration file.
        path: PathBuf,
    },

    /// The configuration file is not valid JSON of the expected shape.
    #[error("invalid project configuration {}: {message}", path.display())]
    InvalidConfig {
        /// Configuration file path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// The resolved root directory does not exist or is not a directory.
    #[error("unreadable project root: {}", path.display())]
    UnreadableRoot {
        /// Resolved root directory.
        path: PathBuf,
    },

    /// An editor URI could not be mapped onto a file system path.
    #[error("unsupported document uri: {uri}")]
    InvalidUri {
        /// The offending URI.
        uri: String,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single compile attempt failed.
///
/// Cloneable so the same failure can be kept by the project and handed to
/// any number of diagnostic sinks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranspileError {
    /// The compiler rejected the input.
    #[error("{message}")]
    Failed {
        /// Compiler message.
        message: String,
    },

    /// The compiler returned without producing any code.
    #[error("compiler produced no output")]
    EmptyOutput,

    /// The compiler panicked.
    #[error("compiler panicked: {0}")]
    Panicked(String),

    /// An external compiler process could not be started.
    #[error("failed to run `{command}`: {message}")]
    Spawn {
        /// Program name.
        command: String,
        /// OS error message.
        message: String,
    },

    /// An external compiler process exited unsuccessfully.
    #[error("`{command}` exited with {status}: {stderr}")]
    Exit {
        /// Program name.
        command: String,
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },

    /// An external compiler produced output that could not be decoded.
    #[error("malformed compiler output: {0}")]
    MalformedOutput(String),
}

impl TranspileError {
    /// Create a generic failure with a compiler message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Build from a caught panic payload.
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        Self::Panicked(message)
    }
}

/// Loading one plugin failed.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The plugin file could not be read.
    #[error("failed to read plugin {}: {source}", path.display())]
    Io {
        /// Plugin file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The plugin file is not a valid manifest.
    #[error("invalid plugin manifest {}: {message}", path.display())]
    InvalidManifest {
        /// Plugin file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A contributed transpiler descriptor is unusable.
    #[error("invalid transpiler descriptor: {0}")]
    InvalidDescriptor(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_panic_payloads() {
        let err = TranspileError::from_panic(Box::new("boom"));
        assert_eq!(err, TranspileError::Panicked("boom".into()));

        let err = TranspileError::from_panic(Box::new(String::from("bang")));
        assert_eq!(err.to_string(), "compiler panicked: bang");

        let err = TranspileError::from_panic(Box::new(42_u8));
        assert!(matches!(err, TranspileError::Panicked(_)));
    }

    #[test]
    fn test_display() {
        let err = OverlayError::MissingConfig {
            path: PathBuf::from("/p/tsconfig.json"),
        };
        assert_eq!(err.to_string(), "missing project configuration: /p/tsconfig.json");
        assert_eq!(TranspileError::failed("bad token").to_string(), "bad token");
    }
}
