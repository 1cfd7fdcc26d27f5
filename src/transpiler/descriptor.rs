//! Transpiler trait and descriptors.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use super::position::PositionMap;
use crate::diagnostic::TranspileError;
use crate::path::{compiled_path, normalize_extension};

/// Output of a successful compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transpiled {
    /// Host-language code.
    pub code: String,
    /// Optional mapping back to the original source.
    pub position_map: Option<PositionMap>,
}

impl Transpiled {
    /// Code without a position map.
    pub fn code(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            position_map: None,
        }
    }

    /// Code with a position map.
    pub fn with_map(code: impl Into<String>, position_map: PositionMap) -> Self {
        Self {
            code: code.into(),
            position_map: Some(position_map),
        }
    }
}

/// A compiler from one alternate syntax to the host language.
///
/// Implemented for plain closures:
///
/// ```
/// use transpile_overlay::transpiler::{Transpiled, TranspilerDescriptor};
///
/// let upper = TranspilerDescriptor::from_fn(".up", ".ts", |_path: &str, source: &str| {
///     Ok(Transpiled::code(source.to_uppercase()))
/// });
/// assert_eq!(upper.compiled_path("/p/a.up"), "/p/a.up.ts");
/// ```
pub trait Transpiler: Send + Sync {
    /// Compile `source`, read from `path`, into host-language code.
    fn compile(&self, path: &str, source: &str) -> Result<Transpiled, TranspileError>;
}

impl<F> Transpiler for F
where
    F: Fn(&str, &str) -> Result<Transpiled, TranspileError> + Send + Sync,
{
    fn compile(&self, path: &str, source: &str) -> Result<Transpiled, TranspileError> {
        self(path, source)
    }
}

/// A registered transpiler: source extension, target extension, compiler.
#[derive(Clone)]
pub struct TranspilerDescriptor {
    extension: String,
    target_extension: String,
    compiler: Arc<dyn Transpiler>,
}

impl TranspilerDescriptor {
    /// Create a descriptor. Extensions may be given with or without the dot.
    pub fn new(
        extension: &str,
        target_extension: &str,
        compiler: impl Transpiler + 'static,
    ) -> Self {
        Self::from_arc(extension, target_extension, Arc::new(compiler))
    }

    /// Create a descriptor from a compile function.
    pub fn from_fn<F>(extension: &str, target_extension: &str, compile: F) -> Self
    where
        F: Fn(&str, &str) -> Result<Transpiled, TranspileError> + Send + Sync + 'static,
    {
        Self::new(extension, target_extension, compile)
    }

    /// Create a descriptor around a shared compiler.
    pub fn from_arc(extension: &str, target_extension: &str, compiler: Arc<dyn Transpiler>) -> Self {
        Self {
            extension: normalize_extension(extension),
            target_extension: normalize_extension(target_extension),
            compiler,
        }
    }

    /// Source extension, with leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Target extension, with leading dot.
    pub fn target_extension(&self) -> &str {
        &self.target_extension
    }

    /// The compiled path for a source path handled by this transpiler.
    pub fn compiled_path(&self, source_path: &str) -> String {
        compiled_path(source_path, &self.target_extension)
    }

    /// Run the compiler, turning panics and empty output into errors.
    ///
    /// Empty output only counts as a failure when the source has content.
    pub fn compile(&self, path: &str, source: &str) -> Result<Transpiled, TranspileError> {
        let compiler = &self.compiler;
        let result = panic::catch_unwind(AssertUnwindSafe(|| compiler.compile(path, source)))
            .map_err(TranspileError::from_panic)??;

        if result.code.trim().is_empty() && !source.trim().is_empty() {
            return Err(TranspileError::EmptyOutput);
        }
        Ok(result)
    }
}

impl fmt::Debug for TranspilerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranspilerDescriptor")
            .field("extension", &self.extension)
            .field("target_extension", &self.target_extension)
            .finish_non_exhaustive()
    }
}
