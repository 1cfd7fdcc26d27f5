//! Native module resolution.
//!
//! The engine's own resolution algorithm sits behind [`NativeResolver`].
//! [`RelativeResolver`] is the default: host-language extensions, index
//! files, and a `node_modules` walk for bare names.

use super::cache::ResolutionCache;
use crate::config::CompilerOptions;
use crate::path::{parent_dir, resolve_relative};

/// Host-language extensions tried by [`RelativeResolver`], in order.
pub const HOST_EXTENSIONS: [&str; 5] = [".ts", ".tsx", ".d.ts", ".js", ".jsx"];

/// Where a module name resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    /// File the engine should load.
    pub resolved_file_name: String,
    /// Extension the engine should treat that file as.
    pub extension: String,
    /// Whether the file belongs to a third-party dependency.
    pub is_external_library_import: bool,
}

impl ResolvedModule {
    /// A project-local file.
    pub fn local(resolved_file_name: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            resolved_file_name: resolved_file_name.into(),
            extension: extension.into(),
            is_external_library_import: false,
        }
    }

    /// A file from a dependency.
    pub fn external(resolved_file_name: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            resolved_file_name: resolved_file_name.into(),
            extension: extension.into(),
            is_external_library_import: true,
        }
    }
}

/// File lookups a resolver may perform.
pub trait ModuleResolutionHost {
    /// Whether a file exists at `path`.
    fn file_exists(&self, path: &str) -> bool;

    /// Contents of the file at `path`.
    fn read_file(&self, path: &str) -> Option<String>;
}

/// The engine's resolution algorithm.
pub trait NativeResolver: Send + Sync {
    /// Resolve `name` imported from `containing_file`.
    fn resolve(
        &self,
        name: &str,
        containing_file: &str,
        options: &CompilerOptions,
        host: &dyn ModuleResolutionHost,
        cache: &ResolutionCache,
    ) -> Option<ResolvedModule>;
}

/// Default resolver.
///
/// Relative and absolute names try the name as given, then each host
/// extension, then `index` plus each host extension. Bare names walk up
/// `node_modules` directories looking for declaration files.
#[derive(Debug, Default, Clone, Copy)]
pub struct RelativeResolver;

impl RelativeResolver {
    fn resolve_local(&self, base: &str, host: &dyn ModuleResolutionHost) -> Option<ResolvedModule> {
        match host_extension(base) {
            Some(ext) if host.file_exists(base) => return Some(ResolvedModule::local(base, ext)),
            _ => {}
        }
        for ext in HOST_EXTENSIONS {
            let candidate = format!("{base}{ext}");
            if host.file_exists(&candidate) {
                return Some(ResolvedModule::local(candidate, ext));
            }
        }
        for ext in HOST_EXTENSIONS {
            let candidate = format!("{base}/index{ext}");
            if host.file_exists(&candidate) {
                return Some(ResolvedModule::local(candidate, ext));
            }
        }
        None
    }

    fn resolve_package(
        &self,
        name: &str,
        containing_file: &str,
        host: &dyn ModuleResolutionHost,
    ) -> Option<ResolvedModule> {
        let mut dir = parent_dir(containing_file);
        loop {
            let package = match dir {
                "" => format!("node_modules/{name}"),
                "/" => format!("/node_modules/{name}"),
                _ => format!("{dir}/node_modules/{name}"),
            };
            for candidate in [format!("{package}.d.ts"), format!("{package}/index.d.ts")] {
                if host.file_exists(&candidate) {
                    return Some(ResolvedModule::external(candidate, ".d.ts"));
                }
            }
            if dir.is_empty() || dir == "/" {
                return None;
            }
            dir = parent_dir(dir);
        }
    }
}

impl NativeResolver for RelativeResolver {
    fn resolve(
        &self,
        name: &str,
        containing_file: &str,
        _options: &CompilerOptions,
        host: &dyn ModuleResolutionHost,
        cache: &ResolutionCache,
    ) -> Option<ResolvedModule> {
        let dir = parent_dir(containing_file);
        if let Some(hit) = cache.get(dir, name) {
            return Some(hit);
        }

        let resolved = match resolve_relative(containing_file, name) {
            Some(base) => self.resolve_local(&base, host),
            None => self.resolve_package(name, containing_file, host),
        }?;

        cache.insert(dir, name, resolved.clone());
        Some(resolved)
    }
}

/// The host extension `path` already ends with, longest match first.
fn host_extension(path: &str) -> Option<&'static str> {
    if path.ends_with(".d.ts") {
        return Some(".d.ts");
    }
    HOST_EXTENSIONS
        .into_iter()
        .find(|ext| *ext != ".d.ts" && path.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashSet;

    use super::*;

    struct Files(FxHashSet<&'static str>);

    impl ModuleResolutionHost for Files {
        fn file_exists(&self, path: &str) -> bool {
            self.0.contains(path)
        }

        fn read_file(&self, path: &str) -> Option<String> {
            self.file_exists(path).then(String::new)
        }
    }

    fn files(paths: &[&'static str]) -> Files {
        Files(paths.iter().copied().collect())
    }

    fn resolve(host: &Files, name: &str, from: &str) -> Option<ResolvedModule> {
        RelativeResolver.resolve(name, from, &CompilerOptions::new(), host, &ResolutionCache::new("/p"))
    }

    #[test]
    fn test_relative_with_extension_probe() {
        let host = files(&["/p/src/b.ts", "/p/src/lib/index.tsx", "/p/src/c.js"]);

        assert_eq!(
            resolve(&host, "./b", "/p/src/a.ts"),
            Some(ResolvedModule::local("/p/src/b.ts", ".ts"))
        );
        assert_eq!(
            resolve(&host, "./lib", "/p/src/a.ts"),
            Some(ResolvedModule::local("/p/src/lib/index.tsx", ".tsx"))
        );
        assert_eq!(
            resolve(&host, "../src/c.js", "/p/src/a.ts"),
            Some(ResolvedModule::local("/p/src/c.js", ".js"))
        );
        assert!(resolve(&host, "./missing", "/p/src/a.ts").is_none());
    }

    #[test]
    fn test_alternate_files_are_not_native() {
        let host = files(&["/p/a.alt", "/p/a.alt.host"]);
        assert!(resolve(&host, "./a", "/p/main.ts").is_none());
    }

    #[test]
    fn test_bare_names_walk_node_modules() {
        let host = files(&["/p/node_modules/lodash/index.d.ts"]);
        let resolved = resolve(&host, "lodash", "/p/src/deep/a.ts").unwrap();

        assert_eq!(resolved.resolved_file_name, "/p/node_modules/lodash/index.d.ts");
        assert!(resolved.is_external_library_import);
        assert!(resolve(&host, "react", "/p/src/a.ts").is_none());
    }

    #[test]
    fn test_successes_are_cached() {
        let cache = ResolutionCache::new("/p");
        let options = CompilerOptions::new();

        let host = files(&["/p/b.ts"]);
        assert!(RelativeResolver.resolve("./b", "/p/a.ts", &options, &host, &cache).is_some());
        assert!(RelativeResolver.resolve("./c", "/p/a.ts", &options, &host, &cache).is_none());
        assert_eq!(cache.len(), 1);

        // served from cache even though the host no longer has the file
        let empty = files(&[]);
        assert!(RelativeResolver.resolve("./b", "/p/a.ts", &options, &empty, &cache).is_some());
    }

    #[test]
    fn test_host_extension() {
        assert_eq!(host_extension("x.d.ts"), Some(".d.ts"));
        assert_eq!(host_extension("x.ts"), Some(".ts"));
        assert_eq!(host_extension("x.tsx"), Some(".tsx"));
        assert_eq!(host_extension("x.alt"), None);
    }
}
