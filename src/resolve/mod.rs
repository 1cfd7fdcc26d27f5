//! Module resolution: native algorithm, its cache, and the alternate-syntax shim.

mod cache;
mod native;
mod shim;

pub use cache::ResolutionCache;
pub use native::{HOST_EXTENSIONS, ModuleResolutionHost, NativeResolver, RelativeResolver, ResolvedModule};
pub use shim::ResolutionShim;
