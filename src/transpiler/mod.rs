//! Transpilers: descriptors, the registry, command-backed compilers, plugins.

mod command;
mod descriptor;
mod plugin;
mod position;
mod registry;

pub use command::{CommandSpec, CommandTranspiler, OutputFormat};
pub use descriptor::{Transpiled, Transpiler, TranspilerDescriptor};
pub use plugin::{
    ManifestPlugin, PLUGIN_SUFFIX, PluginReport, PluginSource, discover_plugins, load_plugin_dir,
    load_plugins, spawn_plugin_loader,
};
pub use position::{PositionMap, Segment};
pub use registry::TranspilerRegistry;
