//! Plugin discovery and registration for `spyglass-ctl`.
//!
//! Plugins are directories containing a `spyglass-plugin.toml` manifest that
//! declares an engine, its output languages, and the command implementing it.
//! Each valid plugin becomes a lazily-started command-backed engine in the engine
//! registry.

mod command_engine;
mod discovery;
mod manifest;
mod registry;

pub(crate) use manifest::PluginManifest;
pub(crate) use registry::{display_dir, load_engine_registry, PluginRegistry};
