//! Plugin registry: discovers, loads, and registers engine plugins.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use spyglass_core::{DiscoveryError, EngineEntry, EngineRegistry, TemplateEngine};

use super::command_engine::CommandEngine;
use super::discovery::discover_plugin_dirs;
use super::manifest::PluginManifest;
use crate::cli_config::loader::expand_path;
use crate::cli_config::CliConfig;

/// A discovered and loaded plugin with its filesystem location.
#[derive(Debug)]
pub(crate) struct LoadedPlugin {
    /// Directory containing the plugin manifest.
    pub dir: PathBuf,
    pub manifest: PluginManifest,
}

impl LoadedPlugin {
    fn origin(&self) -> String {
        self.dir.display().to_string()
    }

    fn entry(&self) -> EngineEntry {
        let engine = CommandEngine::new(
            self.manifest.command_path(&self.dir),
            self.manifest.engine.args.clone(),
            self.dir.clone(),
            self.manifest.descriptor().supported_languages,
        );
        EngineEntry::lazy(self.manifest.descriptor(), move || {
            engine.ensure_available()?;
            Ok(Arc::new(engine.clone()) as Arc<dyn TemplateEngine>)
        })
    }
}

/// Plugins found on the configured paths, plus the sources that failed to load.
#[derive(Debug, Default)]
pub(crate) struct PluginRegistry {
    plugins: Vec<LoadedPlugin>,
    failures: Vec<DiscoveryError>,
}

impl PluginRegistry {
    /// Discover and load plugins from configured paths.
    pub fn discover(config: &CliConfig) -> Self {
        let search_paths: Vec<PathBuf> =
            config.plugin_paths.iter().map(|p| expand_path(p)).collect();
        Self::discover_in(&search_paths)
    }

    pub fn discover_in(search_paths: &[PathBuf]) -> Self {
        let mut registry = Self::default();

        for dir in discover_plugin_dirs(search_paths) {
            match PluginManifest::load(&dir) {
                Ok(manifest) => {
                    tracing::debug!(engine = %manifest.engine.id, ?dir, "Discovered plugin");
                    registry.plugins.push(LoadedPlugin { dir, manifest });
                }
                Err(e) => {
                    tracing::warn!(?dir, error = %e, "Skipping plugin: cannot load manifest");
                    registry
                        .failures
                        .push(DiscoveryError::new(dir.display().to_string(), e.to_string()));
                }
            }
        }

        registry
    }

    pub fn plugins(&self) -> &[LoadedPlugin] {
        &self.plugins
    }

    pub fn failures(&self) -> &[DiscoveryError] {
        &self.failures
    }

    /// Register every valid plugin as a lazily-started engine.
    ///
    /// Unreadable manifests, invalid manifests and duplicate engine ids are
    /// reported to the engine registry as diagnostics; the remaining plugins
    /// are still registered. Returns how many engines were added.
    pub fn populate(&self, engines: &EngineRegistry) -> usize {
        for failure in &self.failures {
            engines.report_discovery_failure(failure.clone());
        }

        let mut added = 0;
        for plugin in &self.plugins {
            let problems = plugin.manifest.validate(&plugin.dir);
            if !problems.is_empty() {
                engines.report_discovery_failure(DiscoveryError::new(
                    plugin.origin(),
                    problems.join("; "),
                ));
                continue;
            }

            match engines.register(plugin.entry()) {
                Ok(()) => added += 1,
                Err(e) => {
                    engines.report_discovery_failure(DiscoveryError::new(plugin.origin(), e.to_string()));
                }
            }
        }

        tracing::debug!(added, total = engines.len(), "Plugin engines registered");
        added
    }
}

/// Engine registry with the built-in engines followed by every discovered plugin.
pub(crate) fn load_engine_registry(config: &CliConfig) -> Arc<EngineRegistry> {
    let engines = Arc::new(EngineRegistry::with_builtin_engines());
    PluginRegistry::discover(config).populate(&engines);
    engines
}

/// Human-readable location of a plugin relative to the working directory.
pub(crate) fn display_dir(dir: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| dir.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| dir.to_path_buf())
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::manifest::MANIFEST_FILENAME;
    use spyglass_core::EngineId;
    use std::fs;

    fn create_plugin(base: &Path, id: &str, command: &str) -> PathBuf {
        let plugin_dir = base.join(id);
        fs::create_dir_all(&plugin_dir).unwrap();
        let manifest = format!(
            r#"
[engine]
id = "{id}"
name = "{id} engine"
command = "{command}"

[[languages]]
id = "csharp"
name = "C#"
"#
        );
        fs::write(plugin_dir.join(MANIFEST_FILENAME), manifest).unwrap();
        plugin_dir
    }

    fn config(dir: &Path) -> CliConfig {
        CliConfig {
            plugin_paths: vec![dir.to_string_lossy().to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_registry_discover() {
        let dir = tempfile::tempdir().unwrap();
        create_plugin(dir.path(), "razor", "sh");
        create_plugin(dir.path(), "spark", "sh");

        let registry = PluginRegistry::discover(&config(dir.path()));
        assert_eq!(registry.plugins().len(), 2);
        assert!(registry.failures().is_empty());
    }

    #[test]
    fn test_broken_manifest_does_not_block_others() {
        let dir = tempfile::tempdir().unwrap();
        create_plugin(dir.path(), "razor", "sh");
        let broken = dir.path().join("broken");
        fs::create_dir(&broken).unwrap();
        fs::write(broken.join(MANIFEST_FILENAME), "not = [valid").unwrap();

        let registry = PluginRegistry::discover(&config(dir.path()));
        assert_eq!(registry.plugins().len(), 1);
        assert_eq!(registry.failures().len(), 1);

        let engines = EngineRegistry::new();
        assert_eq!(registry.populate(&engines), 1);
        assert!(engines.contains(&EngineId::new("razor")));
        assert_eq!(engines.diagnostics().len(), 1);
        assert!(engines.diagnostics()[0].origin.ends_with("broken"));
    }

    #[test]
    fn test_invalid_and_duplicate_plugins_reported() {
        let dir = tempfile::tempdir().unwrap();
        create_plugin(dir.path(), "missing", "bin/not-there");
        create_plugin(dir.path(), "tera", "sh");

        let engines = EngineRegistry::with_builtin_engines();
        let added = PluginRegistry::discover(&config(dir.path())).populate(&engines);

        assert_eq!(added, 0);
        assert_eq!(engines.len(), 2);
        let reasons: Vec<String> = engines.diagnostics().iter().map(|d| d.reason.clone()).collect();
        assert!(reasons.iter().any(|r| r.contains("does not exist")));
        assert!(reasons.iter().any(|r| r.contains("already registered")));
    }

    #[test]
    fn test_plugin_engines_are_lazy() {
        let dir = tempfile::tempdir().unwrap();
        create_plugin(dir.path(), "razor", "sh");

        let engines = EngineRegistry::new();
        PluginRegistry::discover(&config(dir.path())).populate(&engines);

        let entry = engines.get(&EngineId::new("razor")).unwrap();
        assert!(!entry.is_instantiated());
        assert_eq!(entry.descriptor().supported_languages[0].id(), "csharp");
        entry.engine().unwrap();
        assert!(entry.is_instantiated());
    }

    #[test]
    fn test_load_engine_registry_puts_builtins_first() {
        let dir = tempfile::tempdir().unwrap();
        create_plugin(dir.path(), "razor", "sh");

        let engines = load_engine_registry(&config(dir.path()));
        let ids: Vec<String> = engines.entries().iter().map(|e| e.id().to_string()).collect();
        assert_eq!(ids, vec!["tera", "literal", "razor"]);
    }
}
