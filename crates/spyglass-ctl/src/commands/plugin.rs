//! Plugin inspection commands.

use crate::cli_config::CliConfig;
use crate::error::{CtlError, CtlResult};
use crate::output;
use crate::plugins::{display_dir, PluginManifest, PluginRegistry};
use crate::PluginCommands;

pub(crate) fn handle_plugin_command(cmd: PluginCommands, cli_config: &CliConfig) -> CtlResult<()> {
    match cmd {
        PluginCommands::List => {
            list_plugins(cli_config);
            Ok(())
        }
        PluginCommands::Validate { path } => validate_plugin(&path),
    }
}

fn list_plugins(cli_config: &CliConfig) {
    let registry = PluginRegistry::discover(cli_config);
    let plugins = registry.plugins();

    if plugins.is_empty() {
        output::warning("No plugins discovered.");
        output::blank();
        if cli_config.plugin_paths.is_empty() {
            output::dim("Configure plugin paths in .spyglass.toml:");
            output::blank();
            output::plain("  plugin-paths = [\"./spyglass-plugins\", \"~/engines\"]");
        } else {
            output::plain("Searched paths:");
            for path in &cli_config.plugin_paths {
                output::item(path);
            }
        }
    } else {
        output::header("Discovered plugins:");
        output::blank();
        for plugin in plugins {
            let engine = &plugin.manifest.engine;
            let version = engine.version.as_deref().unwrap_or("-");
            output::success(format!("{} [{}] (v{version})", engine.name, engine.id));
            if !engine.description.is_empty() {
                output::dim(format!("    {}", engine.description));
            }
            output::label("    Path", display_dir(&plugin.dir));
            output::label("    Command", &engine.command);
            let languages: Vec<&str> = plugin
                .manifest
                .languages
                .iter()
                .map(|l| l.id.as_str())
                .collect();
            output::label("    Languages", languages.join(", "));
            output::blank();
        }
    }

    if !registry.failures().is_empty() {
        output::warning("Skipped:");
        for failure in registry.failures() {
            output::item(failure);
        }
    }
}

fn validate_plugin(path: &str) -> CtlResult<()> {
    let dir = std::path::Path::new(path);

    if !dir.is_dir() {
        return Err(CtlError::InvalidPlugin {
            path: path.to_string(),
            problems: "not a directory".to_string(),
        });
    }

    let manifest = PluginManifest::load(dir).map_err(|e| CtlError::InvalidPlugin {
        path: path.to_string(),
        problems: e.to_string(),
    })?;

    output::success(format!("Plugin manifest loaded: {}", manifest.engine.id));
    output::label("  Name", &manifest.engine.name);
    if let Some(version) = &manifest.engine.version {
        output::label("  Version", version);
    }
    output::label("  Command", manifest.command_path(dir).display());
    output::label("  Languages", manifest.languages.len());

    let problems = manifest.validate(dir);
    if !problems.is_empty() {
        return Err(CtlError::InvalidPlugin {
            path: path.to_string(),
            problems: problems.join("; "),
        });
    }

    output::blank();
    output::success("Validation passed.");
    Ok(())
}
