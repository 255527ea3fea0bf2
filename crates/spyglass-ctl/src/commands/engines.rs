//! `engines` command: list what the registry holds.

use serde::Serialize;
use spyglass_core::EngineDescriptor;

use crate::cli_config::CliConfig;
use crate::error::CtlResult;
use crate::output;
use crate::plugins;
use crate::ListFormat;

#[derive(Debug, Serialize)]
struct EngineListing {
    engines: Vec<EngineDescriptor>,
    diagnostics: Vec<String>,
}

pub(crate) fn handle_engines_command(format: ListFormat, config: &CliConfig) -> CtlResult<()> {
    let registry = plugins::load_engine_registry(config);
    let listing = EngineListing {
        engines: registry
            .entries()
            .iter()
            .map(|entry| entry.descriptor().clone())
            .collect(),
        diagnostics: registry
            .diagnostics()
            .iter()
            .map(ToString::to_string)
            .collect(),
    };

    match format {
        ListFormat::Json => output::plain(serde_json::to_string_pretty(&listing)?),
        ListFormat::Text => print_listing(&listing),
    }
    Ok(())
}

fn print_listing(listing: &EngineListing) {
    output::header("Engines:");
    output::blank();
    for (index, engine) in listing.engines.iter().enumerate() {
        let marker = if index == 0 { " (default)" } else { "" };
        output::success(format!("{} [{}]{marker}", engine.name, engine.id));
        let languages: Vec<String> = engine
            .supported_languages
            .iter()
            .map(ToString::to_string)
            .collect();
        output::label("    Languages", languages.join(", "));
    }

    if !listing.diagnostics.is_empty() {
        output::blank();
        output::warning("Skipped plugin sources:");
        for diagnostic in &listing.diagnostics {
            output::item(diagnostic);
        }
    }
}
