//! Command handlers for `spyglass-ctl`.
//!
//! Each module handles one subcommand; [`build_controller`] applies the shared
//! engine/language/design-time selection flags.

pub(crate) mod engines;
pub(crate) mod generate;
pub(crate) mod plugin;
pub(crate) mod watch;

pub(crate) use engines::handle_engines_command;
pub(crate) use generate::handle_generate_command;
pub(crate) use plugin::handle_plugin_command;
pub(crate) use watch::handle_watch_command;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use spyglass_core::{EmitterRegistry, EngineId, RegenerationController};

use crate::cli_config::CliConfig;
use crate::error::{CtlError, CtlResult};
use crate::plugins;
use crate::SelectionArgs;

/// Controller over built-in and plugin engines, with the requested selection applied.
///
/// An explicit `--language` the engine does not offer is an error; an
/// unsupported configured default is ignored.
pub(crate) fn build_controller(
    config: &CliConfig,
    selection: &SelectionArgs,
) -> CtlResult<RegenerationController> {
    let registry = plugins::load_engine_registry(config);
    let mut controller = RegenerationController::new(
        registry,
        Arc::new(EmitterRegistry::with_builtin_emitters()),
        config.controller_config(),
    );
    let now = Instant::now();

    let engine = selection
        .engine
        .as_deref()
        .or(config.default_engine.as_deref());
    if let Some(engine) = engine {
        controller.select_engine(Some(EngineId::new(engine)), now)?;
    }

    let languages = controller.languages();
    if let Some(requested) = selection.language.as_deref() {
        let Some(language) = languages.iter().find(|l| l.id() == requested) else {
            return Err(CtlError::UnsupportedLanguage {
                engine: controller
                    .selected_engine()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
                language: requested.to_string(),
                available: languages
                    .iter()
                    .map(|l| l.id())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        };
        controller.select_language(Some(language.clone()), now);
    } else if let Some(default) = config.default_language.as_deref() {
        match languages.iter().find(|l| l.id() == default) {
            Some(language) => {
                controller.select_language(Some(language.clone()), now);
            }
            None => {
                tracing::debug!(language = default, "Configured default language not offered by engine");
            }
        }
    }

    controller.set_design_time_mode(selection.design_time || config.design_time, now);

    tracing::debug!(
        engine = ?controller.selected_engine(),
        language = ?controller.selected_language(),
        design_time = controller.design_time_mode(),
        "Controller configured"
    );
    Ok(controller)
}

/// Read template text from a file, or stdin for `-`.
pub(crate) fn read_template(path: &Path) -> CtlResult<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| CtlError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        return Ok(text);
    }

    std::fs::read_to_string(path).map_err(|source| CtlError::Read {
        path: path.to_path_buf(),
        source,
    })
}
