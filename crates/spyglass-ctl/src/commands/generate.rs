//! `generate` command: one synchronous compile, printed or written to a file.

use std::time::Instant;

use spyglass_core::controller::STATUS_ERRORS;
use spyglass_core::{RegenerationController, RegenerationState};

use super::{build_controller, read_template};
use crate::cli_config::CliConfig;
use crate::error::{CtlError, CtlResult};
use crate::output;
use crate::{GenerateArgs, GenerateFormat};

pub(crate) fn handle_generate_command(args: GenerateArgs, config: &CliConfig) -> CtlResult<()> {
    let text = read_template(&args.template)?;
    let mut controller = build_controller(config, &args.selection)?;

    let now = Instant::now();
    controller.set_template_text(text, now);
    controller.flush(now);

    let rendered = render(&controller, args.format)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered).map_err(|source| CtlError::Write {
                path: path.clone(),
                source,
            })?;
            output::success(format!("Wrote {}", path.display()));
        }
        None => output::plain(rendered.trim_end()),
    }

    output::status(controller.status());
    outcome(&controller)
}

fn render(controller: &RegenerationController, format: GenerateFormat) -> CtlResult<String> {
    Ok(match format {
        GenerateFormat::Code => controller.generated_code().to_string(),
        GenerateFormat::Tree => controller
            .generated_tree()
            .map(|tree| tree.outline())
            .unwrap_or_default(),
        GenerateFormat::Json => serde_json::to_string_pretty(&controller.snapshot())?,
    })
}

fn outcome(controller: &RegenerationController) -> CtlResult<()> {
    match controller.state() {
        RegenerationState::Failed(reason) if reason == STATUS_ERRORS => Err(CtlError::TemplateErrors),
        RegenerationState::Failed(_) => Err(CtlError::GenerationFailed(controller.status().to_string())),
        _ => Ok(()),
    }
}
