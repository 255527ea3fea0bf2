//! `watch` command: keep a regeneration loop running over a template file.
//!
//! The file is polled on an interval; every change is sent to the loop, which
//! debounces it. Each completed generation is printed with its status.

use std::path::Path;

use spyglass_core::{ControllerCommand, ControllerSnapshot, RegenerationLoop};
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::{build_controller, read_template};
use crate::cli_config::CliConfig;
use crate::error::CtlResult;
use crate::output;
use crate::WatchArgs;

pub(crate) async fn handle_watch_command(args: WatchArgs, config: &CliConfig) -> CtlResult<()> {
    let mut contents = read_template(&args.template)?;
    let controller = build_controller(config, &args.selection)?;

    let (handle, task) = RegenerationLoop::spawn(controller);
    let mut snapshots = handle.snapshots();

    output::dim(format!(
        "Watching {} (Ctrl-C to stop)",
        args.template.display()
    ));
    handle
        .send(ControllerCommand::SetTemplateText(contents.clone()))
        .await?;

    let mut ticker = tokio::time::interval(config.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut printed = 0;
    let mut last_status = String::new();

    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Some(updated) = reload(&args.template, &contents).await {
                    debug!(path = %args.template.display(), "Template changed");
                    contents = updated;
                    handle
                        .send(ControllerCommand::SetTemplateText(contents.clone()))
                        .await?;
                }
            }

            changed = snapshots.changed() => {
                if changed.is_err() {
                    warn!("Regeneration loop stopped unexpectedly");
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                if snapshot.generation_count > printed {
                    printed = snapshot.generation_count;
                    print_snapshot(&snapshot);
                } else if snapshot.status != last_status {
                    output::status(&snapshot.status);
                }
                last_status = snapshot.status;
            }

            _ = &mut interrupt => {
                debug!("Interrupted");
                break;
            }
        }
    }

    if handle.shutdown().await.is_err() {
        debug!("Regeneration loop already stopped");
    }
    if let Err(e) = task.await {
        warn!(error = %e, "Regeneration loop task failed");
    }
    Ok(())
}

/// New file contents, if they differ from `current`. A file that cannot be
/// read counts as unchanged.
async fn reload(path: &Path, current: &str) -> Option<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) if text != current => Some(text),
        Ok(_) => None,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Template not readable");
            None
        }
    }
}

fn print_snapshot(snapshot: &ControllerSnapshot) {
    output::blank();
    if let (Some(engine), Some(language)) = (&snapshot.selected_engine, &snapshot.selected_language) {
        output::header(format!("{engine} / {language}"));
    }
    if !snapshot.generated_code.is_empty() {
        output::plain(snapshot.generated_code.trim_end());
    }
    output::status(&snapshot.status);
}
