//! Tokio driver for a [`RegenerationController`].
//!
//! The loop task owns the controller exclusively and multiplexes:
//! - presentation commands from the [`RegenerationHandle`]
//! - add/remove notifications from the [`EngineRegistry`](crate::EngineRegistry)
//! - expiry of the controller's debounce deadline
//!
//! After every step it publishes a [`ControllerSnapshot`] on a watch channel.
//! Generation runs inline on the task, so at most one is ever in flight and
//! commands sent meanwhile wait in the channel.

use std::time::Instant;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::controller::{ControllerSnapshot, RegenerationController};
use crate::engine::EngineId;
use crate::error::CompositionError;
use crate::language::LanguageDescriptor;
use crate::registry::RegistryEvent;

const COMMAND_CAPACITY: usize = 256;

/// Presentation-side inputs to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerCommand {
    SetTemplateText(String),
    SelectEngine(Option<EngineId>),
    SelectLanguage(Option<LanguageDescriptor>),
    SetDesignTimeMode(bool),
    /// Generate now, without waiting for the debounce.
    Flush,
    Shutdown,
}

/// Cloneable sender/observer pair for a running loop.
#[derive(Debug, Clone)]
pub struct RegenerationHandle {
    commands: mpsc::Sender<ControllerCommand>,
    snapshots: watch::Receiver<ControllerSnapshot>,
}

impl RegenerationHandle {
    pub async fn send(&self, command: ControllerCommand) -> Result<(), CompositionError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| CompositionError::Detached)
    }

    pub async fn shutdown(&self) -> Result<(), CompositionError> {
        self.send(ControllerCommand::Shutdown).await
    }

    /// A receiver that observes every published snapshot from now on.
    pub fn snapshots(&self) -> watch::Receiver<ControllerSnapshot> {
        self.snapshots.clone()
    }

    /// The most recently published snapshot.
    pub fn current(&self) -> ControllerSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

#[derive(Debug)]
pub struct RegenerationLoop {
    controller: RegenerationController,
    commands: mpsc::Receiver<ControllerCommand>,
    events: broadcast::Receiver<RegistryEvent>,
    events_open: bool,
    snapshots: watch::Sender<ControllerSnapshot>,
}

impl RegenerationLoop {
    /// Move `controller` onto a new task and return a handle to drive it.
    ///
    /// Engines run inline on that task, so a slow or blocking engine (such as
    /// an out-of-process plugin) occupies a runtime worker thread while it runs.
    pub fn spawn(controller: RegenerationController) -> (RegenerationHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());
        let events = controller.registry().subscribe();

        let driver = Self {
            controller,
            commands: command_rx,
            events,
            events_open: true,
            snapshots: snapshot_tx,
        };
        let task = tokio::spawn(driver.run());

        let handle = RegenerationHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
        };
        (handle, task)
    }

    async fn run(mut self) {
        debug!("Regeneration loop started");

        loop {
            let deadline = self.controller.deadline();

            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else {
                        debug!("All handles dropped");
                        break;
                    };
                    if !self.apply(command) {
                        break;
                    }
                }

                event = self.events.recv(), if self.events_open => {
                    self.on_registry_event(event);
                }

                () = sleep_until(deadline) => {
                    self.generate();
                }
            }

            self.publish();
        }

        info!(
            generations = self.controller.generation_count(),
            "Regeneration loop stopped"
        );
    }

    /// Apply one command. Returns `false` on shutdown.
    fn apply(&mut self, command: ControllerCommand) -> bool {
        let now = now();
        match command {
            ControllerCommand::SetTemplateText(text) => {
                self.controller.set_template_text(text, now);
            }
            ControllerCommand::SelectEngine(id) => {
                if let Err(e) = self.controller.select_engine(id, now) {
                    warn!(error = %e, "Ignoring engine selection");
                }
            }
            ControllerCommand::SelectLanguage(language) => {
                self.controller.select_language(language, now);
            }
            ControllerCommand::SetDesignTimeMode(enabled) => {
                self.controller.set_design_time_mode(enabled, now);
            }
            ControllerCommand::Flush => self.generate(),
            ControllerCommand::Shutdown => return false,
        }
        true
    }

    fn on_registry_event(&mut self, event: Result<RegistryEvent, RecvError>) {
        match event {
            Ok(event) => {
                debug!(?event, "Registry changed");
                self.controller.on_registry_changed(now());
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Missed registry events; re-validating selection");
                self.controller.on_registry_changed(now());
            }
            Err(RecvError::Closed) => {
                debug!("Registry event channel closed");
                self.events_open = false;
            }
        }
    }

    fn generate(&mut self) {
        if let Some(pending) = self.controller.begin_generation() {
            self.publish();
            self.controller.complete_generation(pending, now());
        }
    }

    fn publish(&self) {
        let next = self.controller.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

/// Current time from tokio's clock, so paused test runtimes drive the debounce.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}
