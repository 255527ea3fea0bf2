//! Debounced, single-flight regeneration state machine.
//!
//! The controller owns the editable inputs (template text, selection,
//! design-time flag) and the generated outputs. Every setter takes the current
//! time; an effective change (re)arms the debounce timer, and [`poll`] runs the
//! generation once the timer is due. Time is always supplied by the caller so
//! drivers and tests control the clock.
//!
//! ```text
//! Idle / Succeeded / Failed --change--> PendingDebounce --due--> Generating
//!                                          ^   |change                |
//!                                          +---+                      v
//!                                             Succeeded / Failed / Idle
//! ```
//!
//! Generation is split into [`begin_generation`] and [`complete_generation`]
//! so a driver can publish the `"Compiling..."` status before the engine runs.
//!
//! [`poll`]: RegenerationController::poll
//! [`begin_generation`]: RegenerationController::begin_generation
//! [`complete_generation`]: RegenerationController::complete_generation

mod debounce;
mod state;

use std::any::Any;
use std::fmt;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::config::ControllerConfig;
use crate::emit::EmitterRegistry;
use crate::engine::{CompilationHost, EngineError, EngineId, TemplateEngine};
use crate::error::SpyglassResult;
use crate::language::LanguageDescriptor;
use crate::registry::EngineRegistry;
use crate::selection::{EngineSelection, SelectionError};
use crate::source_unit::SourceUnit;
use crate::syntax::Block;

pub use debounce::DebounceTimer;
pub use state::{
    ControllerSnapshot, RegenerationState, STATUS_COMPILING, STATUS_ERRORS, STATUS_READY,
    STATUS_SUCCESS,
};

use state::failure_status;

/// A generation that has been started but whose engine has not run yet.
///
/// Dropping it without [`RegenerationController::complete_generation`]
/// abandons the generation; the controller returns to `Idle` on its next call.
#[must_use = "pass to `complete_generation`, or the generation is abandoned"]
pub struct PendingGeneration {
    engine_id: EngineId,
    engine: Arc<dyn TemplateEngine>,
    host: CompilationHost,
    source: String,
    dropped: Arc<AtomicBool>,
}

impl Drop for PendingGeneration {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::Release);
    }
}

impl PendingGeneration {
    pub fn engine_id(&self) -> &EngineId {
        &self.engine_id
    }

    pub fn host(&self) -> &CompilationHost {
        &self.host
    }
}

impl fmt::Debug for PendingGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingGeneration")
            .field("engine_id", &self.engine_id)
            .field("host", &self.host)
            .field("source_len", &self.source.len())
            .finish()
    }
}

#[derive(Debug)]
pub struct RegenerationController {
    registry: Arc<EngineRegistry>,
    emitters: Arc<EmitterRegistry>,
    config: ControllerConfig,
    selection: EngineSelection,
    template_text: String,
    design_time_mode: bool,
    state: RegenerationState,
    timer: DebounceTimer,
    status: String,
    generated_code: String,
    generated_tree: Option<Block>,
    generation_count: u64,
    changed_while_generating: bool,
    /// Drop flag of the outstanding `PendingGeneration`, if any.
    in_flight: Option<Arc<AtomicBool>>,
}

impl RegenerationController {
    /// Create a controller and pick the initial engine and language.
    pub fn new(
        registry: Arc<EngineRegistry>,
        emitters: Arc<EmitterRegistry>,
        config: ControllerConfig,
    ) -> Self {
        let mut selection = EngineSelection::new();
        selection.reconcile(&registry);

        Self {
            registry,
            emitters,
            config,
            selection,
            template_text: String::new(),
            design_time_mode: false,
            state: RegenerationState::Idle,
            timer: DebounceTimer::new(),
            status: STATUS_READY.to_string(),
            generated_code: String::new(),
            generated_tree: None,
            generation_count: 0,
            changed_while_generating: false,
            in_flight: None,
        }
    }

    // -- inputs -----------------------------------------------------------

    pub fn set_template_text(&mut self, text: impl Into<String>, now: Instant) -> bool {
        let text = text.into();
        if text == self.template_text {
            return false;
        }
        self.template_text = text;
        self.mark_changed(now);
        true
    }

    pub fn select_engine(
        &mut self,
        id: Option<EngineId>,
        now: Instant,
    ) -> Result<bool, SelectionError> {
        let changed = self.selection.select_engine(id, &self.registry)?;
        if changed {
            self.mark_changed(now);
        }
        Ok(changed)
    }

    pub fn select_language(&mut self, language: Option<LanguageDescriptor>, now: Instant) -> bool {
        let changed = self.selection.select_language(language, &self.registry);
        if changed {
            self.mark_changed(now);
        }
        changed
    }

    pub fn set_design_time_mode(&mut self, enabled: bool, now: Instant) -> bool {
        if enabled == self.design_time_mode {
            return false;
        }
        self.design_time_mode = enabled;
        self.mark_changed(now);
        true
    }

    /// Re-validate the selection after engines were added or removed.
    pub fn on_registry_changed(&mut self, now: Instant) -> bool {
        let changed = self.selection.reconcile(&self.registry);
        if changed {
            tracing::debug!(
                engine = ?self.selection.engine(),
                language = ?self.selection.language().map(LanguageDescriptor::id),
                "Selection repaired after registry change"
            );
            self.mark_changed(now);
        }
        changed
    }

    // -- driving ----------------------------------------------------------

    /// Run a generation if the debounce timer is due. Returns whether it fired.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.reclaim_abandoned() {
            self.mark_changed(now);
        }
        if !self.timer.is_due(now) {
            return false;
        }
        self.run(now);
        true
    }

    /// Generate immediately, ignoring the timer.
    pub fn flush(&mut self, now: Instant) {
        self.reclaim_abandoned();
        self.run(now);
    }

    /// Deadline of the armed debounce timer, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Stop the timer and prepare an engine invocation.
    ///
    /// Returns `None` if a generation is already in flight, if the
    /// preconditions (engine selected, non-empty text) do not hold, or if the
    /// engine could not be instantiated. The latter two update state directly.
    pub fn begin_generation(&mut self) -> Option<PendingGeneration> {
        self.reclaim_abandoned();
        if self.state.is_generating() {
            return None;
        }
        self.timer.cancel();
        self.selection.reconcile(&self.registry);

        let entry = self
            .selection
            .engine()
            .and_then(|id| self.registry.get(id));
        let Some(entry) = entry.filter(|_| !self.template_text.is_empty()) else {
            tracing::debug!("Nothing to generate");
            self.clear_output();
            return None;
        };

        let engine = match entry.engine() {
            Ok(engine) => engine,
            Err(e) => {
                self.fail(e.to_string());
                return None;
            }
        };

        let mut host = engine.create_host();
        if let Some(language) = self.selection.language() {
            host.set_language(language.clone());
        }
        host.set_design_time_mode(self.design_time_mode);

        self.state = RegenerationState::Generating;
        self.status = STATUS_COMPILING.to_string();
        let dropped = Arc::new(AtomicBool::new(false));
        self.in_flight = Some(Arc::clone(&dropped));

        Some(PendingGeneration {
            engine_id: entry.id().clone(),
            engine,
            host,
            source: self.template_text.clone(),
            dropped,
        })
    }

    /// Invoke the engine for a pending generation and publish the outcome.
    ///
    /// Engine errors and panics leave the previous output in place. Changes
    /// recorded while the generation was in flight arm a fresh debounce from
    /// `now`.
    pub fn complete_generation(&mut self, pending: PendingGeneration, now: Instant) {
        self.in_flight = None;
        let PendingGeneration {
            engine_id,
            engine,
            host,
            source,
            ..
        } = &pending;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| engine.generate(source, host)));
        self.generation_count += 1;

        match outcome {
            Err(payload) => {
                self.fail(format!("engine panicked: {}", panic_message(payload.as_ref())));
            }
            Ok(Err(e)) => self.fail(e.to_string()),
            Ok(Ok(None)) => {
                tracing::info!(engine = %engine_id, "Engine produced no result");
                self.clear_output();
            }
            Ok(Ok(Some(result))) => match self.render(&result.code, host.language()) {
                Ok(code) => {
                    self.generated_code = code;
                    self.generated_tree = Some(result.document);
                    if result.success {
                        self.state = RegenerationState::Succeeded;
                        self.status = STATUS_SUCCESS.to_string();
                    } else {
                        self.state = RegenerationState::Failed(STATUS_ERRORS.to_string());
                        self.status = STATUS_ERRORS.to_string();
                    }
                    tracing::info!(
                        engine = %engine_id,
                        language = ?host.language().map(LanguageDescriptor::id),
                        success = result.success,
                        "Generation complete"
                    );
                }
                Err(e) => self.fail(e.to_string()),
            },
        }

        if mem::take(&mut self.changed_while_generating) {
            self.mark_changed(now);
        }
    }

    fn run(&mut self, now: Instant) {
        if let Some(pending) = self.begin_generation() {
            self.complete_generation(pending, now);
        }
    }

    fn render(&self, code: &SourceUnit, language: Option<&LanguageDescriptor>) -> SpyglassResult<String> {
        let language = language.ok_or(EngineError::HostNotConfigured)?;
        let emitter = language.create_emitter(&self.emitters)?;
        Ok(emitter.emit(code)?)
    }

    /// Leave `Generating` if its `PendingGeneration` was dropped uncompleted.
    /// Returns whether changes were recorded while it was outstanding.
    fn reclaim_abandoned(&mut self) -> bool {
        let abandoned = self
            .in_flight
            .as_ref()
            .is_some_and(|dropped| dropped.load(Ordering::Acquire));
        if !abandoned {
            return false;
        }

        tracing::warn!("Pending generation dropped without completing");
        self.in_flight = None;
        self.state = RegenerationState::Idle;
        self.status = STATUS_READY.to_string();
        mem::take(&mut self.changed_while_generating)
    }

    fn mark_changed(&mut self, now: Instant) {
        self.reclaim_abandoned();
        if self.state.is_generating() {
            self.changed_while_generating = true;
            return;
        }
        let deadline = self.timer.arm(now, self.config.debounce);
        self.state = RegenerationState::PendingDebounce { deadline };
    }

    fn clear_output(&mut self) {
        self.generated_code.clear();
        self.generated_tree = None;
        self.state = RegenerationState::Idle;
        self.status = STATUS_READY.to_string();
    }

    fn fail(&mut self, reason: String) {
        tracing::warn!(reason = %reason, "Generation failed");
        self.status = failure_status(&reason);
        self.state = RegenerationState::Failed(reason);
    }

    // -- outputs ----------------------------------------------------------

    pub fn template_text(&self) -> &str {
        &self.template_text
    }

    pub fn selected_engine(&self) -> Option<&EngineId> {
        self.selection.engine()
    }

    pub fn selected_language(&self) -> Option<&LanguageDescriptor> {
        self.selection.language()
    }

    /// Languages of the selected engine.
    pub fn languages(&self) -> Vec<LanguageDescriptor> {
        self.selection.languages(&self.registry)
    }

    pub fn design_time_mode(&self) -> bool {
        self.design_time_mode
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn generated_code(&self) -> &str {
        &self.generated_code
    }

    pub fn generated_tree(&self) -> Option<&Block> {
        self.generated_tree.as_ref()
    }

    pub fn state(&self) -> &RegenerationState {
        &self.state
    }

    pub fn generation_count(&self) -> u64 {
        self.generation_count
    }

    pub fn registry(&self) -> &Arc<EngineRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            state: self.state.to_string(),
            status: self.status.clone(),
            template_text: self.template_text.clone(),
            selected_engine: self.selection.engine().cloned(),
            selected_language: self.selection.language().cloned(),
            languages: self.languages(),
            design_time_mode: self.design_time_mode,
            generated_code: self.generated_code.clone(),
            generated_tree: self.generated_tree.clone(),
            generation_count: self.generation_count,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
