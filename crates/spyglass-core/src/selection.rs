//! Engine and language selection, and the rules that keep them consistent.
//!
//! Whenever an engine is selected, the selected language is either `None` or
//! one of that engine's own language descriptors. Violations are repaired,
//! never rejected:
//!
//! 1. no language selected → the engine's first language
//! 2. language not supported → the engine's language with the same id
//! 3. otherwise → the engine's first language, or `None` if it has none
//!
//! Given the same registry snapshot and prior selection the outcome is always
//! the same.

use crate::engine::EngineId;
use crate::language::LanguageDescriptor;
use crate::registry::EngineRegistry;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("no engine registered with id '{0}'")]
    UnknownEngine(EngineId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineSelection {
    engine: Option<EngineId>,
    language: Option<LanguageDescriptor>,
}

impl EngineSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn engine(&self) -> Option<&EngineId> {
        self.engine.as_ref()
    }

    pub fn language(&self) -> Option<&LanguageDescriptor> {
        self.language.as_ref()
    }

    /// Languages offered by the selected engine (empty when none is selected).
    pub fn languages(&self, registry: &EngineRegistry) -> Vec<LanguageDescriptor> {
        self.engine
            .as_ref()
            .and_then(|id| registry.get(id))
            .map(|entry| entry.descriptor().supported_languages.clone())
            .unwrap_or_default()
    }

    /// Re-validate against the registry after engines were added or removed.
    ///
    /// A selected engine that is no longer registered is dropped; with no
    /// engine selected the first registered engine is picked. Returns whether
    /// the selection changed.
    pub fn reconcile(&mut self, registry: &EngineRegistry) -> bool {
        let before = self.clone();

        if let Some(id) = &self.engine {
            if !registry.contains(id) {
                tracing::debug!(engine = %id, "Selected engine left the registry");
                self.engine = None;
            }
        }

        if self.engine.is_none() {
            self.engine = registry.first().map(|entry| entry.id().clone());
        }

        self.ensure_language(registry);
        *self != before
    }

    /// Select an engine by id, or clear the selection with `None`.
    pub fn select_engine(
        &mut self,
        id: Option<EngineId>,
        registry: &EngineRegistry,
    ) -> Result<bool, SelectionError> {
        if let Some(id) = &id {
            if !registry.contains(id) {
                return Err(SelectionError::UnknownEngine(id.clone()));
            }
        }

        let before = self.clone();
        self.engine = id;
        self.ensure_language(registry);
        Ok(*self != before)
    }

    /// Select a language, repairing it against the selected engine's set.
    pub fn select_language(
        &mut self,
        language: Option<LanguageDescriptor>,
        registry: &EngineRegistry,
    ) -> bool {
        let before = self.clone();
        self.language = language;
        self.ensure_language(registry);
        *self != before
    }

    fn ensure_language(&mut self, registry: &EngineRegistry) {
        let Some(entry) = self.engine.as_ref().and_then(|id| registry.get(id)) else {
            return;
        };
        self.language = resolve_language(
            self.language.as_ref(),
            &entry.descriptor().supported_languages,
        );
    }
}

/// Apply the repair rules to a language against an engine's supported set.
pub fn resolve_language(
    current: Option<&LanguageDescriptor>,
    supported: &[LanguageDescriptor],
) -> Option<LanguageDescriptor> {
    current
        .and_then(|lang| supported.iter().find(|l| l.id() == lang.id()))
        .or_else(|| supported.first())
        .cloned()
}
