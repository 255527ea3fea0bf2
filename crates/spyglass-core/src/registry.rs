//! Engine registry: an ordered, observable set of engines.
//!
//! Discovery collaborators register entries; the regeneration controller
//! reads them and reacts to [`RegistryEvent`]s. Insertion order is preserved
//! and decides the default engine. Discovery failures are recorded as
//! diagnostics and never abort population of the remaining sources.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::broadcast;

use crate::engine::{EngineDescriptor, EngineEntry, EngineId, LiteralEngine, TeraEngine, TemplateEngine};

const EVENT_CAPACITY: usize = 64;

/// Change notifications published by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    Added(EngineId),
    Removed(EngineId),
    DiscoveryFailed(DiscoveryError),
}

/// A single plugin source failed to load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to load engine plugin from {origin}: {reason}")]
pub struct DiscoveryError {
    /// Where the plugin came from (path, URL, registration name).
    pub origin: String,
    pub reason: String,
}

impl DiscoveryError {
    pub fn new(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("engine '{0}' is already registered")]
    DuplicateEngine(EngineId),
}

#[derive(Debug)]
pub struct EngineRegistry {
    entries: RwLock<Vec<Arc<EngineEntry>>>,
    diagnostics: RwLock<Vec<DiscoveryError>>,
    events: broadcast::Sender<RegistryEvent>,
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineRegistry {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            entries: RwLock::new(Vec::new()),
            diagnostics: RwLock::new(Vec::new()),
            events,
        }
    }

    /// Registry pre-populated with the built-in `tera` and `literal` engines.
    pub fn with_builtin_engines() -> Self {
        let registry = Self::new();
        registry.register_builtin_engines();
        registry
    }

    pub fn register_builtin_engines(&self) {
        let builtins = [
            EngineEntry::lazy(TeraEngine::descriptor(), || {
                Ok(Arc::new(TeraEngine::new()) as Arc<dyn TemplateEngine>)
            }),
            EngineEntry::lazy(LiteralEngine::descriptor(), || {
                Ok(Arc::new(LiteralEngine::new()) as Arc<dyn TemplateEngine>)
            }),
        ];
        for entry in builtins {
            if let Err(e) = self.register(entry) {
                tracing::debug!(error = %e, "Built-in engine already registered");
            }
        }
    }

    /// Add an engine. Ids must be unique within the registry.
    pub fn register(&self, entry: EngineEntry) -> Result<(), RegistryError> {
        let id = entry.id().clone();
        {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            if entries.iter().any(|e| e.id() == &id) {
                return Err(RegistryError::DuplicateEngine(id));
            }
            entries.push(Arc::new(entry));
        }

        tracing::debug!(engine = %id, "Registered engine");
        let _ = self.events.send(RegistryEvent::Added(id));
        Ok(())
    }

    /// Add an already-built engine.
    pub fn register_engine(
        &self,
        descriptor: EngineDescriptor,
        engine: Arc<dyn TemplateEngine>,
    ) -> Result<(), RegistryError> {
        self.register(EngineEntry::eager(descriptor, engine))
    }

    /// Remove an engine (e.g. plugin unload). Returns the removed entry.
    pub fn unregister(&self, id: &EngineId) -> Option<Arc<EngineEntry>> {
        let removed = {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            let index = entries.iter().position(|e| e.id() == id)?;
            entries.remove(index)
        };

        tracing::debug!(engine = %id, "Unregistered engine");
        let _ = self.events.send(RegistryEvent::Removed(id.clone()));
        Some(removed)
    }

    /// Record a per-source discovery failure as a diagnostic.
    pub fn report_discovery_failure(&self, error: DiscoveryError) {
        tracing::warn!(origin = %error.origin, reason = %error.reason, "Engine discovery failed");
        self.diagnostics
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error.clone());
        let _ = self.events.send(RegistryEvent::DiscoveryFailed(error));
    }

    /// Snapshot of the registered entries in insertion order.
    pub fn entries(&self) -> Vec<Arc<EngineEntry>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get(&self, id: &EngineId) -> Option<Arc<EngineEntry>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|e| e.id() == id)
            .cloned()
    }

    pub fn first(&self) -> Option<Arc<EngineEntry>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .first()
            .cloned()
    }

    pub fn contains(&self, id: &EngineId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn diagnostics(&self) -> Vec<DiscoveryError> {
        self.diagnostics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Subscribe to add/remove/diagnostic events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::builtin;

    fn descriptor(id: &str) -> EngineDescriptor {
        EngineDescriptor::new(id, id.to_uppercase(), vec![builtin::rust()])
    }

    #[test]
    fn test_builtin_engines_in_order() {
        let registry = EngineRegistry::with_builtin_engines();
        let ids: Vec<String> = registry
            .entries()
            .iter()
            .map(|e| e.id().to_string())
            .collect();
        assert_eq!(ids, vec!["tera", "literal"]);
        assert!(!registry.entries()[0].is_instantiated());
    }

    #[test]
    fn test_duplicate_rejected() {
        let registry = EngineRegistry::new();
        registry
            .register_engine(descriptor("a"), Arc::new(LiteralEngine::new()))
            .unwrap();
        let err = registry
            .register_engine(descriptor("a"), Arc::new(LiteralEngine::new()))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateEngine(EngineId::new("a")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister() {
        let registry = EngineRegistry::with_builtin_engines();
        let removed = registry.unregister(&EngineId::new("tera")).unwrap();
        assert_eq!(removed.id().as_str(), "tera");
        assert_eq!(registry.first().unwrap().id().as_str(), "literal");
        assert!(registry.unregister(&EngineId::new("tera")).is_none());
    }

    #[test]
    fn test_events_published() {
        let registry = EngineRegistry::new();
        let mut events = registry.subscribe();

        registry
            .register_engine(descriptor("a"), Arc::new(LiteralEngine::new()))
            .unwrap();
        registry.unregister(&EngineId::new("a"));
        registry.report_discovery_failure(DiscoveryError::new("plugins/broken", "bad manifest"));

        assert_eq!(events.try_recv().unwrap(), RegistryEvent::Added(EngineId::new("a")));
        assert_eq!(events.try_recv().unwrap(), RegistryEvent::Removed(EngineId::new("a")));
        assert!(matches!(
            events.try_recv().unwrap(),
            RegistryEvent::DiscoveryFailed(ref e) if e.origin == "plugins/broken"
        ));
    }

    #[test]
    fn test_discovery_failure_does_not_block_registration() {
        let registry = EngineRegistry::new();
        registry.report_discovery_failure(DiscoveryError::new("a", "boom"));
        registry
            .register_engine(descriptor("b"), Arc::new(LiteralEngine::new()))
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.diagnostics().len(), 1);
        assert_eq!(
            registry.diagnostics()[0].to_string(),
            "failed to load engine plugin from a: boom"
        );
    }
}
