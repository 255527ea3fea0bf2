//! Engine contract and metadata.
//!
//! An engine is a black-box template compiler. It advertises the output
//! languages it supports through an [`EngineDescriptor`] and implements
//! [`TemplateEngine`]: create a host, then generate from source text.
//!
//! Engines are instantiated lazily. An [`EngineEntry`] pairs the descriptor
//! with a factory; the instance is built on first use and cached.

mod generation;
pub mod literal;
mod segment;
pub mod tera_engine;

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::language::LanguageDescriptor;

pub use generation::{CompilationHost, GenerationResult};
pub use literal::LiteralEngine;
pub use tera_engine::TeraEngine;

/// Stable identity of an engine within a registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineId(String);

impl EngineId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EngineId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EngineId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Engine metadata, available without instantiating the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineDescriptor {
    pub id: EngineId,
    pub name: String,
    /// Supported output languages; the first one is the default.
    pub supported_languages: Vec<LanguageDescriptor>,
}

impl EngineDescriptor {
    pub fn new(
        id: impl Into<EngineId>,
        name: impl Into<String>,
        supported_languages: Vec<LanguageDescriptor>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            supported_languages,
        }
    }

    pub fn supports(&self, language: &LanguageDescriptor) -> bool {
        self.supported_languages.contains(language)
    }

    /// The engine's own descriptor for a language id, if supported.
    pub fn language(&self, id: &str) -> Option<&LanguageDescriptor> {
        self.supported_languages.iter().find(|l| l.id() == id)
    }
}

/// The capability every engine implements.
pub trait TemplateEngine: Send + Sync + fmt::Debug {
    /// Create a fresh, unconfigured host for one generation.
    fn create_host(&self) -> CompilationHost {
        CompilationHost::new()
    }

    /// Compile `source` with the configured host.
    ///
    /// Returns `Ok(None)` when the engine declines to produce a result (for
    /// example on empty input). A template with errors is `Ok(Some(result))`
    /// with `result.success == false`; `Err` is reserved for engine faults.
    fn generate(
        &self,
        source: &str,
        host: &CompilationHost,
    ) -> Result<Option<GenerationResult>, EngineError>;
}

type EngineFactory = Box<dyn Fn() -> Result<Arc<dyn TemplateEngine>, EngineError> + Send + Sync>;

/// A registered engine: metadata plus a lazily-built instance.
pub struct EngineEntry {
    descriptor: EngineDescriptor,
    factory: EngineFactory,
    instance: OnceCell<Arc<dyn TemplateEngine>>,
}

impl fmt::Debug for EngineEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineEntry")
            .field("descriptor", &self.descriptor)
            .field("instantiated", &self.instance.get().is_some())
            .finish()
    }
}

impl EngineEntry {
    /// Entry whose engine is built by `factory` on first use.
    pub fn lazy<F>(descriptor: EngineDescriptor, factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn TemplateEngine>, EngineError> + Send + Sync + 'static,
    {
        Self {
            descriptor,
            factory: Box::new(factory),
            instance: OnceCell::new(),
        }
    }

    /// Entry wrapping an already-built engine.
    pub fn eager(descriptor: EngineDescriptor, engine: Arc<dyn TemplateEngine>) -> Self {
        let instance = OnceCell::new();
        let _ = instance.set(Arc::clone(&engine));
        Self {
            descriptor,
            factory: Box::new(move || Ok(Arc::clone(&engine))),
            instance,
        }
    }

    pub fn descriptor(&self) -> &EngineDescriptor {
        &self.descriptor
    }

    pub fn id(&self) -> &EngineId {
        &self.descriptor.id
    }

    pub fn is_instantiated(&self) -> bool {
        self.instance.get().is_some()
    }

    /// The engine instance, building it on first call.
    ///
    /// A failed build is not cached; the next call retries.
    pub fn engine(&self) -> Result<Arc<dyn TemplateEngine>, EngineError> {
        self.instance
            .get_or_try_init(|| {
                tracing::debug!(engine = %self.descriptor.id, "Instantiating engine");
                (self.factory)()
            })
            .map(Arc::clone)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("compilation host has no language configured")]
    HostNotConfigured,
    #[error("Language not supported: {id}")]
    UnsupportedLanguage { id: String },
    #[error("failed to instantiate engine: {0}")]
    Instantiation(String),
    #[error("engine failed: {0}")]
    Generation(String),
    #[error("engine returned malformed output: {0}")]
    Protocol(String),
    #[error("engine I/O error: {0}")]
    Io(#[from] std::io::Error),
}
