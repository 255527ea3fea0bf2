//! Source emitters: render a [`SourceUnit`] to text for one language.
//!
//! The [`EmitterRegistry`] is the host environment's table of known languages.
//! A [`LanguageDescriptor`](crate::LanguageDescriptor) asks it for an emitter
//! by id; ids with no registration are unsupported.

mod dialect;
mod templates;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::source_unit::SourceUnit;

pub use dialect::Dialect;
pub use templates::BuiltinEmitter;

/// Renders an abstract source unit into target-language text.
pub trait SourceEmitter: Send + Sync + fmt::Debug {
    /// Id of the language this emitter produces.
    fn language_id(&self) -> &str;

    fn emit(&self, unit: &SourceUnit) -> Result<String, EmitError>;
}

type EmitterFactory = Arc<dyn Fn() -> Box<dyn SourceEmitter> + Send + Sync>;

/// Language id → emitter factory table.
#[derive(Clone, Default)]
pub struct EmitterRegistry {
    factories: BTreeMap<String, EmitterFactory>,
}

impl fmt::Debug for EmitterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmitterRegistry")
            .field("languages", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl EmitterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the Askama-backed emitters for every built-in [`Dialect`].
    pub fn with_builtin_emitters() -> Self {
        let mut registry = Self::new();
        for dialect in Dialect::ALL {
            registry.register(dialect.language_id(), move || {
                Box::new(BuiltinEmitter::new(dialect))
            });
        }
        registry
    }

    /// Register (or replace) the emitter factory for a language id.
    pub fn register<F>(&mut self, language_id: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn SourceEmitter> + Send + Sync + 'static,
    {
        let id = language_id.into();
        tracing::debug!(language = %id, "Registered source emitter");
        self.factories.insert(id, Arc::new(factory));
    }

    pub fn is_defined(&self, language_id: &str) -> bool {
        self.factories.contains_key(language_id)
    }

    /// Create an emitter for a language id, if one is registered.
    pub fn create(&self, language_id: &str) -> Option<Box<dyn SourceEmitter>> {
        self.factories.get(language_id).map(|factory| factory())
    }

    /// Registered language ids in sorted order.
    pub fn language_ids(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("failed to render {language} source: {source}")]
    Render {
        language: String,
        source: askama::Error,
    },
}
