//! Output language descriptors.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::emit::{EmitterRegistry, SourceEmitter};

/// Identifies an output programming language (stable id + display name).
///
/// Two descriptors are equal when their ids match, regardless of display name.
/// Engines declare their own descriptors, so the same id may appear under
/// several engines with different names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageDescriptor {
    id: String,
    name: String,
}

impl LanguageDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Construct a source emitter for this language from the host's emitter table.
    pub fn create_emitter(
        &self,
        emitters: &EmitterRegistry,
    ) -> Result<Box<dyn SourceEmitter>, LanguageError> {
        emitters
            .create(&self.id)
            .ok_or_else(|| LanguageError::Unsupported {
                id: self.id.clone(),
            })
    }
}

impl PartialEq for LanguageDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for LanguageDescriptor {}

impl Hash for LanguageDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for LanguageDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Well-known descriptors for the languages with built-in emitters.
pub mod builtin {
    use super::LanguageDescriptor;

    pub fn csharp() -> LanguageDescriptor {
        LanguageDescriptor::new("csharp", "C#")
    }

    pub fn python() -> LanguageDescriptor {
        LanguageDescriptor::new("python", "Python")
    }

    pub fn rust() -> LanguageDescriptor {
        LanguageDescriptor::new("rust", "Rust")
    }

    pub fn typescript() -> LanguageDescriptor {
        LanguageDescriptor::new("typescript", "TypeScript")
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum LanguageError {
    #[error("Language not supported: {id}")]
    Unsupported { id: String },
}
