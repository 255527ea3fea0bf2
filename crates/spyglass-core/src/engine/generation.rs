//! Compilation host and generation result shapes.

use serde::{Deserialize, Serialize};

use crate::language::LanguageDescriptor;
use crate::source_unit::SourceUnit;
use crate::syntax::Block;

use super::EngineError;

/// Per-request configuration handed to an engine.
///
/// Engines create a host via `create_host`; the caller configures it and passes
/// it to exactly one `generate` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilationHost {
    language: Option<LanguageDescriptor>,
    design_time_mode: bool,
}

impl CompilationHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_language(&mut self, language: LanguageDescriptor) {
        self.language = Some(language);
    }

    pub fn set_design_time_mode(&mut self, design_time_mode: bool) {
        self.design_time_mode = design_time_mode;
    }

    pub fn language(&self) -> Option<&LanguageDescriptor> {
        self.language.as_ref()
    }

    pub fn design_time_mode(&self) -> bool {
        self.design_time_mode
    }

    /// The configured language, or `HostNotConfigured` if none was set.
    pub fn require_language(&self) -> Result<&LanguageDescriptor, EngineError> {
        self.language.as_ref().ok_or(EngineError::HostNotConfigured)
    }

    /// Fail with `UnsupportedLanguage` unless the configured language is in `supported`.
    pub fn require_supported(
        &self,
        supported: &[LanguageDescriptor],
    ) -> Result<&LanguageDescriptor, EngineError> {
        let language = self.require_language()?;
        if supported.contains(language) {
            Ok(language)
        } else {
            Err(EngineError::UnsupportedLanguage {
                id: language.id().to_string(),
            })
        }
    }
}

/// Outcome of one compilation.
///
/// `success == false` is a normal outcome (the template has errors); the
/// generated code and tree are still meaningful and get displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub code: SourceUnit,
    pub document: Block,
    pub success: bool,
}

impl GenerationResult {
    pub fn new(code: SourceUnit, document: Block, success: bool) -> Self {
        Self {
            code,
            document,
            success,
        }
    }
}
