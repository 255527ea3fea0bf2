//! CLI error type.

use std::path::PathBuf;

use spyglass_core::{CompositionError, SelectionError, SpyglassError};

#[derive(Debug, thiserror::Error)]
pub(crate) enum CtlError {
    #[error(transparent)]
    Spyglass(#[from] SpyglassError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("engine '{engine}' does not support language '{language}' (available: {available})")]
    UnsupportedLanguage {
        engine: String,
        language: String,
        available: String,
    },

    #[error("template compiled with errors")]
    TemplateErrors,

    #[error("{0}")]
    GenerationFailed(String),

    #[error("plugin at {path} is invalid: {problems}")]
    InvalidPlugin { path: String, problems: String },
}

impl From<SelectionError> for CtlError {
    fn from(value: SelectionError) -> Self {
        Self::Spyglass(value.into())
    }
}

impl From<CompositionError> for CtlError {
    fn from(value: CompositionError) -> Self {
        Self::Spyglass(value.into())
    }
}

pub(crate) type CtlResult<T> = Result<T, CtlError>;
