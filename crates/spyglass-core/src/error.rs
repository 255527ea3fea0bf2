//! Crate-level error aggregate.

use crate::emit::EmitError;
use crate::engine::EngineError;
use crate::language::LanguageError;
use crate::registry::{DiscoveryError, RegistryError};
use crate::selection::SelectionError;

/// Wiring between presentation and the regeneration pipeline failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompositionError {
    #[error("regeneration loop is no longer running")]
    Detached,
    #[error("failed to start inspector: {0}")]
    Startup(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SpyglassError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Composition(#[from] CompositionError),

    #[error(transparent)]
    Language(#[from] LanguageError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

pub type SpyglassResult<T> = Result<T, SpyglassError>;
