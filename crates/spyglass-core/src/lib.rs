//! Engine abstraction and live regeneration pipeline for Spyglass.
//!
//! Spyglass inspects pluggable template compilers: a user edits template text,
//! picks an engine and one of its output languages, and the pipeline keeps the
//! generated source and syntax tree up to date.
//!
//! # Modules
//!
//! ## Data shapes
//! - [`language`]: Output language descriptors
//! - [`source_unit`]: Target-agnostic generated code
//! - [`syntax`]: Opaque syntax tree blocks handed to presentation
//! - [`emit`]: Emitter registry and the built-in Askama emitters
//!
//! ## Engines
//! - [`engine`]: Engine contract, compilation host, generation result, built-in engines
//! - [`registry`]: Observable, ordered engine registry
//! - [`selection`]: Engine/language selection and its repair rules
//!
//! ## Pipeline
//! - [`controller`]: Debounced regeneration state machine
//! - [`regeneration_loop`]: Tokio driver owning a controller
//! - [`config`]: Controller configuration

pub mod config;
pub mod controller;
pub mod emit;
pub mod engine;
pub mod error;
pub mod language;
pub mod regeneration_loop;
pub mod registry;
pub mod selection;
pub mod source_unit;
pub mod syntax;

pub use config::ControllerConfig;
pub use controller::{ControllerSnapshot, RegenerationController, RegenerationState};
pub use emit::{EmitterRegistry, SourceEmitter};
pub use engine::{
    CompilationHost, EngineDescriptor, EngineEntry, EngineError, EngineId, GenerationResult,
    TemplateEngine,
};
pub use error::{CompositionError, SpyglassError, SpyglassResult};
pub use language::{LanguageDescriptor, LanguageError};
pub use regeneration_loop::{ControllerCommand, RegenerationHandle, RegenerationLoop};
pub use registry::{DiscoveryError, EngineRegistry, RegistryError, RegistryEvent};
pub use selection::{EngineSelection, SelectionError};
pub use source_unit::SourceUnit;
pub use syntax::Block;
