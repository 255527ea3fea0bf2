//! Shared fixtures for spyglass-core integration tests.
//!
//! Provides a recording engine with switchable behavior, a plain-text emitter
//! for arbitrary language ids, and controller builders.

#![expect(
    dead_code,
    reason = "Test utilities shared across integration test modules"
)]

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use spyglass_core::emit::EmitError;
use spyglass_core::source_unit::{MethodDecl, Statement, TypeDecl};
use spyglass_core::{
    Block, CompilationHost, ControllerConfig, EmitterRegistry, EngineDescriptor, EngineError,
    EngineRegistry, GenerationResult, LanguageDescriptor, RegenerationController, SourceEmitter,
    SourceUnit, TemplateEngine,
};

pub const DEBOUNCE: Duration = Duration::from_millis(100);

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// One observed `generate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub source: String,
    pub language: Option<String>,
    pub design_time: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Behavior {
    Succeed,
    ReportErrors,
    Decline,
    Fault(String),
    Panic,
}

/// Engine that records every call and answers according to a shared behavior.
#[derive(Debug, Clone)]
pub struct RecordingEngine {
    calls: Arc<Mutex<Vec<Call>>>,
    behavior: Arc<Mutex<Behavior>>,
}

impl Default for RecordingEngine {
    fn default() -> Self {
        Self {
            calls: Arc::default(),
            behavior: Arc::new(Mutex::new(Behavior::Succeed)),
        }
    }
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl TemplateEngine for RecordingEngine {
    fn generate(
        &self,
        source: &str,
        host: &CompilationHost,
    ) -> Result<Option<GenerationResult>, EngineError> {
        self.calls.lock().unwrap().push(Call {
            source: source.to_string(),
            language: host.language().map(|l| l.id().to_string()),
            design_time: host.design_time_mode(),
        });

        let behavior = self.behavior.lock().unwrap().clone();
        let success = match behavior {
            Behavior::Succeed => true,
            Behavior::ReportErrors => false,
            Behavior::Decline => return Ok(None),
            Behavior::Fault(reason) => return Err(EngineError::Generation(reason)),
            Behavior::Panic => panic!("engine exploded"),
        };

        let mut render = MethodDecl::new("render");
        render.push(Statement::WriteLiteral(source.to_string()));
        let code = SourceUnit::new().with_type(TypeDecl::new("Echo").with_method(render));
        Ok(Some(GenerationResult::new(
            code,
            Block::document(source.len()),
            success,
        )))
    }
}

/// Emits every literal on its own line, for any language id.
#[derive(Debug)]
pub struct PlainEmitter(pub String);

impl SourceEmitter for PlainEmitter {
    fn language_id(&self) -> &str {
        &self.0
    }

    fn emit(&self, unit: &SourceUnit) -> Result<String, EmitError> {
        let mut out = String::new();
        for decl in &unit.types {
            for method in &decl.methods {
                for statement in &method.statements {
                    if let Statement::WriteLiteral(text) = statement {
                        out.push_str(text);
                        out.push('\n');
                    }
                }
            }
        }
        Ok(out)
    }
}

pub fn lang(id: &str) -> LanguageDescriptor {
    LanguageDescriptor::new(id, id.to_uppercase())
}

pub fn emitters(ids: &[&str]) -> EmitterRegistry {
    let mut registry = EmitterRegistry::new();
    for id in ids {
        let owned = (*id).to_string();
        registry.register(*id, move || Box::new(PlainEmitter(owned.clone())));
    }
    registry
}

pub fn register(registry: &EngineRegistry, id: &str, languages: &[&str], engine: &RecordingEngine) {
    let descriptor = EngineDescriptor::new(id, id.to_uppercase(), languages.iter().map(|l| lang(l)).collect());
    registry
        .register_engine(descriptor, Arc::new(engine.clone()))
        .unwrap();
}

pub fn controller(registry: &Arc<EngineRegistry>, emitter_ids: &[&str]) -> RegenerationController {
    RegenerationController::new(
        Arc::clone(registry),
        Arc::new(emitters(emitter_ids)),
        ControllerConfig::default().with_debounce(DEBOUNCE),
    )
}

/// Registry with `e1{a,b}` and `e2{b,c}`, both backed by their own recorders.
pub fn two_engines() -> (Arc<EngineRegistry>, RecordingEngine, RecordingEngine) {
    let registry = Arc::new(EngineRegistry::new());
    let e1 = RecordingEngine::new();
    let e2 = RecordingEngine::new();
    register(&registry, "e1", &["a", "b"], &e1);
    register(&registry, "e2", &["b", "c"], &e2);
    (registry, e1, e2)
}

pub fn start() -> Instant {
    Instant::now()
}
