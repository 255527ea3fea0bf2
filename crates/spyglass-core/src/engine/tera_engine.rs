//! Built-in engine for Tera-style templates.
//!
//! The template is segmented into a [`Block`] tree and validated by the `tera`
//! crate. Code generation lowers the tree into a single `execute` method that
//! writes markup literally and evaluates `{{ }}` expressions; statements are
//! carried as comments. Design-time mode adds a line pragma before every node.

use std::error::Error as _;

use tera::Tera;

use super::segment::{line_of, segment};
use super::{CompilationHost, EngineDescriptor, EngineError, GenerationResult, TemplateEngine};
use crate::language::{builtin, LanguageDescriptor};
use crate::source_unit::{MethodDecl, SourceUnit, Statement, TypeDecl};
use crate::syntax::{Block, BlockKind};

pub const ENGINE_ID: &str = "tera";

const TEMPLATE_NAME: &str = "__spyglass__";

#[derive(Debug, Clone)]
pub struct TeraEngine {
    languages: Vec<LanguageDescriptor>,
}

impl Default for TeraEngine {
    fn default() -> Self {
        Self {
            languages: Self::descriptor().supported_languages,
        }
    }
}

impl TeraEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn descriptor() -> EngineDescriptor {
        EngineDescriptor::new(
            ENGINE_ID,
            "Tera",
            vec![
                builtin::csharp(),
                builtin::python(),
                builtin::rust(),
                builtin::typescript(),
            ],
        )
    }

    /// Validate with the real Tera parser, flattening the error chain.
    fn validate(source: &str) -> Result<(), String> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, source).map_err(|e| {
            let mut message = e.to_string();
            let mut cause = e.source();
            while let Some(inner) = cause {
                message.push_str(": ");
                message.push_str(&inner.to_string());
                cause = inner.source();
            }
            message
        })
    }
}

impl TemplateEngine for TeraEngine {
    fn generate(
        &self,
        source: &str,
        host: &CompilationHost,
    ) -> Result<Option<GenerationResult>, EngineError> {
        let language = host.require_supported(&self.languages)?;

        if source.trim().is_empty() {
            return Ok(None);
        }

        let segmented = segment(source);
        let mut errors = segmented.errors;
        if let Err(message) = Self::validate(source) {
            errors.push(message);
        }

        let mut execute = MethodDecl::new("execute");
        for error in &errors {
            execute.push(Statement::Comment(format!("error: {error}")));
        }
        lower(
            &segmented.document,
            source,
            host.design_time_mode(),
            &mut execute,
        );

        let code = SourceUnit::new().with_namespace("Templates").with_type(
            TypeDecl::new("GeneratedTemplate")
                .with_base("TemplateBase")
                .with_method(execute),
        );

        tracing::debug!(
            language = %language.id(),
            design_time = host.design_time_mode(),
            errors = errors.len(),
            nodes = segmented.document.node_count(),
            "Tera template generated"
        );

        Ok(Some(GenerationResult::new(
            code,
            segmented.document,
            errors.is_empty(),
        )))
    }
}

fn lower(block: &Block, source: &str, design_time: bool, method: &mut MethodDecl) {
    if design_time && block.kind != BlockKind::Document {
        method.push(Statement::LinePragma {
            line: line_of(source, block.span.start),
        });
    }

    match block.kind {
        BlockKind::Document => {}
        BlockKind::Markup => method.push(Statement::WriteLiteral(block.content.clone())),
        BlockKind::Expression => method.push(Statement::WriteExpression(block.content.clone())),
        BlockKind::Statement | BlockKind::Section => {
            method.push(Statement::Comment(format!("{{% {} %}}", block.content)));
        }
        BlockKind::Comment => {
            if design_time {
                method.push(Statement::Comment(block.content.clone()));
            }
        }
    }

    for child in &block.children {
        lower(child, source, design_time, method);
    }
}
