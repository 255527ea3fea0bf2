//! Built-in engine that treats the whole template as literal output.

use super::{CompilationHost, EngineDescriptor, EngineError, GenerationResult, TemplateEngine};
use crate::language::{builtin, LanguageDescriptor};
use crate::source_unit::{MethodDecl, SourceUnit, Statement, TypeDecl};
use crate::syntax::{Block, BlockKind, Span};

pub const ENGINE_ID: &str = "literal";

#[derive(Debug, Clone)]
pub struct LiteralEngine {
    languages: Vec<LanguageDescriptor>,
}

impl Default for LiteralEngine {
    fn default() -> Self {
        Self {
            languages: Self::descriptor().supported_languages,
        }
    }
}

impl LiteralEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn descriptor() -> EngineDescriptor {
        EngineDescriptor::new(
            ENGINE_ID,
            "Literal",
            vec![builtin::rust(), builtin::typescript()],
        )
    }
}

impl TemplateEngine for LiteralEngine {
    fn generate(
        &self,
        source: &str,
        host: &CompilationHost,
    ) -> Result<Option<GenerationResult>, EngineError> {
        host.require_supported(&self.languages)?;

        if source.is_empty() {
            return Ok(None);
        }

        let mut render = MethodDecl::new("render");
        if host.design_time_mode() {
            render.push(Statement::LinePragma { line: 1 });
        }
        render.push(Statement::WriteLiteral(source.to_string()));

        let code = SourceUnit::new().with_type(TypeDecl::new("LiteralTemplate").with_method(render));
        let document = Block::document(source.len()).with_children(vec![Block::new(
            BlockKind::Markup,
            Span::new(0, source.len()),
            source,
        )]);

        Ok(Some(GenerationResult::new(code, document, true)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_generation() {
        let engine = LiteralEngine::new();
        let mut host = engine.create_host();
        host.set_language(builtin::typescript());

        let result = engine.generate("{{ not parsed }}", &host).unwrap().unwrap();
        assert!(result.success);
        assert_eq!(result.document.node_count(), 2);
        assert_eq!(
            result.code.types[0].methods[0].statements,
            vec![Statement::WriteLiteral("{{ not parsed }}".into())]
        );
    }

    #[test]
    fn test_literal_rejects_csharp() {
        let engine = LiteralEngine::new();
        let mut host = engine.create_host();
        host.set_language(builtin::csharp());
        assert!(engine.generate("x", &host).is_err());
    }

    #[test]
    fn test_literal_empty_declines() {
        let engine = LiteralEngine::new();
        let mut host = engine.create_host();
        host.set_language(builtin::rust());
        assert!(engine.generate("", &host).unwrap().is_none());
    }
}
