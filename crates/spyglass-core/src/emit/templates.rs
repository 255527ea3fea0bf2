//! Askama template structs for the built-in emitters.
//!
//! Each dialect has one file template under `templates/emit/`, rendered from a
//! [`UnitView`] prepared by [`Dialect`].

use askama::Template;

use super::dialect::Dialect;
use super::{EmitError, SourceEmitter};
use crate::source_unit::SourceUnit;

/// Template-ready projection of a [`SourceUnit`] for one dialect.
#[derive(Debug)]
struct UnitView {
    has_namespace: bool,
    namespace: String,
    imports: Vec<String>,
    types: Vec<TypeView>,
}

#[derive(Debug)]
struct TypeView {
    name: String,
    has_base: bool,
    base: String,
    methods: Vec<MethodView>,
}

#[derive(Debug)]
struct MethodView {
    name: String,
    lines: Vec<String>,
}

impl UnitView {
    fn build(unit: &SourceUnit, dialect: Dialect) -> Self {
        Self {
            has_namespace: unit.namespace.is_some(),
            namespace: unit.namespace.clone().unwrap_or_default(),
            imports: unit.imports.iter().map(|i| dialect.import_line(i)).collect(),
            types: unit
                .types
                .iter()
                .map(|t| TypeView {
                    name: dialect.type_name(&t.name),
                    has_base: t.base.is_some(),
                    base: t
                        .base
                        .as_deref()
                        .map(|b| dialect.type_name(b))
                        .unwrap_or_default(),
                    methods: t
                        .methods
                        .iter()
                        .map(|m| MethodView {
                            name: dialect.method_name(&m.name),
                            lines: dialect.body_lines(&m.statements),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[derive(Template, Debug)]
#[template(path = "emit/csharp.cs", escape = "none")]
struct CSharpTemplate<'a> {
    unit: &'a UnitView,
}

#[derive(Template, Debug)]
#[template(path = "emit/python.py", escape = "none")]
struct PythonTemplate<'a> {
    unit: &'a UnitView,
}

#[derive(Template, Debug)]
#[template(path = "emit/rust.rs", escape = "none")]
struct RustTemplate<'a> {
    unit: &'a UnitView,
}

#[derive(Template, Debug)]
#[template(path = "emit/typescript.ts", escape = "none")]
struct TypeScriptTemplate<'a> {
    unit: &'a UnitView,
}

/// Askama-backed emitter for one built-in [`Dialect`].
#[derive(Debug, Clone, Copy)]
pub struct BuiltinEmitter {
    dialect: Dialect,
}

impl BuiltinEmitter {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }
}

impl SourceEmitter for BuiltinEmitter {
    fn language_id(&self) -> &str {
        self.dialect.language_id()
    }

    fn emit(&self, unit: &SourceUnit) -> Result<String, EmitError> {
        let view = UnitView::build(unit, self.dialect);
        let output = match self.dialect {
            Dialect::CSharp => CSharpTemplate { unit: &view }.render(),
            Dialect::Python => PythonTemplate { unit: &view }.render(),
            Dialect::Rust => RustTemplate { unit: &view }.render(),
            Dialect::TypeScript => TypeScriptTemplate { unit: &view }.render(),
        };

        output.map_err(|e| EmitError::Render {
            language: self.dialect.language_id().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_unit::{MethodDecl, Statement, TypeDecl};

    fn sample_unit() -> SourceUnit {
        let mut method = MethodDecl::new("execute");
        method.push(Statement::LinePragma { line: 1 });
        method.push(Statement::WriteLiteral("Hello, ".into()));
        method.push(Statement::WriteExpression(" name ".into()));
        method.push(Statement::Comment("{% if admin %}".into()));

        SourceUnit::new()
            .with_namespace("Templates")
            .with_import("System")
            .with_type(
                TypeDecl::new("generated_template")
                    .with_base("template_base")
                    .with_method(method),
            )
    }

    fn emit(dialect: Dialect) -> String {
        BuiltinEmitter::new(dialect).emit(&sample_unit()).unwrap()
    }

    // ── C# ──────────────────────────────────────────────────────────

    #[test]
    fn test_csharp_layout() {
        let out = emit(Dialect::CSharp);
        assert!(out.contains("using System;"));
        assert!(out.contains("namespace Templates;"));
        assert!(out.contains("public class GeneratedTemplate : TemplateBase"));
        assert!(out.contains("public override void Execute()"));
        assert!(out.contains("#line 1"));
        assert!(out.contains("WriteLiteral(\"Hello, \");"));
        assert!(out.contains("Write(name);"));
        assert!(out.contains("// {% if admin %}"));
    }

    // ── Python ──────────────────────────────────────────────────────

    #[test]
    fn test_python_layout() {
        let out = emit(Dialect::Python);
        assert!(out.contains("import system"));
        assert!(out.contains("class GeneratedTemplate(TemplateBase):"));
        assert!(out.contains("    def execute(self):"));
        assert!(out.contains("        self.write_literal(\"Hello, \")"));
        assert!(out.contains("        self.write(name)"));
    }

    #[test]
    fn test_python_class_without_methods_has_pass() {
        let unit = SourceUnit::new().with_type(TypeDecl::new("empty"));
        let out = BuiltinEmitter::new(Dialect::Python).emit(&unit).unwrap();
        assert!(out.contains("class Empty:"));
        assert!(out.contains("    pass"));
    }

    // ── Rust ────────────────────────────────────────────────────────

    #[test]
    fn test_rust_layout() {
        let out = emit(Dialect::Rust);
        assert!(out.contains("use system;"));
        assert!(out.contains("pub struct GeneratedTemplate;"));
        assert!(out.contains("impl TemplateBase for GeneratedTemplate {"));
        assert!(out.contains("    fn execute(&mut self) {"));
        assert!(out.contains("        self.write(&(name));"));
    }

    // ── TypeScript ──────────────────────────────────────────────────

    #[test]
    fn test_typescript_layout() {
        let out = emit(Dialect::TypeScript);
        assert!(out.contains("import \"System\";"));
        assert!(out.contains("export class GeneratedTemplate extends TemplateBase {"));
        assert!(out.contains("  execute(): void {"));
        assert!(out.contains("    this.writeLiteral(\"Hello, \");"));
    }

    #[test]
    fn test_language_id() {
        assert_eq!(BuiltinEmitter::new(Dialect::TypeScript).language_id(), "typescript");
    }
}
