//! Target-agnostic representation of generated code.
//!
//! Engines build a [`SourceUnit`]; emitters render it to text for one language.
//! A unit is a namespace, imports, and classes whose
//! methods are flat statement lists.

use serde::{Deserialize, Serialize};

/// Abstract generated source, prior to text rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    /// Enclosing namespace / module path, if any.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Imported namespaces or modules.
    #[serde(default)]
    pub imports: Vec<String>,
    /// Declared types, in emission order.
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

/// A generated class-like type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

/// A generated method with a flat statement body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

/// One statement in a generated method body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Statement {
    /// Write literal template text to the output.
    WriteLiteral(String),
    /// Evaluate an expression and write its value.
    WriteExpression(String),
    /// Target-language code carried through verbatim.
    Code(String),
    Comment(String),
    /// Maps following statements back to a template source line (design-time only).
    LinePragma { line: usize },
}

impl SourceUnit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_import(mut self, import: impl Into<String>) -> Self {
        self.imports.push(import.into());
        self
    }

    pub fn with_type(mut self, decl: TypeDecl) -> Self {
        self.types.push(decl);
        self
    }

    /// Total statement count across all methods.
    pub fn statement_count(&self) -> usize {
        self.types
            .iter()
            .flat_map(|t| &t.methods)
            .map(|m| m.statements.len())
            .sum()
    }
}

impl TypeDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            methods: Vec::new(),
        }
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }
}

impl MethodDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            statements: Vec::new(),
        }
    }

    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }
}
