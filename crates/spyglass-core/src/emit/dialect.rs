//! Per-language statement rendering for the built-in emitters.
//!
//! Askama templates lay out the file skeleton; everything that differs per
//! statement (escaping, comment syntax, call shape) is prepared here.

use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};

use crate::source_unit::Statement;

/// Built-in target languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    CSharp,
    Python,
    Rust,
    TypeScript,
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [
        Dialect::CSharp,
        Dialect::Python,
        Dialect::Rust,
        Dialect::TypeScript,
    ];

    pub fn language_id(self) -> &'static str {
        match self {
            Dialect::CSharp => "csharp",
            Dialect::Python => "python",
            Dialect::Rust => "rust",
            Dialect::TypeScript => "typescript",
        }
    }

    pub fn from_language_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.language_id() == id)
    }

    pub(crate) fn type_name(self, name: &str) -> String {
        name.to_upper_camel_case()
    }

    pub(crate) fn method_name(self, name: &str) -> String {
        match self {
            Dialect::CSharp => name.to_upper_camel_case(),
            Dialect::Python | Dialect::Rust => name.to_snake_case(),
            Dialect::TypeScript => name.to_lower_camel_case(),
        }
    }

    pub(crate) fn import_line(self, import: &str) -> String {
        match self {
            Dialect::CSharp => format!("using {import};"),
            Dialect::Python => format!("import {}", import.to_snake_case()),
            Dialect::Rust => format!("use {};", import.to_snake_case()),
            Dialect::TypeScript => format!("import \"{}\";", escape_string(import)),
        }
    }

    pub(crate) fn comment(self, text: &str) -> String {
        match self {
            Dialect::Python => format!("# {text}"),
            _ => format!("// {text}"),
        }
    }

    /// Render one statement as one or more source lines (unindented).
    pub(crate) fn statement_lines(self, statement: &Statement) -> Vec<String> {
        match statement {
            Statement::WriteLiteral(text) => {
                let lit = escape_string(text);
                vec![match self {
                    Dialect::CSharp => format!("WriteLiteral(\"{lit}\");"),
                    Dialect::Python => format!("self.write_literal(\"{lit}\")"),
                    Dialect::Rust => format!("self.write_literal(\"{lit}\");"),
                    Dialect::TypeScript => format!("this.writeLiteral(\"{lit}\");"),
                }]
            }
            Statement::WriteExpression(expr) => {
                let expr = expr.trim();
                vec![match self {
                    Dialect::CSharp => format!("Write({expr});"),
                    Dialect::Python => format!("self.write({expr})"),
                    Dialect::Rust => format!("self.write(&({expr}));"),
                    Dialect::TypeScript => format!("this.write({expr});"),
                }]
            }
            Statement::Code(code) => code
                .lines()
                .map(str::trim_end)
                .filter(|l| !l.trim().is_empty())
                .map(str::to_string)
                .collect(),
            Statement::Comment(text) => text.lines().map(|l| self.comment(l.trim())).collect(),
            Statement::LinePragma { line } => vec![match self {
                Dialect::CSharp => format!("#line {line}"),
                _ => self.comment(&format!("line {line}")),
            }],
        }
    }

    /// Body lines for a whole method, including the empty-body placeholder.
    pub(crate) fn body_lines(self, statements: &[Statement]) -> Vec<String> {
        let lines: Vec<String> = statements
            .iter()
            .flat_map(|s| self.statement_lines(s))
            .collect();
        if lines.is_empty() && self == Dialect::Python {
            return vec!["pass".to_string()];
        }
        lines
    }
}

/// Escape text for a double-quoted string literal (valid in all built-in dialects).
pub(crate) fn escape_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}
