//! Syntax tree blocks produced by engines.
//!
//! The pipeline treats a [`Block`] as opaque: it only checks whether a tree
//! exists and hands it to presentation untouched.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// Byte range of a block within the template source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Document,
    Markup,
    Expression,
    Statement,
    Comment,
    /// A statement that opens a nested region closed by a matching end tag.
    Section,
}

/// A syntax tree node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub kind: BlockKind,
    #[serde(default)]
    pub span: Span,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub children: Vec<Block>,
}

impl Block {
    pub fn new(kind: BlockKind, span: Span, content: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            content: content.into(),
            children: Vec::new(),
        }
    }

    pub fn document(len: usize) -> Self {
        Self::new(BlockKind::Document, Span::new(0, len), String::new())
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Block::node_count).sum::<usize>()
    }

    /// Indented outline, one node per line, for terminal display.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(&mut out, 0);
        out
    }

    fn write_outline(&self, out: &mut String, depth: usize) {
        let preview: String = self
            .content
            .chars()
            .take(40)
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        let _ = writeln!(
            out,
            "{:indent$}{:?} [{}..{}] {}",
            "",
            self.kind,
            self.span.start,
            self.span.end(),
            preview.trim_end(),
            indent = depth * 2
        );
        for child in &self.children {
            child.write_outline(out, depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Block {
        Block::document(12).with_children(vec![
            Block::new(BlockKind::Markup, Span::new(0, 3), "<p>"),
            Block::new(BlockKind::Section, Span::new(3, 9), "if x").with_children(vec![
                Block::new(BlockKind::Expression, Span::new(5, 2), "x"),
            ]),
        ])
    }

    #[test]
    fn test_node_count() {
        assert_eq!(sample().node_count(), 4);
    }

    #[test]
    fn test_outline_indents_children() {
        let outline = sample().outline();
        let lines: Vec<&str> = outline.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Document [0..12]"));
        assert!(lines[2].starts_with("  Section [3..12] if x"));
        assert!(lines[3].starts_with("    Expression [5..7] x"));
    }

    #[test]
    fn test_outline_replaces_newlines() {
        let block = Block::new(BlockKind::Markup, Span::new(0, 4), "a\nb\n");
        assert_eq!(block.outline(), "Markup [0..4] a b\n");
    }
}
