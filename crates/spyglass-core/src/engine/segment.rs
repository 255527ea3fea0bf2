//! Tag segmentation for Tera-style templates.
//!
//! Splits source into markup, `{{ expression }}`, `{% statement %}` and
//! `{# comment #}` blocks, nesting section statements (`if`, `for`, ...) up to
//! their matching `end*` tag. Structural problems are collected as messages;
//! the tree is always produced.

use crate::syntax::{Block, BlockKind, Span};

const SECTION_KEYWORDS: &[&str] = &["if", "for", "block", "macro", "filter", "raw"];

/// Segmented template: the syntax tree plus any structural errors.
#[derive(Debug)]
pub(crate) struct Segmented {
    pub document: Block,
    pub errors: Vec<String>,
}

struct OpenSection {
    block: Block,
    keyword: String,
}

pub(crate) fn segment(source: &str) -> Segmented {
    let mut root: Vec<Block> = Vec::new();
    let mut stack: Vec<OpenSection> = Vec::new();
    let mut errors = Vec::new();
    let mut pos = 0;

    while pos < source.len() {
        let Some((open, kind, close)) = next_tag(source, pos) else {
            push(&mut root, &mut stack, markup(source, pos, source.len()));
            break;
        };

        if open > pos {
            push(&mut root, &mut stack, markup(source, pos, open));
        }

        let inner_start = open + 2;
        let (inner_end, tag_end) = match source[inner_start..].find(close) {
            Some(rel) => (inner_start + rel, inner_start + rel + 2),
            None => {
                errors.push(format!(
                    "unclosed tag at line {}: expected `{close}`",
                    line_of(source, open)
                ));
                (source.len(), source.len())
            }
        };

        let content = tag_content(&source[inner_start..inner_end]);
        let span = Span::new(open, tag_end - open);

        match kind {
            BlockKind::Statement => {
                let keyword = content.split_whitespace().next().unwrap_or_default();
                if SECTION_KEYWORDS.contains(&keyword) {
                    stack.push(OpenSection {
                        block: Block::new(BlockKind::Section, span, content.clone()),
                        keyword: keyword.to_string(),
                    });
                } else if let Some(closed) = keyword.strip_prefix("end") {
                    close_section(
                        source,
                        &mut root,
                        &mut stack,
                        &mut errors,
                        closed,
                        Block::new(BlockKind::Statement, span, content.clone()),
                    );
                } else {
                    push(&mut root, &mut stack, Block::new(kind, span, content));
                }
            }
            _ => push(&mut root, &mut stack, Block::new(kind, span, content)),
        }

        pos = tag_end;
    }

    while let Some(open) = stack.pop() {
        errors.push(format!(
            "unclosed `{}` opened at line {}",
            open.keyword,
            line_of(source, open.block.span.start)
        ));
        push(&mut root, &mut stack, open.block);
    }

    Segmented {
        document: Block::document(source.len()).with_children(root),
        errors,
    }
}

/// 1-based line number of a byte offset.
pub(crate) fn line_of(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())].matches('\n').count() + 1
}

fn next_tag(source: &str, from: usize) -> Option<(usize, BlockKind, &'static str)> {
    let rest = &source[from..];
    [
        ("{{", BlockKind::Expression, "}}"),
        ("{%", BlockKind::Statement, "%}"),
        ("{#", BlockKind::Comment, "#}"),
    ]
    .into_iter()
    .filter_map(|(open, kind, close)| rest.find(open).map(|i| (from + i, kind, close)))
    .min_by_key(|(offset, _, _)| *offset)
}

/// Tag body without delimiters. A `-` only counts as a whitespace-control
/// marker when it touches the delimiter.
fn tag_content(raw: &str) -> String {
    let raw = raw.strip_prefix('-').unwrap_or(raw);
    let raw = raw.strip_suffix('-').unwrap_or(raw);
    raw.trim().to_string()
}

fn markup(source: &str, start: usize, end: usize) -> Block {
    Block::new(
        BlockKind::Markup,
        Span::new(start, end - start),
        &source[start..end],
    )
}

fn push(root: &mut Vec<Block>, stack: &mut [OpenSection], block: Block) {
    match stack.last_mut() {
        Some(open) => {
            open.block.span.len = block.span.end() - open.block.span.start;
            open.block.children.push(block);
        }
        None => root.push(block),
    }
}

fn close_section(
    source: &str,
    root: &mut Vec<Block>,
    stack: &mut Vec<OpenSection>,
    errors: &mut Vec<String>,
    closed: &str,
    end_tag: Block,
) {
    let matches_top = stack.last().is_some_and(|open| open.keyword == closed);
    if !matches_top {
        errors.push(format!(
            "unexpected `end{closed}` at line {}",
            line_of(source, end_tag.span.start)
        ));
        push(root, stack, end_tag);
        return;
    }

    if let Some(mut open) = stack.pop() {
        open.block.span.len = end_tag.span.end() - open.block.span.start;
        open.block.children.push(end_tag);
        push(root, stack, open.block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(blocks: &[Block]) -> Vec<BlockKind> {
        blocks.iter().map(|b| b.kind).collect()
    }

    #[test]
    fn test_plain_markup() {
        let s = segment("<p>hello</p>");
        assert!(s.errors.is_empty());
        assert_eq!(kinds(&s.document.children), vec![BlockKind::Markup]);
        assert_eq!(s.document.children[0].content, "<p>hello</p>");
    }

    #[test]
    fn test_expression_and_comment() {
        let s = segment("Hi {{ name }}!{# note #}");
        assert!(s.errors.is_empty());
        assert_eq!(
            kinds(&s.document.children),
            vec![
                BlockKind::Markup,
                BlockKind::Expression,
                BlockKind::Markup,
                BlockKind::Comment
            ]
        );
        assert_eq!(s.document.children[1].content, "name");
        assert_eq!(s.document.children[1].span, Span::new(3, 10));
        assert_eq!(s.document.children[3].content, "note");
    }

    #[test]
    fn test_nested_sections() {
        let src = "{% for u in users %}{% if u.admin %}*{% endif %}{{ u.name }}{% endfor %}";
        let s = segment(src);
        assert!(s.errors.is_empty(), "{:?}", s.errors);
        assert_eq!(s.document.children.len(), 1);

        let for_block = &s.document.children[0];
        assert_eq!(for_block.kind, BlockKind::Section);
        assert_eq!(for_block.content, "for u in users");
        assert_eq!(for_block.span, Span::new(0, src.len()));
        assert_eq!(
            kinds(&for_block.children),
            vec![BlockKind::Section, BlockKind::Expression, BlockKind::Statement]
        );
        assert_eq!(for_block.children[0].children.len(), 2);
    }

    #[test]
    fn test_whitespace_control_markers_stripped() {
        let s = segment("{%- if x -%}y{%- endif -%}");
        assert!(s.errors.is_empty());
        assert_eq!(s.document.children[0].content, "if x");
    }

    #[test]
    fn test_minus_inside_tag_is_kept() {
        let s = segment("{{ -1 }}{{- total - 1 -}}{{ n- }}");
        assert!(s.errors.is_empty());
        let contents: Vec<&str> = s
            .document
            .children
            .iter()
            .map(|b| b.content.as_str())
            .collect();
        assert_eq!(contents, vec!["-1", "total - 1", "n-"]);
    }

    #[test]
    fn test_else_stays_inside_section() {
        let s = segment("{% if a %}1{% else %}2{% endif %}");
        assert!(s.errors.is_empty());
        let section = &s.document.children[0];
        assert_eq!(section.children[1].content, "else");
        assert_eq!(section.children.len(), 4);
    }

    #[test]
    fn test_unclosed_section_reported() {
        let s = segment("a\n{% if x %}b");
        assert_eq!(s.errors, vec!["unclosed `if` opened at line 2"]);
        assert_eq!(s.document.children[1].kind, BlockKind::Section);
    }

    #[test]
    fn test_unexpected_end_reported() {
        let s = segment("{% endfor %}");
        assert_eq!(s.errors, vec!["unexpected `endfor` at line 1"]);
        assert_eq!(s.document.children.len(), 1);
    }

    #[test]
    fn test_unclosed_tag_reported() {
        let s = segment("x {{ name");
        assert_eq!(s.errors.len(), 1);
        assert!(s.errors[0].contains("unclosed tag at line 1"));
        assert_eq!(s.document.children[1].content, "name");
    }

    #[test]
    fn test_line_of() {
        assert_eq!(line_of("a\nb\nc", 0), 1);
        assert_eq!(line_of("a\nb\nc", 2), 2);
        assert_eq!(line_of("a\nb\nc", 4), 3);
    }
}
