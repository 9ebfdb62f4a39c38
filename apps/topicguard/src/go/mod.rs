//! Go front end on top of `tree-sitter-go`.
//!
//! A unit is parsed into a concrete syntax tree once. Units the grammar
//! cannot fully parse (any `ERROR` or `MISSING` node) are rejected with a
//! [`SyntaxError`] instead of being scanned partially, and so are trees
//! nested deeper than [`MAX_NESTING`], which keeps the recursive value
//! evaluation bounded.

pub mod syntax;

use thiserror::Error;
use tree_sitter::{Language, Node, Parser, Tree};

/// Deepest node nesting a unit may have.
pub const MAX_NESTING: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
/// Source position. `line` and `column` are 1-based; `column` counts chars.
pub struct Pos {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}:{}: {}", .pos.line, .pos.column, .message)]
/// A unit the Go grammar rejects.
pub struct SyntaxError {
    pub pos: Pos,
    pub message: String,
}

impl SyntaxError {
    pub fn new(pos: Pos, message: impl Into<String>) -> Self {
        Self {
            pos,
            message: message.into(),
        }
    }
}

pub fn language() -> Language {
    tree_sitter_go::LANGUAGE.into()
}

#[derive(Debug)]
/// A parsed unit: the source text (without a leading BOM) and its tree.
pub struct GoUnit<'a> {
    source: &'a str,
    tree: Tree,
}

impl<'a> GoUnit<'a> {
    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn text(&self, node: Node<'_>) -> &'a str {
        self.source
            .get(node.start_byte()..node.end_byte())
            .unwrap_or("")
    }

    /// Position of `node`'s first byte, with the column counted in chars.
    pub fn pos(&self, node: Node<'_>) -> Pos {
        let point = node.start_position();
        let offset = node.start_byte();
        let line_start = offset.saturating_sub(point.column);
        let column = self
            .source
            .get(line_start..offset)
            .map_or(point.column, |prefix| prefix.chars().count());
        Pos {
            offset,
            line: point.row + 1,
            column: column + 1,
        }
    }

    /// First `ERROR`/`MISSING` node or over-deep node, in document order.
    fn check(&self) -> Result<(), SyntaxError> {
        let mut cursor = self.tree.walk();
        let mut depth = 0usize;
        loop {
            let node = cursor.node();
            if depth > MAX_NESTING {
                return Err(SyntaxError::new(
                    self.pos(node),
                    "expression nested too deeply",
                ));
            }
            if node.is_missing() {
                return Err(SyntaxError::new(
                    self.pos(node),
                    format!("missing `{}`", node.kind()),
                ));
            }
            if node.is_error() {
                return Err(self.unexpected(node));
            }
            if cursor.goto_first_child() {
                depth += 1;
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return Ok(());
                }
                depth -= 1;
            }
        }
    }

    fn unexpected(&self, node: Node<'_>) -> SyntaxError {
        let near: String = self
            .text(node)
            .split_whitespace()
            .next()
            .unwrap_or("")
            .chars()
            .take(24)
            .collect();
        let message = if near.is_empty() {
            "syntax error".to_string()
        } else {
            format!("syntax error near `{near}`")
        };
        SyntaxError::new(self.pos(node), message)
    }
}

#[cfg(test)]
impl GoUnit<'_> {
    /// Deepest named node covering the first occurrence of `needle`.
    pub(crate) fn node_for(&self, needle: &str) -> Option<Node<'_>> {
        let start = self.source.find(needle)?;
        self.root()
            .named_descendant_for_byte_range(start, start + needle.len())
    }
}

/// Parse one unit, rejecting anything the grammar had to recover from.
pub fn parse_unit(src: &str) -> Result<GoUnit<'_>, SyntaxError> {
    // Go accepts a BOM at file start.
    let source = src.strip_prefix('\u{feff}').unwrap_or(src);
    let mut parser = Parser::new();
    parser
        .set_language(&language())
        .map_err(|err| {
            SyntaxError::new(Pos::default(), format!("Go grammar unavailable: {err}"))
        })?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| SyntaxError::new(Pos::default(), "parser produced no tree"))?;
    let unit = GoUnit { source, tree };
    unit.check()?;
    Ok(unit)
}
