//! Tree-sitter Python parsing.
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

use crate::error::ParserError;

pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    pub fn new() -> Result<Self, ParserError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|_| ParserError::language_setup_failed("python"))?;
        Ok(Self { parser })
    }

    /// Parses `source`, rejecting trees that contain syntax errors.
    ///
    /// Tree-sitter recovers from errors and would still hand back a tree;
    /// a file that is not valid Python contributes nothing instead. The
    /// grammar also accepts Python 2 `print`/`exec` statements, which
    /// Python 3 rejects, so those count as syntax errors too.
    pub fn parse(&mut self, source: &str, path: &Path) -> Result<Tree, ParserError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ParserError::parse_failed(path))?;

        if let Some(node) = first_invalid(tree.root_node()) {
            let message = if node.is_missing() {
                format!("missing {}", node.kind())
            } else if let Some(keyword) = legacy_keyword(node) {
                format!("Python 2 {keyword} statement")
            } else {
                "invalid syntax".to_string()
            };
            let position = node.start_position();
            return Err(ParserError::syntax_error(
                path,
                position.row + 1,
                position.column + 1,
                message,
            ));
        }
        if tree.root_node().has_error() {
            return Err(ParserError::syntax_error(path, 1, 1, "invalid syntax"));
        }

        Ok(tree)
    }
}

fn legacy_keyword(node: Node<'_>) -> Option<&'static str> {
    match node.kind() {
        "print_statement" => Some("print"),
        "exec_statement" => Some("exec"),
        _ => None,
    }
}

/// First node, in source order, that makes the file invalid Python 3.
fn first_invalid(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() || legacy_keyword(node).is_some() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_invalid(child) {
            return Some(found);
        }
    }
    None
}
