//! Pure classification of syntax nodes into declaration shapes.
use tree_sitter::Node;

use super::node_text;
use crate::platform::PlatformRules;

/// A recognized flow declaration, before any metadata is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationShape<'a> {
    /// `@flow(...)` / `@dag` on a function definition.
    Decorated {
        function: Node<'a>,
        function_name: &'a str,
        /// The marker call, absent for a bare `@flow`.
        marker_call: Option<Node<'a>>,
    },
    /// `name = DAG(...)`.
    Instantiated {
        statement: Node<'a>,
        target: &'a str,
        call: Node<'a>,
    },
}

/// Final segment of a name reference or attribute access: `DAG` for
/// both `DAG` and `airflow.models.DAG`.
pub fn reference_name<'a>(node: Node<'a>, source: &'a str) -> Option<&'a str> {
    match node.kind() {
        "identifier" => Some(node_text(node, source)),
        "attribute" => Some(node_text(node.child_by_field_name("attribute")?, source)),
        _ => None,
    }
}

/// Callee name of a call expression.
pub fn call_name<'a>(call: Node<'a>, source: &'a str) -> Option<&'a str> {
    if call.kind() != "call" {
        return None;
    }
    reference_name(call.child_by_field_name("function")?, source)
}

/// Classifies a `decorated_definition` carrying the platform's marker.
///
/// The first matching decorator wins; decorated classes never match.
pub fn classify_decorated<'a>(
    node: Node<'a>,
    source: &'a str,
    rules: &PlatformRules,
) -> Option<DeclarationShape<'a>> {
    if node.kind() != "decorated_definition" {
        return None;
    }
    let function = node.child_by_field_name("definition")?;
    if function.kind() != "function_definition" {
        return None;
    }
    let function_name = node_text(function.child_by_field_name("name")?, source);

    let mut cursor = node.walk();
    let marker_call = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "decorator")
        .filter_map(|decorator| decorator.named_child(0))
        .find_map(|expr| match_marker(expr, source, rules.decorator))?;

    Some(DeclarationShape::Decorated {
        function,
        function_name,
        marker_call,
    })
}

/// `Some(Some(call))` for `@marker(...)`, `Some(None)` for a bare `@marker`.
fn match_marker<'a>(
    expr: Node<'a>,
    source: &'a str,
    marker: &str,
) -> Option<Option<Node<'a>>> {
    if expr.kind() == "call" {
        let name = call_name(expr, source)?;
        return (name == marker).then_some(Some(expr));
    }
    let name = reference_name(expr, source)?;
    (name == marker).then_some(None)
}

/// Classifies a simple `name = Constructor(...)` assignment.
///
/// Annotated, chained, augmented and tuple-target assignments never match.
pub fn classify_assignment<'a>(
    node: Node<'a>,
    source: &'a str,
    rules: &PlatformRules,
) -> Option<DeclarationShape<'a>> {
    let constructor = rules.constructor?;
    if node.kind() != "assignment" || node.child_by_field_name("type").is_some() {
        return None;
    }
    let left = node.child_by_field_name("left")?;
    if left.kind() != "identifier" {
        return None;
    }
    let call = node.child_by_field_name("right")?;
    if call_name(call, source)? != constructor {
        return None;
    }

    Some(DeclarationShape::Instantiated {
        statement: node,
        target: node_text(left, source),
        call,
    })
}
