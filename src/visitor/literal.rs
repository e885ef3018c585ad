//! Literal keyword arguments and docstrings.
use serde_json::{Map, Number, Value};
use tree_sitter::Node;

use super::node_text;
use crate::utils::{clean_docstring, parse_string_literal};

/// Keyword arguments of `call` whose values are literal constants.
///
/// Names, calls, containers, f-strings and unary expressions (`-1`) are
/// skipped without error.
pub fn literal_keywords(call: Node<'_>, source: &str) -> Map<String, Value> {
    let mut kwargs = Map::new();
    let Some(args) = call.child_by_field_name("arguments") else {
        return kwargs;
    };

    let mut cursor = args.walk();
    for child in args.named_children(&mut cursor) {
        if child.kind() != "keyword_argument" {
            continue;
        }
        let (Some(name), Some(value)) = (
            child.child_by_field_name("name"),
            child.child_by_field_name("value"),
        ) else {
            continue;
        };
        if let Some(literal) = literal_value(value, source) {
            kwargs.insert(node_text(name, source).to_string(), literal);
        }
    }

    kwargs
}

/// Evaluates a constant expression node, or `None` if it is not one.
pub fn literal_value(node: Node<'_>, source: &str) -> Option<Value> {
    match node.kind() {
        "string" => string_value(node, source).map(Value::String),
        "concatenated_string" => {
            let mut joined = String::new();
            let mut cursor = node.walk();
            for part in node.named_children(&mut cursor) {
                if part.kind() == "comment" {
                    continue;
                }
                joined.push_str(&string_value(part, source)?);
            }
            Some(Value::String(joined))
        }
        "integer" => parse_integer(node_text(node, source)).map(Value::from),
        "float" => parse_float(node_text(node, source)).map(Value::Number),
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        "none" => Some(Value::Null),
        "parenthesized_expression" => {
            let inner = node.named_child(0)?;
            if node.named_child_count() != 1 {
                return None;
            }
            literal_value(inner, source)
        }
        _ => None,
    }
}

fn string_value(node: Node<'_>, source: &str) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let mut cursor = node.walk();
    if node
        .named_children(&mut cursor)
        .any(|child| child.kind() == "interpolation")
    {
        return None;
    }
    parse_string_literal(node_text(node, source))
}

fn parse_integer(text: &str) -> Option<i64> {
    let digits = text.replace('_', "");
    let lower = digits.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()
    } else if let Some(oct) = lower.strip_prefix("0o") {
        i64::from_str_radix(oct, 8).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        i64::from_str_radix(bin, 2).ok()
    } else {
        lower.parse().ok()
    }
}

fn parse_float(text: &str) -> Option<Number> {
    let cleaned = text.replace('_', "");
    // Imaginary literals (`1j`) have no JSON counterpart.
    if cleaned.ends_with(['j', 'J']) {
        return None;
    }
    cleaned.parse::<f64>().ok().and_then(Number::from_f64)
}

/// The cleaned docstring of a function or class definition.
pub fn docstring(definition: Node<'_>, source: &str) -> Option<String> {
    let body = definition.child_by_field_name("body")?;
    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment")?;
    if first.kind() != "expression_statement" || first.named_child_count() != 1 {
        return None;
    }
    match literal_value(first.named_child(0)?, source)? {
        Value::String(doc) => Some(clean_docstring(&doc)),
        _ => None,
    }
}
