//! Extraction of flow declarations from one file's syntax tree.
//!
//! The walk is purely syntactic: scanned code is never imported or run.
//! Lexical context travels down the recursion as a [`Scope`] value, and
//! every visitor works on exactly one file.
pub mod literal;
pub mod scope;
pub mod shape;

use serde_json::{Map, Value};
use tracing::{debug, trace};
use tree_sitter::{Node, Tree};

use crate::model::{ObjType, ParentType};
use crate::platform::{Platform, PlatformRules};
pub use scope::{Scope, ScopeKind};
pub use shape::DeclarationShape;

pub(crate) fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    source.get(node.byte_range()).unwrap_or("")
}

/// Hands out the numeric suffix that makes declaration keys unique.
///
/// One discriminator is shared by every file of a scan, so keys stay
/// unique across files as well as within them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Discriminator {
    next: u64,
}

impl Discriminator {
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    pub fn peek(&self) -> u64 {
        self.next
    }

    fn take(&mut self) -> u64 {
        let current = self.next;
        self.next += 1;
        current
    }
}

/// One flow declaration found in a file, before catalog-level fields
/// (paths, grouping, import path) are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// `{declared id}_{discriminator}`.
    pub key: String,
    pub declared_id: String,
    pub description: String,
    pub obj_type: ObjType,
    pub obj_name: String,
    pub parent_type: ParentType,
    pub parent: String,
    pub line_number: usize,
    pub kwargs: Map<String, Value>,
    pub enclosing_function: Option<String>,
}

pub struct DeclarationVisitor<'m> {
    platform: Platform,
    rules: &'static PlatformRules,
    module: &'m str,
}

impl<'m> DeclarationVisitor<'m> {
    pub fn new(platform: Platform, module: &'m str) -> Self {
        Self {
            platform,
            rules: platform.rules(),
            module,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn visit(
        &self,
        tree: &Tree,
        source: &str,
        discriminator: &mut Discriminator,
    ) -> Vec<Declaration> {
        let mut found = Vec::new();
        self.walk(tree.root_node(), source, Scope::module(), discriminator, &mut found);
        debug!(
            module = self.module,
            platform = self.platform.as_str(),
            flows = found.len(),
            "visit complete"
        );
        found
    }

    fn walk<'a>(
        &self,
        node: Node<'a>,
        source: &'a str,
        scope: Scope<'a>,
        discriminator: &mut Discriminator,
        found: &mut Vec<Declaration>,
    ) {
        match node.kind() {
            "decorated_definition" => {
                if let Some(shape) = shape::classify_decorated(node, source, self.rules) {
                    found.push(self.declare(shape, source, scope, discriminator));
                }
                if let Some(definition) = node.child_by_field_name("definition") {
                    self.walk(definition, source, scope, discriminator, found);
                }
            }
            "function_definition" => {
                let Some(name) = node.child_by_field_name("name") else {
                    return;
                };
                if let Some(body) = node.child_by_field_name("body") {
                    let inner = scope.enter_function(node_text(name, source));
                    self.walk(body, source, inner, discriminator, found);
                }
            }
            "class_definition" => {
                let Some(name) = node.child_by_field_name("name") else {
                    return;
                };
                if let Some(body) = node.child_by_field_name("body") {
                    let inner = scope.enter_class(node_text(name, source));
                    self.walk(body, source, inner, discriminator, found);
                }
            }
            "assignment" => {
                if scope.in_function() {
                    return;
                }
                if let Some(shape) = shape::classify_assignment(node, source, self.rules) {
                    found.push(self.declare(shape, source, scope, discriminator));
                }
            }
            _ => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    self.walk(child, source, scope, discriminator, found);
                }
            }
        }
    }

    fn declare(
        &self,
        shape: DeclarationShape<'_>,
        source: &str,
        scope: Scope<'_>,
        discriminator: &mut Discriminator,
    ) -> Declaration {
        let (kwargs, obj_name, fallback_description, obj_type, anchor) = match shape {
            DeclarationShape::Decorated {
                function,
                function_name,
                marker_call,
            } => {
                let kwargs = marker_call
                    .map(|call| literal::literal_keywords(call, source))
                    .unwrap_or_default();
                let obj_type = if scope.in_class_body() {
                    ObjType::Method
                } else {
                    ObjType::Function
                };
                (
                    kwargs,
                    function_name,
                    literal::docstring(function, source),
                    obj_type,
                    function,
                )
            }
            DeclarationShape::Instantiated {
                statement,
                target,
                call,
            } => (
                literal::literal_keywords(call, source),
                target,
                None,
                ObjType::Object,
                statement,
            ),
        };

        let declared_id = string_kwarg(&kwargs, self.rules.id_keyword)
            .unwrap_or(obj_name)
            .to_string();
        let description = string_kwarg(&kwargs, self.rules.description_keyword)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .or(fallback_description)
            .unwrap_or_default();

        let (parent_type, parent) = match scope.class {
            Some(class) => (ParentType::Class, class.to_string()),
            None => (ParentType::Module, self.module.to_string()),
        };

        let key = format!("{declared_id}_{}", discriminator.take());
        trace!(key = %key, obj_name, obj_type = obj_type.as_str(), "found declaration");

        Declaration {
            key,
            declared_id,
            description,
            obj_type,
            obj_name: obj_name.to_string(),
            parent_type,
            parent,
            line_number: anchor.start_position().row + 1,
            kwargs,
            enclosing_function: scope.function.map(str::to_string),
        }
    }
}

fn string_kwarg<'k>(kwargs: &'k Map<String, Value>, key: &str) -> Option<&'k str> {
    kwargs.get(key).and_then(Value::as_str)
}

#[cfg(test)]
pub(crate) mod test_support {
    use tree_sitter::{Node, Tree};

    pub fn parse(source: &str) -> Tree {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .unwrap();
        parser.parse(source, None).unwrap()
    }

    pub fn find_first<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
        if node.kind() == kind {
            return Some(node);
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if let Some(found) = find_first(child, kind) {
                return Some(found);
            }
        }
        None
    }
}
