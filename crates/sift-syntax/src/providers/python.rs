//! Python provider.
//!
//! Python has no declaration keywords for variables, so assignments are
//! split by their left-hand side: `self.x = ...` is a field, an all-caps
//! identifier is a constant, any other identifier is a variable.

use std::collections::BTreeMap;

use sift_core::NodeKind;
use tree_sitter::Node;

use super::{bare, flag, name_node, named, type_node};
use crate::language::SupportedLanguage;
use crate::provider::{
    IgnorePatterns, MappingTable, Provider, base_attributes, comment_text, default_display_name,
    field_text, node_text,
};
use crate::template::{NodeMapping, Slot, Template, TemplateNode, TextFilter};

/// Identifiers spelled like this are treated as constants.
const CONSTANT_NAME: &str = "^[A-Z][A-Z0-9_]*$";

/// Provider for Python sources.
#[derive(Debug, Clone)]
pub struct PythonProvider {
    table: MappingTable,
}

impl PythonProvider {
    /// Builds the provider and its mapping table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: mapping_table(),
        }
    }
}

impl Default for PythonProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for PythonProvider {
    fn language(&self) -> SupportedLanguage {
        SupportedLanguage::Python
    }

    fn mapping_table(&self) -> &MappingTable {
        &self.table
    }

    fn node_to_universal_kind(&self, node: Node<'_>, source: &[u8]) -> Option<NodeKind> {
        let kind = match node.kind() {
            "function_definition" if is_method(node) => NodeKind::Method,
            "function_definition" => NodeKind::Function,
            "class_definition" => NodeKind::Class,
            "assignment" => assignment_kind(node, source),
            "augmented_assignment" => NodeKind::Assignment,
            "import_statement" | "import_from_statement" => NodeKind::Import,
            "call" => NodeKind::Call,
            "decorator" => NodeKind::Decorator,
            "if_statement" => NodeKind::Condition,
            "for_statement" | "while_statement" => NodeKind::Loop,
            "block" => NodeKind::Block,
            "comment" => NodeKind::Comment,
            _ => return None,
        };
        Some(kind)
    }

    fn node_display_name(&self, node: Node<'_>, source: &[u8]) -> Option<String> {
        let name = match node.kind() {
            "assignment" | "augmented_assignment" => {
                target_name(node.child_by_field_name("left")?, source)
            }
            "import_statement" => {
                let imported = node.child_by_field_name("name")?;
                if imported.kind() == "aliased_import" {
                    field_text(imported, "name", source)
                } else {
                    node_text(imported, source)
                }
            }
            "import_from_statement" => field_text(node, "module_name", source),
            "call" => callee_name(node.child_by_field_name("function")?, source),
            "decorator" => callee_name(node.named_child(0)?, source),
            "comment" => return comment_text(node, source),
            _ => return default_display_name(node, source),
        };
        name.map(str::to_owned)
    }

    fn node_attributes(&self, node: Node<'_>, _source: &[u8]) -> BTreeMap<String, String> {
        let mut attributes = base_attributes(node);
        if matches!(node.kind(), "function_definition" | "class_definition") {
            let decorated = node
                .parent()
                .is_some_and(|parent| parent.kind() == "decorated_definition");
            attributes.insert("decorated".to_owned(), flag(decorated));
        }
        if node.kind() == "function_definition" {
            let is_async = node.child(0).is_some_and(|first| first.kind() == "async");
            attributes.insert("async".to_owned(), flag(is_async));
        }
        attributes
    }

    fn default_ignore_patterns(&self) -> IgnorePatterns {
        let mut patterns = IgnorePatterns::default();
        patterns.files.extend(
            ["__pycache__/*", ".venv/*", "venv/*", "*.pyc"]
                .iter()
                .map(|glob| (*glob).to_owned()),
        );
        patterns
    }
}

/// Returns whether a function is defined directly in a class body, possibly
/// under decorators.
fn is_method(function: Node<'_>) -> bool {
    let mut parent = function.parent();
    if parent.is_some_and(|node| node.kind() == "decorated_definition") {
        parent = parent.and_then(|node| node.parent());
    }
    parent
        .filter(|node| node.kind() == "block")
        .and_then(|block| block.parent())
        .is_some_and(|node| node.kind() == "class_definition")
}

fn assignment_kind(assignment: Node<'_>, source: &[u8]) -> NodeKind {
    let Some(left) = assignment.child_by_field_name("left") else {
        return NodeKind::Assignment;
    };
    match left.kind() {
        "identifier" if node_text(left, source).is_some_and(is_constant_name) => {
            NodeKind::Constant
        }
        "identifier" | "pattern_list" | "tuple_pattern" => NodeKind::Variable,
        "attribute" if is_self_attribute(left, source) => NodeKind::Field,
        _ => NodeKind::Assignment,
    }
}

fn is_self_attribute(attribute: Node<'_>, source: &[u8]) -> bool {
    field_text(attribute, "object", source) == Some("self")
}

/// Mirrors the constant filter used by the templates.
fn is_constant_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|first| first.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Returns the identifier an assignment target names.
fn target_name<'s>(target: Node<'_>, source: &'s [u8]) -> Option<&'s str> {
    match target.kind() {
        "attribute" => field_text(target, "attribute", source),
        "subscript" => target_name(target.child_by_field_name("value")?, source),
        "pattern_list" | "tuple_pattern" => target_name(target.named_child(0)?, source),
        _ => node_text(target, source),
    }
}

/// Returns the trailing identifier of a callee expression.
fn callee_name<'s>(callee: Node<'_>, source: &'s [u8]) -> Option<&'s str> {
    match callee.kind() {
        "attribute" => field_text(callee, "attribute", source),
        "call" => callee_name(callee.child_by_field_name("function")?, source),
        _ => node_text(callee, source),
    }
}

fn identifier_left() -> TemplateNode {
    TemplateNode::new("identifier").field("left").capture(Slot::Name)
}

fn attribute_name() -> TemplateNode {
    TemplateNode::new("identifier")
        .field("attribute")
        .capture(Slot::Name)
}

fn method_template(decorated: bool, with_name: bool) -> Template {
    let mut function = TemplateNode::new("function_definition").target();
    if with_name {
        function = function.child(name_node("identifier"));
    }
    let member = if decorated {
        TemplateNode::new("decorated_definition").child(function.field("definition"))
    } else {
        function
    };
    Template::new(
        TemplateNode::new("class_definition")
            .child(TemplateNode::new("block").field("body").child(member)),
    )
}

fn mapping_table() -> MappingTable {
    MappingTable::new()
        .with(
            NodeMapping::new(NodeKind::Function, &["function_definition"])
                .template(named("function_definition", "identifier"))
                .wildcard(bare("function_definition")),
        )
        .with(
            NodeMapping::new(NodeKind::Method, &["function_definition"])
                .template(method_template(false, true))
                .template(method_template(true, true))
                .wildcard(method_template(false, false))
                .wildcard(method_template(true, false)),
        )
        .with(
            NodeMapping::new(NodeKind::Class, &["class_definition"])
                .template(Template::new(
                    TemplateNode::new("class_definition")
                        .child(name_node("identifier"))
                        .child(
                            TemplateNode::new("block")
                                .field("body")
                                .members(&[NodeKind::Function]),
                        ),
                ))
                .wildcard(bare("class_definition")),
        )
        .with(
            NodeMapping::new(NodeKind::Variable, &["assignment"])
                .template(Template::new(
                    TemplateNode::new("assignment")
                        .child(identifier_left().filter(TextFilter::NotMatches(CONSTANT_NAME)))
                        .child(type_node("type")),
                ))
                .template(Template::new(
                    TemplateNode::new("assignment").child(
                        TemplateNode::new("pattern_list")
                            .field("left")
                            .child(TemplateNode::new("identifier").capture(Slot::Name)),
                    ),
                ))
                .multi_identifier(),
        )
        .with(
            NodeMapping::new(NodeKind::Constant, &["assignment"]).template(Template::new(
                TemplateNode::new("assignment")
                    .child(identifier_left().filter(TextFilter::Matches(CONSTANT_NAME)))
                    .child(type_node("type")),
            )),
        )
        .with(
            NodeMapping::new(NodeKind::Field, &["assignment"]).template(Template::new(
                TemplateNode::new("assignment")
                    .child(
                        TemplateNode::new("attribute")
                            .field("left")
                            .child(
                                TemplateNode::new("identifier")
                                    .field("object")
                                    .filter(TextFilter::Equals("self")),
                            )
                            .child(attribute_name()),
                    )
                    .child(type_node("type")),
            )),
        )
        .with(
            NodeMapping::new(NodeKind::Assignment, &["augmented_assignment", "assignment"])
                .template(Template::new(
                    TemplateNode::new("augmented_assignment").child(identifier_left()),
                ))
                .template(Template::new(
                    TemplateNode::new("augmented_assignment").child(
                        TemplateNode::new("attribute")
                            .field("left")
                            .child(attribute_name()),
                    ),
                ))
                .template(Template::new(
                    TemplateNode::new("assignment").child(
                        TemplateNode::new("attribute")
                            .field("left")
                            .child(attribute_name()),
                    ),
                ))
                .template(Template::new(
                    TemplateNode::new("assignment").child(
                        TemplateNode::new("subscript").field("left").child(
                            TemplateNode::new("identifier")
                                .field("value")
                                .capture(Slot::Name),
                        ),
                    ),
                )),
        )
        .with(
            NodeMapping::new(NodeKind::Import, &["import_statement", "import_from_statement"])
                .template(Template::new(
                    TemplateNode::new("import_statement").child(name_node("dotted_name")),
                ))
                .template(Template::new(
                    TemplateNode::new("import_statement").child(
                        TemplateNode::new("aliased_import")
                            .field("name")
                            .child(name_node("dotted_name")),
                    ),
                ))
                .template(Template::new(
                    TemplateNode::new("import_from_statement").child(
                        TemplateNode::new("dotted_name")
                            .field("module_name")
                            .capture(Slot::Name),
                    ),
                ))
                .wildcard(bare("import_statement"))
                .wildcard(bare("import_from_statement")),
        )
        .with(
            NodeMapping::new(NodeKind::Call, &["call"])
                .template(Template::new(
                    TemplateNode::new("call").child(
                        TemplateNode::new("identifier")
                            .field("function")
                            .capture(Slot::Name),
                    ),
                ))
                .template(Template::new(
                    TemplateNode::new("call").child(
                        TemplateNode::new("attribute")
                            .field("function")
                            .child(attribute_name()),
                    ),
                ))
                .wildcard(bare("call")),
        )
        .with(
            NodeMapping::new(NodeKind::Decorator, &["decorator"])
                .template(Template::new(
                    TemplateNode::new("decorator")
                        .child(TemplateNode::new("identifier").capture(Slot::Name)),
                ))
                .template(Template::new(
                    TemplateNode::new("decorator")
                        .child(TemplateNode::new("attribute").child(attribute_name())),
                ))
                .template(Template::new(
                    TemplateNode::new("decorator").child(
                        TemplateNode::new("call").child(
                            TemplateNode::new("identifier")
                                .field("function")
                                .capture(Slot::Name),
                        ),
                    ),
                ))
                .wildcard(bare("decorator")),
        )
        .with(
            NodeMapping::new(NodeKind::Condition, &["if_statement"])
                .template(bare("if_statement"))
                .wildcard(bare("if_statement")),
        )
        .with(
            NodeMapping::new(NodeKind::Loop, &["for_statement", "while_statement"])
                .template(bare("for_statement"))
                .template(bare("while_statement"))
                .wildcard(bare("for_statement"))
                .wildcard(bare("while_statement")),
        )
        .with(
            NodeMapping::new(NodeKind::Block, &["block"])
                .template(bare("block"))
                .wildcard(bare("block")),
        )
        .with(
            NodeMapping::new(NodeKind::Comment, &["comment"])
                .template(Template::new(TemplateNode::new("comment").capture(Slot::Name)))
                .wildcard(bare("comment")),
        )
}
