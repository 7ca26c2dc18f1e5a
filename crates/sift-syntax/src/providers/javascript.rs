//! JavaScript provider for `.js`, `.jsx`, `.mjs` and `.cjs` sources.
//!
//! The grammar has no type annotations, so no mapping offers a type slot
//! and a `kind:name type` query is rejected with a missing-slot error.

use std::collections::BTreeMap;

use sift_core::NodeKind;
use tree_sitter::Node;

use super::{bare, flag, name_node, named};
use crate::language::SupportedLanguage;
use crate::provider::{
    IgnorePatterns, MappingTable, Provider, base_attributes, comment_text, default_display_name,
    field_text, node_text,
};
use crate::template::{NodeMapping, Slot, Template, TemplateNode};

/// Provider for JavaScript and JSX sources.
#[derive(Debug, Clone)]
pub struct JavaScriptProvider {
    table: MappingTable,
}

impl JavaScriptProvider {
    /// Builds the provider and its mapping table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: mapping_table(),
        }
    }
}

impl Default for JavaScriptProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for JavaScriptProvider {
    fn language(&self) -> SupportedLanguage {
        SupportedLanguage::JavaScript
    }

    fn mapping_table(&self) -> &MappingTable {
        &self.table
    }

    fn node_to_universal_kind(&self, node: Node<'_>, _source: &[u8]) -> Option<NodeKind> {
        let kind = match node.kind() {
            "function_declaration" | "generator_function_declaration" => NodeKind::Function,
            "variable_declarator" => binding_kind(node),
            "class_declaration" => NodeKind::Class,
            "method_definition" => NodeKind::Method,
            "field_definition" => NodeKind::Field,
            "import_statement" => NodeKind::Import,
            "call_expression" => NodeKind::Call,
            "decorator" => NodeKind::Decorator,
            "assignment_expression" | "augmented_assignment_expression" => NodeKind::Assignment,
            "if_statement" => NodeKind::Condition,
            "for_statement" | "for_in_statement" | "while_statement" | "do_statement" => {
                NodeKind::Loop
            }
            "statement_block" => NodeKind::Block,
            "comment" => NodeKind::Comment,
            _ => return None,
        };
        Some(kind)
    }

    fn node_display_name(&self, node: Node<'_>, source: &[u8]) -> Option<String> {
        let name = match node.kind() {
            "field_definition" => field_text(node, "property", source),
            "import_statement" => field_text(node, "source", source)
                .map(|path| path.trim_matches(|c| c == '"' || c == '\'' || c == '`')),
            "call_expression" => trailing_identifier(node.child_by_field_name("function")?, source),
            "decorator" => trailing_identifier(node.named_child(0)?, source),
            "assignment_expression" | "augmented_assignment_expression" => {
                trailing_identifier(node.child_by_field_name("left")?, source)
            }
            "comment" => return comment_text(node, source),
            _ => return default_display_name(node, source),
        };
        name.map(str::to_owned)
    }

    fn node_attributes(&self, node: Node<'_>, _source: &[u8]) -> BTreeMap<String, String> {
        let mut attributes = base_attributes(node);
        if matches!(
            node.kind(),
            "function_declaration"
                | "generator_function_declaration"
                | "variable_declarator"
                | "class_declaration"
        ) {
            attributes.insert("exported".to_owned(), flag(under_export(node)));
        }
        if node.kind() == "field_definition" {
            attributes.insert("static".to_owned(), flag(has_token(node, "static")));
        }
        attributes
    }

    fn default_ignore_patterns(&self) -> IgnorePatterns {
        let mut patterns = IgnorePatterns::default();
        patterns
            .files
            .extend(["*.min.js", "*.bundle.js", "coverage/*"].map(str::to_owned));
        patterns
    }
}

/// Arrow-function bindings count as functions; `const` bindings as
/// constants.
fn binding_kind(declarator: Node<'_>) -> NodeKind {
    let value = declarator.child_by_field_name("value").map(|value| value.kind());
    if matches!(value, Some("arrow_function" | "function_expression")) {
        return NodeKind::Function;
    }
    let keyword = declarator
        .parent()
        .filter(|parent| parent.kind() == "lexical_declaration")
        .and_then(|parent| parent.child_by_field_name("kind"));
    match keyword {
        Some(keyword) if keyword.kind() == "const" => NodeKind::Constant,
        _ => NodeKind::Variable,
    }
}

fn under_export(node: Node<'_>) -> bool {
    let parent = node.parent();
    let grandparent = parent.and_then(|parent| parent.parent());
    [parent, grandparent]
        .into_iter()
        .flatten()
        .any(|ancestor| ancestor.kind() == "export_statement")
}

fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor).any(|child| child.kind() == token)
}

fn trailing_identifier<'s>(node: Node<'_>, source: &'s [u8]) -> Option<&'s str> {
    match node.kind() {
        "member_expression" => field_text(node, "property", source),
        "call_expression" => trailing_identifier(node.child_by_field_name("function")?, source),
        _ => node_text(node, source),
    }
}

fn property() -> TemplateNode {
    TemplateNode::new("property_identifier")
        .field("property")
        .capture(Slot::Name)
}

/// A declarator under `let`/`const`, or under `var` when `keyword` is
/// `None`.
fn binding(keyword: Option<&'static str>, named_binding: bool) -> Template {
    let mut declarator = TemplateNode::new("variable_declarator").target();
    if named_binding {
        declarator = declarator.child(name_node("identifier"));
    }
    let root = match keyword {
        Some(keyword) => TemplateNode::new("lexical_declaration")
            .child(TemplateNode::token(keyword).field("kind"))
            .child(declarator),
        None => TemplateNode::new("variable_declaration").child(declarator),
    };
    Template::new(root)
}

fn function_binding(value: &'static str, named_binding: bool) -> Template {
    let mut declarator = TemplateNode::new("variable_declarator");
    if named_binding {
        declarator = declarator.child(name_node("identifier"));
    }
    Template::new(declarator.child(TemplateNode::new(value).field("value")))
}

fn call_on(callee: TemplateNode) -> Template {
    Template::new(TemplateNode::new("call_expression").child(callee))
}

fn mapping_table() -> MappingTable {
    MappingTable::new()
        .with(
            NodeMapping::new(
                NodeKind::Function,
                &["function_declaration", "generator_function_declaration", "variable_declarator"],
            )
            .template(named("function_declaration", "identifier"))
            .template(named("generator_function_declaration", "identifier"))
            .template(function_binding("arrow_function", true))
            .template(function_binding("function_expression", true))
            .wildcard(bare("function_declaration"))
            .wildcard(bare("generator_function_declaration"))
            .wildcard(function_binding("arrow_function", false))
            .wildcard(function_binding("function_expression", false)),
        )
        .with(
            NodeMapping::new(NodeKind::Class, &["class_declaration"])
                .template(Template::new(
                    TemplateNode::new("class_declaration")
                        .child(name_node("identifier"))
                        .child(
                            TemplateNode::new("class_body")
                                .field("body")
                                .members(&[NodeKind::Method, NodeKind::Field]),
                        ),
                ))
                .wildcard(bare("class_declaration")),
        )
        .with(
            NodeMapping::new(NodeKind::Method, &["method_definition"])
                .template(named("method_definition", "property_identifier"))
                .wildcard(bare("method_definition")),
        )
        .with(
            NodeMapping::new(NodeKind::Field, &["field_definition"])
                .template(Template::new(
                    TemplateNode::new("field_definition").child(property()),
                ))
                .wildcard(bare("field_definition")),
        )
        .with(
            NodeMapping::new(NodeKind::Variable, &["variable_declarator"])
                .template(binding(Some("let"), true))
                .template(binding(None, true))
                .wildcard(binding(Some("let"), false))
                .wildcard(binding(None, false))
                .multi_identifier(),
        )
        .with(
            NodeMapping::new(NodeKind::Constant, &["variable_declarator"])
                .template(binding(Some("const"), true))
                .wildcard(binding(Some("const"), false))
                .multi_identifier(),
        )
        .with(
            NodeMapping::new(NodeKind::Import, &["import_statement"])
                .template(Template::new(
                    TemplateNode::new("import_statement").child(
                        TemplateNode::new("string")
                            .field("source")
                            .child(TemplateNode::new("string_fragment").capture(Slot::Name)),
                    ),
                ))
                .wildcard(bare("import_statement")),
        )
        .with(
            NodeMapping::new(NodeKind::Call, &["call_expression"])
                .template(call_on(
                    TemplateNode::new("identifier")
                        .field("function")
                        .capture(Slot::Name),
                ))
                .template(call_on(
                    TemplateNode::new("member_expression")
                        .field("function")
                        .child(property()),
                ))
                .wildcard(bare("call_expression")),
        )
        .with(
            NodeMapping::new(NodeKind::Decorator, &["decorator"])
                .template(Template::new(
                    TemplateNode::new("decorator")
                        .child(TemplateNode::new("identifier").capture(Slot::Name)),
                ))
                .wildcard(bare("decorator")),
        )
        .with(
            NodeMapping::new(
                NodeKind::Assignment,
                &["assignment_expression", "augmented_assignment_expression"],
            )
            .template(Template::new(
                TemplateNode::new("assignment_expression").child(
                    TemplateNode::new("identifier")
                        .field("left")
                        .capture(Slot::Name),
                ),
            ))
            .template(Template::new(
                TemplateNode::new("assignment_expression").child(
                    TemplateNode::new("member_expression")
                        .field("left")
                        .child(property()),
                ),
            ))
            .template(Template::new(
                TemplateNode::new("augmented_assignment_expression").child(
                    TemplateNode::new("identifier")
                        .field("left")
                        .capture(Slot::Name),
                ),
            ))
            .multi_identifier(),
        )
        .with(
            NodeMapping::new(NodeKind::Condition, &["if_statement"])
                .template(bare("if_statement"))
                .wildcard(bare("if_statement")),
        )
        .with(
            NodeMapping::new(
                NodeKind::Loop,
                &["for_statement", "for_in_statement", "while_statement", "do_statement"],
            )
            .template(bare("for_statement"))
            .template(bare("for_in_statement"))
            .template(bare("while_statement"))
            .template(bare("do_statement"))
            .wildcard(bare("for_statement"))
            .wildcard(bare("for_in_statement"))
            .wildcard(bare("while_statement"))
            .wildcard(bare("do_statement")),
        )
        .with(
            NodeMapping::new(NodeKind::Block, &["statement_block"])
                .template(bare("statement_block"))
                .wildcard(bare("statement_block")),
        )
        .with(
            NodeMapping::new(NodeKind::Comment, &["comment"])
                .template(Template::new(TemplateNode::new("comment").capture(Slot::Name)))
                .wildcard(bare("comment")),
        )
}
