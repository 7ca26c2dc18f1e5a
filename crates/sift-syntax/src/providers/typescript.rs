//! TypeScript provider, using the TSX grammar so `.tsx` parses too.

use std::collections::BTreeMap;

use sift_core::NodeKind;
use tree_sitter::Node;

use super::{bare, flag, name_node, named};
use crate::language::SupportedLanguage;
use crate::provider::{
    MappingTable, Provider, base_attributes, comment_text, default_display_name, field_text,
    node_text,
};
use crate::template::{NodeMapping, Slot, Template, TemplateNode};

/// Provider for TypeScript and TSX sources.
#[derive(Debug, Clone)]
pub struct TypeScriptProvider {
    table: MappingTable,
}

impl TypeScriptProvider {
    /// Builds the provider and its mapping table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: mapping_table(),
        }
    }
}

impl Default for TypeScriptProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for TypeScriptProvider {
    fn language(&self) -> SupportedLanguage {
        SupportedLanguage::TypeScript
    }

    fn mapping_table(&self) -> &MappingTable {
        &self.table
    }

    fn node_to_universal_kind(&self, node: Node<'_>, _source: &[u8]) -> Option<NodeKind> {
        let kind = match node.kind() {
            "function_declaration" | "generator_function_declaration" => NodeKind::Function,
            "variable_declarator" => declarator_kind(node),
            "class_declaration" | "abstract_class_declaration" | "interface_declaration" => {
                NodeKind::Class
            }
            "method_definition" => NodeKind::Method,
            "public_field_definition" => NodeKind::Field,
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
            "type_alias_declaration" | "enum_declaration" => NodeKind::Type,
            _ => return None,
        };
        Some(kind)
    }

    fn node_display_name(&self, node: Node<'_>, source: &[u8]) -> Option<String> {
        let name = match node.kind() {
            "import_statement" => field_text(node, "source", source)
                .map(|path| path.trim_matches(|c| c == '"' || c == '\'' || c == '`')),
            "call_expression" => callee_name(node.child_by_field_name("function")?, source),
            "decorator" => callee_name(node.named_child(0)?, source),
            "assignment_expression" | "augmented_assignment_expression" => {
                callee_name(node.child_by_field_name("left")?, source)
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
                | "abstract_class_declaration"
                | "interface_declaration"
                | "type_alias_declaration"
                | "enum_declaration"
        ) {
            attributes.insert("exported".to_owned(), flag(is_exported(node)));
        }
        attributes
    }
}

fn declarator_kind(declarator: Node<'_>) -> NodeKind {
    let value = declarator.child_by_field_name("value").map(|value| value.kind());
    if value == Some("arrow_function") {
        return NodeKind::Function;
    }
    let is_const = declarator
        .parent()
        .filter(|parent| parent.kind() == "lexical_declaration")
        .and_then(|parent| parent.child_by_field_name("kind"))
        .is_some_and(|keyword| keyword.kind() == "const");
    if is_const {
        NodeKind::Constant
    } else {
        NodeKind::Variable
    }
}

/// Returns whether the declaration sits under an `export` statement, looking
/// through the declaration list that wraps a declarator.
fn is_exported(node: Node<'_>) -> bool {
    let mut current = node.parent();
    for _ in 0..2 {
        match current {
            Some(parent) if parent.kind() == "export_statement" => return true,
            Some(parent) => current = parent.parent(),
            None => return false,
        }
    }
    false
}

/// Returns the trailing identifier of a callee or assignment target.
fn callee_name<'s>(callee: Node<'_>, source: &'s [u8]) -> Option<&'s str> {
    match callee.kind() {
        "member_expression" => field_text(callee, "property", source),
        "call_expression" => callee_name(callee.child_by_field_name("function")?, source),
        _ => node_text(callee, source),
    }
}

/// `: T` annotation whose inner type is captured.
fn annotation() -> TemplateNode {
    TemplateNode::new("type_annotation")
        .field("type")
        .child(TemplateNode::new("_").capture(Slot::Type))
}

/// A declarator under a `let`/`const` keyword, or under `var` when `keyword`
/// is `None`.
fn declaration(keyword: Option<&'static str>, with_captures: bool) -> Template {
    let mut declarator = TemplateNode::new("variable_declarator").target();
    if with_captures {
        declarator = declarator.child(name_node("identifier")).child(annotation());
    }
    let root = match keyword {
        Some(keyword) => TemplateNode::new("lexical_declaration")
            .child(TemplateNode::token(keyword).field("kind"))
            .child(declarator),
        None => TemplateNode::new("variable_declaration").child(declarator),
    };
    Template::new(root)
}

fn arrow_function(with_name: bool) -> Template {
    let mut declarator = TemplateNode::new("variable_declarator");
    if with_name {
        declarator = declarator.child(name_node("identifier"));
    }
    Template::new(declarator.child(TemplateNode::new("arrow_function").field("value")))
}

fn class_like(node_type: &'static str) -> Template {
    Template::new(
        TemplateNode::new(node_type)
            .child(name_node("type_identifier"))
            .child(
                TemplateNode::new("class_body")
                    .field("body")
                    .members(&[NodeKind::Method, NodeKind::Field]),
            ),
    )
}

fn property_name() -> TemplateNode {
    TemplateNode::new("property_identifier")
        .field("property")
        .capture(Slot::Name)
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
            .template(arrow_function(true))
            .wildcard(bare("function_declaration"))
            .wildcard(bare("generator_function_declaration"))
            .wildcard(arrow_function(false)),
        )
        .with(
            NodeMapping::new(
                NodeKind::Class,
                &["class_declaration", "abstract_class_declaration", "interface_declaration"],
            )
            .template(class_like("class_declaration"))
            .template(class_like("abstract_class_declaration"))
            .template(named("interface_declaration", "type_identifier"))
            .wildcard(bare("class_declaration"))
            .wildcard(bare("abstract_class_declaration"))
            .wildcard(bare("interface_declaration")),
        )
        .with(
            NodeMapping::new(NodeKind::Method, &["method_definition"])
                .template(named("method_definition", "property_identifier"))
                .wildcard(bare("method_definition")),
        )
        .with(
            NodeMapping::new(NodeKind::Field, &["public_field_definition"])
                .template(Template::new(
                    TemplateNode::new("public_field_definition")
                        .child(name_node("property_identifier"))
                        .child(annotation()),
                ))
                .wildcard(bare("public_field_definition")),
        )
        .with(
            NodeMapping::new(NodeKind::Variable, &["variable_declarator"])
                .template(declaration(Some("let"), true))
                .template(declaration(None, true))
                .wildcard(declaration(Some("let"), false))
                .wildcard(declaration(None, false))
                .multi_identifier(),
        )
        .with(
            NodeMapping::new(NodeKind::Constant, &["variable_declarator"])
                .template(declaration(Some("const"), true))
                .wildcard(declaration(Some("const"), false))
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
                .template(Template::new(
                    TemplateNode::new("call_expression").child(
                        TemplateNode::new("identifier")
                            .field("function")
                            .capture(Slot::Name),
                    ),
                ))
                .template(Template::new(
                    TemplateNode::new("call_expression").child(
                        TemplateNode::new("member_expression")
                            .field("function")
                            .child(property_name()),
                    ),
                ))
                .wildcard(bare("call_expression")),
        )
        .with(
            NodeMapping::new(NodeKind::Decorator, &["decorator"])
                .template(Template::new(
                    TemplateNode::new("decorator")
                        .child(TemplateNode::new("identifier").capture(Slot::Name)),
                ))
                .template(Template::new(
                    TemplateNode::new("decorator").child(
                        TemplateNode::new("call_expression").child(
                            TemplateNode::new("identifier")
                                .field("function")
                                .capture(Slot::Name),
                        ),
                    ),
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
                        .child(property_name()),
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
        .with(
            NodeMapping::new(NodeKind::Type, &["type_alias_declaration", "enum_declaration"])
                .template(named("type_alias_declaration", "type_identifier"))
                .template(named("enum_declaration", "identifier"))
                .wildcard(bare("type_alias_declaration"))
                .wildcard(bare("enum_declaration")),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParseResult, Parser};
    use rstest::rstest;

    fn parse(source: &str) -> ParseResult {
        let mut parser = Parser::new(SupportedLanguage::TypeScript).expect("parser init");
        parser.parse(source).expect("parse")
    }

    fn first<'t>(node: Node<'t>, native: &str) -> Option<Node<'t>> {
        if node.kind() == native {
            return Some(node);
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        children.into_iter().find_map(|child| first(child, native))
    }

    #[rstest]
    #[case::let_binding("let count = 0;", NodeKind::Variable)]
    #[case::var_binding("var legacy = 1;", NodeKind::Variable)]
    #[case::const_binding("const LIMIT = 10;", NodeKind::Constant)]
    #[case::arrow("const handler = () => 1;", NodeKind::Function)]
    fn classifies_declarators(#[case] source: &str, #[case] expected: NodeKind) {
        let parsed = parse(source);
        let node = first(parsed.root_node(), "variable_declarator").expect("declarator");
        assert_eq!(
            TypeScriptProvider::new().node_to_universal_kind(node, parsed.source_bytes()),
            Some(expected)
        );
    }

    #[rstest]
    #[case::import("import { useState } from 'react';", "import_statement", "react")]
    #[case::member_call("console.log('hi');", "call_expression", "log")]
    #[case::method(
        "class Service { start(): void {} }",
        "method_definition",
        "start"
    )]
    #[case::member_assignment("this.count = 1;", "assignment_expression", "count")]
    fn display_names(#[case] source: &str, #[case] native: &str, #[case] expected: &str) {
        let parsed = parse(source);
        let node = first(parsed.root_node(), native).expect("node");
        let name = TypeScriptProvider::new().node_display_name(node, parsed.source_bytes());
        assert_eq!(name.as_deref(), Some(expected));
    }

    #[rstest]
    #[case::exported_function("export function run() {}", "function_declaration", true)]
    #[case::exported_const("export const ready = true;", "variable_declarator", true)]
    #[case::private_function("function run() {}", "function_declaration", false)]
    fn export_attribute(#[case] source: &str, #[case] native: &str, #[case] expected: bool) {
        let parsed = parse(source);
        let node = first(parsed.root_node(), native).expect("node");
        let attributes = TypeScriptProvider::new().node_attributes(node, parsed.source_bytes());
        assert_eq!(
            attributes.get("exported").map(String::as_str),
            Some(if expected { "true" } else { "false" })
        );
    }
}
