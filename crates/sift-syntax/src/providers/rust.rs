//! Rust provider.

use std::collections::BTreeMap;

use sift_core::NodeKind;
use tree_sitter::Node;

use super::{bare, flag, name_node, named, type_node};
use crate::language::SupportedLanguage;
use crate::provider::{
    IgnorePatterns, MappingTable, Provider, base_attributes, comment_text, default_display_name,
    field_text, node_text,
};
use crate::template::{NodeMapping, Slot, Template, TemplateNode};

/// Provider for Rust sources.
#[derive(Debug, Clone)]
pub struct RustProvider {
    table: MappingTable,
}

impl RustProvider {
    /// Builds the provider and its mapping table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: mapping_table(),
        }
    }
}

impl Default for RustProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for RustProvider {
    fn language(&self) -> SupportedLanguage {
        SupportedLanguage::Rust
    }

    fn mapping_table(&self) -> &MappingTable {
        &self.table
    }

    fn node_to_universal_kind(&self, node: Node<'_>, _source: &[u8]) -> Option<NodeKind> {
        let kind = match node.kind() {
            "function_item" if is_associated(node) => NodeKind::Method,
            "function_item" => NodeKind::Function,
            "function_signature_item" => NodeKind::Method,
            "struct_item" | "enum_item" | "union_item" | "trait_item" | "impl_item" => {
                NodeKind::Class
            }
            "field_declaration" => NodeKind::Field,
            "let_declaration" => NodeKind::Variable,
            "const_item" | "static_item" => NodeKind::Constant,
            "use_declaration" => NodeKind::Import,
            "call_expression" | "macro_invocation" => NodeKind::Call,
            "assignment_expression" | "compound_assignment_expr" => NodeKind::Assignment,
            "if_expression" => NodeKind::Condition,
            "for_expression" | "while_expression" | "loop_expression" => NodeKind::Loop,
            "block" => NodeKind::Block,
            "line_comment" | "block_comment" => NodeKind::Comment,
            "attribute_item" => NodeKind::Decorator,
            "type_item" => NodeKind::Type,
            _ => return None,
        };
        Some(kind)
    }

    fn node_display_name(&self, node: Node<'_>, source: &[u8]) -> Option<String> {
        let name = match node.kind() {
            "impl_item" => field_text(node, "type", source),
            "let_declaration" => field_text(node, "pattern", source),
            "use_declaration" => field_text(node, "argument", source),
            "call_expression" => callee_name(node.child_by_field_name("function")?, source),
            "macro_invocation" => field_text(node, "macro", source),
            "assignment_expression" | "compound_assignment_expr" => {
                callee_name(node.child_by_field_name("left")?, source)
            }
            "attribute_item" => node
                .named_child(0)
                .and_then(|attribute| attribute.named_child(0))
                .and_then(|path| node_text(path, source)),
            "line_comment" | "block_comment" => return comment_text(node, source),
            _ => return default_display_name(node, source),
        };
        name.map(str::to_owned)
    }

    fn node_attributes(&self, node: Node<'_>, _source: &[u8]) -> BTreeMap<String, String> {
        let mut attributes = base_attributes(node);
        if matches!(
            node.kind(),
            "function_item"
                | "struct_item"
                | "enum_item"
                | "union_item"
                | "trait_item"
                | "field_declaration"
                | "const_item"
                | "static_item"
                | "type_item"
        ) {
            let mut cursor = node.walk();
            let public = node
                .children(&mut cursor)
                .any(|child| child.kind() == "visibility_modifier");
            attributes.insert("public".to_owned(), flag(public));
        }
        attributes
    }

    fn default_ignore_patterns(&self) -> IgnorePatterns {
        let mut patterns = IgnorePatterns::default();
        patterns.files.push("target/*".to_owned());
        patterns
    }
}

/// Returns whether a function is declared inside an `impl` or `trait` body.
fn is_associated(function: Node<'_>) -> bool {
    function
        .parent()
        .filter(|parent| parent.kind() == "declaration_list")
        .and_then(|list| list.parent())
        .is_some_and(|owner| matches!(owner.kind(), "impl_item" | "trait_item"))
}

/// Returns the trailing identifier of a callee or assignment target.
fn callee_name<'s>(callee: Node<'_>, source: &'s [u8]) -> Option<&'s str> {
    match callee.kind() {
        "scoped_identifier" => field_text(callee, "name", source),
        "field_expression" => field_text(callee, "field", source),
        "generic_function" => callee_name(callee.child_by_field_name("function")?, source),
        _ => node_text(callee, source),
    }
}

fn associated_function(owner: &'static str, member: &'static str, with_name: bool) -> Template {
    let mut function = TemplateNode::new(member).target();
    if with_name {
        function = function.child(name_node("identifier"));
    }
    Template::new(
        TemplateNode::new(owner)
            .child(TemplateNode::new("declaration_list").field("body").child(function)),
    )
}

fn typed_item(node_type: &'static str, name_type: &'static str) -> Template {
    Template::new(
        TemplateNode::new(node_type)
            .child(name_node(name_type))
            .child(type_node("type")),
    )
}

fn field_name() -> TemplateNode {
    TemplateNode::new("field_identifier")
        .field("field")
        .capture(Slot::Name)
}

fn mapping_table() -> MappingTable {
    MappingTable::new()
        .with(
            NodeMapping::new(NodeKind::Function, &["function_item"])
                .template(named("function_item", "identifier"))
                .wildcard(bare("function_item")),
        )
        .with(
            NodeMapping::new(NodeKind::Method, &["function_item", "function_signature_item"])
                .template(associated_function("impl_item", "function_item", true))
                .template(associated_function("trait_item", "function_item", true))
                .template(associated_function("trait_item", "function_signature_item", true))
                .wildcard(associated_function("impl_item", "function_item", false))
                .wildcard(associated_function("trait_item", "function_item", false))
                .wildcard(associated_function("trait_item", "function_signature_item", false)),
        )
        .with(
            NodeMapping::new(
                NodeKind::Class,
                &["struct_item", "enum_item", "union_item", "trait_item", "impl_item"],
            )
            .template(Template::new(
                TemplateNode::new("struct_item")
                    .child(name_node("type_identifier"))
                    .child(
                        TemplateNode::new("field_declaration_list")
                            .field("body")
                            .members(&[NodeKind::Field]),
                    ),
            ))
            .template(named("struct_item", "type_identifier"))
            .template(named("enum_item", "type_identifier"))
            .template(named("union_item", "type_identifier"))
            .template(named("trait_item", "type_identifier"))
            .template(Template::new(
                TemplateNode::new("impl_item")
                    .child(
                        TemplateNode::new("type_identifier")
                            .field("type")
                            .capture(Slot::Name),
                    )
                    .child(
                        TemplateNode::new("declaration_list")
                            .field("body")
                            .members(&[NodeKind::Function]),
                    ),
            ))
            .wildcard(bare("struct_item"))
            .wildcard(bare("enum_item"))
            .wildcard(bare("union_item"))
            .wildcard(bare("trait_item"))
            .wildcard(bare("impl_item")),
        )
        .with(
            NodeMapping::new(NodeKind::Field, &["field_declaration"])
                .template(typed_item("field_declaration", "field_identifier"))
                .wildcard(bare("field_declaration")),
        )
        .with(
            NodeMapping::new(NodeKind::Variable, &["let_declaration"])
                .template(Template::new(
                    TemplateNode::new("let_declaration")
                        .child(
                            TemplateNode::new("identifier")
                                .field("pattern")
                                .capture(Slot::Name),
                        )
                        .child(type_node("type")),
                ))
                .wildcard(bare("let_declaration")),
        )
        .with(
            NodeMapping::new(NodeKind::Constant, &["const_item", "static_item"])
                .template(typed_item("const_item", "identifier"))
                .template(typed_item("static_item", "identifier"))
                .wildcard(bare("const_item"))
                .wildcard(bare("static_item")),
        )
        .with(
            NodeMapping::new(NodeKind::Import, &["use_declaration"])
                .template(Template::new(
                    TemplateNode::new("use_declaration").child(
                        TemplateNode::new("_")
                            .field("argument")
                            .capture(Slot::Name),
                    ),
                ))
                .wildcard(bare("use_declaration")),
        )
        .with(
            NodeMapping::new(NodeKind::Call, &["call_expression", "macro_invocation"])
                .template(Template::new(
                    TemplateNode::new("call_expression").child(
                        TemplateNode::new("identifier")
                            .field("function")
                            .capture(Slot::Name),
                    ),
                ))
                .template(Template::new(
                    TemplateNode::new("call_expression").child(
                        TemplateNode::new("scoped_identifier")
                            .field("function")
                            .child(name_node("identifier")),
                    ),
                ))
                .template(Template::new(
                    TemplateNode::new("call_expression").child(
                        TemplateNode::new("field_expression")
                            .field("function")
                            .child(field_name()),
                    ),
                ))
                .template(Template::new(
                    TemplateNode::new("macro_invocation").child(
                        TemplateNode::new("identifier")
                            .field("macro")
                            .capture(Slot::Name),
                    ),
                ))
                .wildcard(bare("call_expression"))
                .wildcard(bare("macro_invocation")),
        )
        .with(
            NodeMapping::new(
                NodeKind::Assignment,
                &["assignment_expression", "compound_assignment_expr"],
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
                    TemplateNode::new("field_expression")
                        .field("left")
                        .child(field_name()),
                ),
            ))
            .template(Template::new(
                TemplateNode::new("compound_assignment_expr").child(
                    TemplateNode::new("identifier")
                        .field("left")
                        .capture(Slot::Name),
                ),
            ))
            .wildcard(bare("assignment_expression"))
            .wildcard(bare("compound_assignment_expr")),
        )
        .with(
            NodeMapping::new(NodeKind::Condition, &["if_expression"])
                .template(bare("if_expression"))
                .wildcard(bare("if_expression")),
        )
        .with(
            NodeMapping::new(
                NodeKind::Loop,
                &["for_expression", "while_expression", "loop_expression"],
            )
            .template(bare("for_expression"))
            .template(bare("while_expression"))
            .template(bare("loop_expression"))
            .wildcard(bare("for_expression"))
            .wildcard(bare("while_expression"))
            .wildcard(bare("loop_expression")),
        )
        .with(
            NodeMapping::new(NodeKind::Block, &["block"])
                .template(bare("block"))
                .wildcard(bare("block")),
        )
        .with(
            NodeMapping::new(NodeKind::Comment, &["line_comment", "block_comment"])
                .template(Template::new(
                    TemplateNode::new("line_comment").capture(Slot::Name),
                ))
                .template(Template::new(
                    TemplateNode::new("block_comment").capture(Slot::Name),
                ))
                .wildcard(bare("line_comment"))
                .wildcard(bare("block_comment")),
        )
        .with(
            NodeMapping::new(NodeKind::Decorator, &["attribute_item"])
                .template(Template::new(
                    TemplateNode::new("attribute_item").child(
                        TemplateNode::new("attribute")
                            .child(TemplateNode::new("identifier").capture(Slot::Name)),
                    ),
                ))
                .wildcard(bare("attribute_item")),
        )
        .with(
            NodeMapping::new(NodeKind::Type, &["type_item"])
                .template(named("type_item", "type_identifier"))
                .wildcard(bare("type_item")),
        )
}
