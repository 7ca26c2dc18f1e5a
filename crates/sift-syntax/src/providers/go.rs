//! Go provider.

use std::collections::BTreeMap;

use sift_core::NodeKind;
use tree_sitter::Node;

use super::{bare, flag, name_node, named, type_node};
use crate::language::SupportedLanguage;
use crate::provider::{
    MappingTable, Provider, base_attributes, comment_text, default_display_name, field_text,
    node_text, starts_uppercase,
};
use crate::template::{NodeMapping, Slot, Template, TemplateNode};

/// Non-struct, non-interface type expressions a `type` declaration can name.
const ALIASED_TYPES: &[&str] = &[
    "type_identifier",
    "qualified_type",
    "generic_type",
    "pointer_type",
    "slice_type",
    "array_type",
    "map_type",
    "channel_type",
    "function_type",
];

/// Provider for Go sources.
#[derive(Debug, Clone)]
pub struct GoProvider {
    table: MappingTable,
}

impl GoProvider {
    /// Builds the provider and its mapping table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: mapping_table(),
        }
    }
}

impl Default for GoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for GoProvider {
    fn language(&self) -> SupportedLanguage {
        SupportedLanguage::Go
    }

    fn mapping_table(&self) -> &MappingTable {
        &self.table
    }

    fn node_to_universal_kind(&self, node: Node<'_>, _source: &[u8]) -> Option<NodeKind> {
        let kind = match node.kind() {
            "function_declaration" => NodeKind::Function,
            "method_declaration" => NodeKind::Method,
            "var_spec" | "short_var_declaration" => NodeKind::Variable,
            "const_spec" => NodeKind::Constant,
            "type_spec" => match node.child_by_field_name("type").map(|ty| ty.kind()) {
                Some("struct_type" | "interface_type") => NodeKind::Class,
                _ => NodeKind::Type,
            },
            "type_alias" => NodeKind::Type,
            "field_declaration" => NodeKind::Field,
            "import_spec" => NodeKind::Import,
            "call_expression" => NodeKind::Call,
            "assignment_statement" => NodeKind::Assignment,
            "if_statement" => NodeKind::Condition,
            "for_statement" => NodeKind::Loop,
            "block" => NodeKind::Block,
            "comment" => NodeKind::Comment,
            _ => return None,
        };
        Some(kind)
    }

    fn node_display_name(&self, node: Node<'_>, source: &[u8]) -> Option<String> {
        match node.kind() {
            "import_spec" => {
                let path = field_text(node, "path", source)?;
                Some(path.trim_matches(|c| c == '"' || c == '`').to_owned())
            }
            "short_var_declaration" | "assignment_statement" => node
                .child_by_field_name("left")
                .and_then(|left| left.named_child(0))
                .and_then(|first| node_text(first, source))
                .map(str::to_owned),
            "call_expression" => {
                let function = node.child_by_field_name("function")?;
                let callee = if function.kind() == "selector_expression" {
                    function.child_by_field_name("field")?
                } else {
                    function
                };
                node_text(callee, source).map(str::to_owned)
            }
            "comment" => comment_text(node, source),
            _ => default_display_name(node, source),
        }
    }

    fn node_attributes(&self, node: Node<'_>, source: &[u8]) -> BTreeMap<String, String> {
        let mut attributes = base_attributes(node);
        if matches!(
            node.kind(),
            "function_declaration"
                | "method_declaration"
                | "type_spec"
                | "type_alias"
                | "var_spec"
                | "const_spec"
                | "field_declaration"
        ) && let Some(name) = field_text(node, "name", source)
        {
            attributes.insert("exported".to_owned(), flag(starts_uppercase(name)));
        }
        if node.kind() == "method_declaration"
            && let Some(receiver) = receiver_type(node, source)
        {
            attributes.insert("receiver".to_owned(), receiver);
        }
        attributes
    }
}

/// Returns the receiver type of a method, without a leading `*`.
fn receiver_type(method: Node<'_>, source: &[u8]) -> Option<String> {
    let parameter = method.child_by_field_name("receiver")?.named_child(0)?;
    let text = field_text(parameter, "type", source)?;
    Some(text.trim_start_matches('*').to_owned())
}

fn mapping_table() -> MappingTable {
    MappingTable::new()
        .with(
            NodeMapping::new(NodeKind::Function, &["function_declaration"])
                .template(named("function_declaration", "identifier"))
                .wildcard(bare("function_declaration")),
        )
        .with(
            NodeMapping::new(NodeKind::Method, &["method_declaration"])
                .template(named("method_declaration", "field_identifier"))
                .wildcard(bare("method_declaration")),
        )
        .with(
            NodeMapping::new(NodeKind::Variable, &["var_spec", "short_var_declaration"])
                .template(Template::new(
                    TemplateNode::new("var_spec")
                        .child(name_node("identifier"))
                        .child(type_node("type")),
                ))
                .template(Template::new(
                    TemplateNode::new("short_var_declaration").child(
                        TemplateNode::new("expression_list")
                            .field("left")
                            .child(TemplateNode::new("identifier").capture(Slot::Name)),
                    ),
                ))
                .wildcard(bare("var_spec"))
                .wildcard(bare("short_var_declaration"))
                .multi_identifier(),
        )
        .with(
            NodeMapping::new(NodeKind::Constant, &["const_spec"])
                .template(Template::new(
                    TemplateNode::new("const_spec")
                        .child(name_node("identifier"))
                        .child(type_node("type")),
                ))
                .wildcard(bare("const_spec"))
                .multi_identifier(),
        )
        .with(
            NodeMapping::new(NodeKind::Class, &["type_spec"])
                .template(Template::new(
                    TemplateNode::new("type_spec")
                        .child(name_node("type_identifier"))
                        .child(
                            TemplateNode::new("struct_type").field("type").child(
                                TemplateNode::new("field_declaration_list")
                                    .members(&[NodeKind::Field]),
                            ),
                        ),
                ))
                .template(Template::new(
                    TemplateNode::new("type_spec")
                        .child(name_node("type_identifier"))
                        .child(TemplateNode::new("interface_type").field("type")),
                ))
                .wildcard(Template::new(
                    TemplateNode::new("type_spec")
                        .child(TemplateNode::new("struct_type").field("type")),
                ))
                .wildcard(Template::new(
                    TemplateNode::new("type_spec")
                        .child(TemplateNode::new("interface_type").field("type")),
                )),
        )
        .with(
            NodeMapping::new(NodeKind::Type, &["type_spec", "type_alias"])
                .template(Template::new(
                    TemplateNode::new("type_spec")
                        .child(name_node("type_identifier"))
                        .child(TemplateNode::any_of(ALIASED_TYPES).field("type")),
                ))
                .template(named("type_alias", "type_identifier")),
        )
        .with(
            NodeMapping::new(NodeKind::Field, &["field_declaration"])
                .template(Template::new(
                    TemplateNode::new("field_declaration")
                        .child(name_node("field_identifier"))
                        .child(type_node("type")),
                ))
                .wildcard(bare("field_declaration"))
                .multi_identifier(),
        )
        .with(
            NodeMapping::new(NodeKind::Import, &["import_spec"])
                .template(
                    Template::new(
                        TemplateNode::new("import_spec").child(
                            TemplateNode::new("interpreted_string_literal")
                                .field("path")
                                .capture(Slot::Name),
                        ),
                    )
                    .quoted_name(),
                )
                .wildcard(bare("import_spec")),
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
                        TemplateNode::new("selector_expression").field("function").child(
                            TemplateNode::new("field_identifier")
                                .field("field")
                                .capture(Slot::Name),
                        ),
                    ),
                ))
                .wildcard(bare("call_expression")),
        )
        .with(
            NodeMapping::new(NodeKind::Assignment, &["assignment_statement"])
                .template(Template::new(
                    TemplateNode::new("assignment_statement").child(
                        TemplateNode::new("expression_list")
                            .field("left")
                            .child(TemplateNode::new("identifier").capture(Slot::Name)),
                    ),
                ))
                .template(Template::new(
                    TemplateNode::new("assignment_statement").child(
                        TemplateNode::new("expression_list").field("left").child(
                            TemplateNode::new("selector_expression").child(
                                TemplateNode::new("field_identifier")
                                    .field("field")
                                    .capture(Slot::Name),
                            ),
                        ),
                    ),
                ))
                .wildcard(bare("assignment_statement"))
                .multi_identifier(),
        )
        .with(
            NodeMapping::new(NodeKind::Condition, &["if_statement"])
                .template(bare("if_statement"))
                .wildcard(bare("if_statement")),
        )
        .with(
            NodeMapping::new(NodeKind::Loop, &["for_statement"])
                .template(bare("for_statement"))
                .wildcard(bare("for_statement")),
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
