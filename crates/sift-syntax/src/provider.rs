//! The per-language provider contract.
//!
//! A [`Provider`] supplies the grammar, the [`MappingTable`] from universal
//! kinds to native templates, and the small callbacks the evaluator uses to
//! turn a native node into a uniform result. Tables are built once when the
//! provider is constructed and only read afterwards, so one provider can
//! serve any number of concurrent evaluations.

use std::collections::BTreeMap;

use sift_core::{NodeKind, Pattern, ScopeType};
use tree_sitter::Node;

use crate::language::SupportedLanguage;
use crate::position::point_to_one_based;
use crate::template::NodeMapping;

/// Immutable table from universal kinds to native mappings.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: BTreeMap<NodeKind, Vec<NodeMapping>>,
}

impl MappingTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mapping under its kind.
    #[must_use]
    pub fn with(mut self, mapping: NodeMapping) -> Self {
        self.entries.entry(mapping.kind()).or_default().push(mapping);
        self
    }

    /// Returns the mappings for `kind`, empty when the kind is unsupported.
    #[must_use]
    pub fn get(&self, kind: NodeKind) -> &[NodeMapping] {
        self.entries.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Returns the kinds with at least one mapping.
    pub fn kinds(&self) -> impl Iterator<Item = NodeKind> + '_ {
        self.entries.keys().copied()
    }

    /// Returns the first mapping whose native types include `node_type`.
    #[must_use]
    pub fn kind_for_native(&self, node_type: &str) -> Option<NodeKind> {
        self.entries
            .values()
            .flatten()
            .find(|mapping| mapping.native_node_types().contains(&node_type))
            .map(NodeMapping::kind)
    }
}

/// File and symbol globs a file-selection layer should skip by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnorePatterns {
    /// Path globs, relative to the search root.
    pub files: Vec<String>,
    /// Symbol name globs.
    pub symbols: Vec<String>,
}

impl IgnorePatterns {
    /// Returns whether `name` matches one of the symbol globs.
    ///
    /// Globs outside the single-wildcard shapes never match.
    #[must_use]
    pub fn is_ignored_symbol(&self, name: &str) -> bool {
        self.symbols
            .iter()
            .filter_map(|glob| Pattern::parse(glob))
            .any(|pattern| pattern.matches(name))
    }
}

impl Default for IgnorePatterns {
    fn default() -> Self {
        let files = [
            "*_test.*",
            "test_*.*",
            "*.test.*",
            "vendor/*",
            "node_modules/*",
            ".git/*",
            "build/*",
            "dist/*",
        ];
        let symbols = ["test*", "Test*", "*_test", "*Test", "mock*", "Mock*"];
        Self {
            files: files.iter().map(|glob| (*glob).to_owned()).collect(),
            symbols: symbols.iter().map(|glob| (*glob).to_owned()).collect(),
        }
    }
}

/// Language-specific collaborator consumed by the query engine.
///
/// Only [`language`](Self::language), [`mapping_table`](Self::mapping_table)
/// and [`node_to_universal_kind`](Self::node_to_universal_kind) are required;
/// the remaining callbacks have defaults that suit most curly-brace and
/// indentation grammars.
pub trait Provider: Send + Sync {
    /// Returns the language this provider handles.
    fn language(&self) -> SupportedLanguage;

    /// Returns the Tree-sitter grammar, or `None` if it is unavailable.
    fn language_grammar(&self) -> Option<tree_sitter::Language> {
        Some(self.language().tree_sitter_language())
    }

    /// Returns the full mapping table.
    fn mapping_table(&self) -> &MappingTable;

    /// Returns the mappings for one universal kind.
    fn node_kind_mappings(&self, kind: NodeKind) -> &[NodeMapping] {
        self.mapping_table().get(kind)
    }

    /// Classifies a native node, or returns `None` if it has no universal
    /// counterpart. `source` is available for grammars where the kind
    /// depends on identifier spelling.
    fn node_to_universal_kind(&self, node: Node<'_>, source: &[u8]) -> Option<NodeKind>;

    /// Returns the identifier shown for a node.
    fn node_display_name(&self, node: Node<'_>, source: &[u8]) -> Option<String> {
        default_display_name(node, source)
    }

    /// Returns the innermost lexical scope enclosing a node.
    fn node_enclosing_scope(&self, node: Node<'_>) -> ScopeType {
        enclosing_scope(node, default_scope_for)
    }

    /// Returns provider-specific attributes of a node.
    fn node_attributes(&self, node: Node<'_>, _source: &[u8]) -> BTreeMap<String, String> {
        base_attributes(node)
    }

    /// Returns the default file and symbol ignore globs.
    fn default_ignore_patterns(&self) -> IgnorePatterns {
        IgnorePatterns::default()
    }
}

/// Returns the UTF-8 text of a node.
#[must_use]
pub fn node_text<'s>(node: Node<'_>, source: &'s [u8]) -> Option<&'s str> {
    node.utf8_text(source).ok()
}

/// Returns the text of a node's field child.
#[must_use]
pub fn field_text<'s>(node: Node<'_>, field: &str, source: &'s [u8]) -> Option<&'s str> {
    node.child_by_field_name(field)
        .and_then(|child| node_text(child, source))
}

/// Returns the first non-empty trimmed line of a node's text.
#[must_use]
pub fn first_line(node: Node<'_>, source: &[u8]) -> Option<String> {
    node_text(node, source)?
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_owned)
}

/// Returns the `name` field text, falling back to the first line of the
/// node.
#[must_use]
pub fn default_display_name(node: Node<'_>, source: &[u8]) -> Option<String> {
    field_text(node, "name", source)
        .map(str::to_owned)
        .or_else(|| first_line(node, source))
}

/// Strips comment markers and returns the first line of comment text.
#[must_use]
pub fn comment_text(node: Node<'_>, source: &[u8]) -> Option<String> {
    let raw = node_text(node, source)?.trim();
    let unmarked = ["///", "//!", "//", "#", "/**", "/*"]
        .iter()
        .find_map(|marker| raw.strip_prefix(marker))
        .unwrap_or(raw);
    let body = unmarked.strip_suffix("*/").unwrap_or(unmarked);
    let line = body
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .find(|line| !line.is_empty())
        .unwrap_or_default();
    Some(line.to_owned())
}

/// Classifies common scope-introducing node types.
///
/// Plain `block`-like nodes return `None` so that a statement directly in a
/// function body reports the function scope.
#[must_use]
pub fn default_scope_for(node_type: &str) -> Option<ScopeType> {
    match node_type {
        "source_file" | "program" | "module" => Some(ScopeType::File),
        "class_definition" | "class_declaration" | "abstract_class_declaration"
        | "interface_declaration" | "struct_type" | "interface_type" | "struct_item"
        | "enum_item" | "trait_item" | "impl_item" => Some(ScopeType::Class),
        "function_declaration" | "method_declaration" | "func_literal"
        | "function_definition" | "lambda" | "function_item" | "closure_expression"
        | "method_definition" | "function_expression" | "arrow_function" => {
            Some(ScopeType::Function)
        }
        "if_statement" | "for_statement" | "while_statement" | "with_statement"
        | "try_statement" | "for_in_statement" | "do_statement" | "expression_switch_statement"
        | "type_switch_statement" | "select_statement" | "if_expression" | "for_expression"
        | "while_expression" | "loop_expression" | "match_expression" => Some(ScopeType::Block),
        _ => None,
    }
}

/// Walks the ancestors of `node` and returns the first scope `classify`
/// recognises, or [`ScopeType::File`].
pub fn enclosing_scope(node: Node<'_>, classify: impl Fn(&str) -> Option<ScopeType>) -> ScopeType {
    let mut current = node.parent();
    while let Some(ancestor) = current {
        if let Some(scope) = classify(ancestor.kind()) {
            return scope;
        }
        current = ancestor.parent();
    }
    ScopeType::File
}

/// Attributes every provider reports: the native node type and the
/// one-based start and end lines.
#[must_use]
pub fn base_attributes(node: Node<'_>) -> BTreeMap<String, String> {
    let (start_line, _) = point_to_one_based(node.start_position());
    let (end_line, _) = point_to_one_based(node.end_position());
    BTreeMap::from([
        ("native_type".to_owned(), node.kind().to_owned()),
        ("start_line".to_owned(), start_line.to_string()),
        ("end_line".to_owned(), end_line.to_string()),
    ])
}

/// Returns whether an identifier starts with an upper-case letter, which Go
/// treats as exported.
#[must_use]
pub fn starts_uppercase(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::template::{Slot, Template, TemplateNode};
    use rstest::rstest;

    #[test]
    fn table_returns_empty_slice_for_unmapped_kind() {
        let table = MappingTable::new().with(NodeMapping::new(NodeKind::Comment, &["comment"]));
        assert_eq!(table.get(NodeKind::Comment).len(), 1);
        assert!(table.get(NodeKind::Decorator).is_empty());
        assert_eq!(table.kind_for_native("comment"), Some(NodeKind::Comment));
    }

    #[test]
    fn table_groups_mappings_by_kind() {
        let table = MappingTable::new()
            .with(NodeMapping::new(NodeKind::Function, &["function_declaration"]).template(
                Template::new(
                    TemplateNode::new("function_declaration")
                        .child(TemplateNode::new("identifier").field("name").capture(Slot::Name)),
                ),
            ))
            .with(NodeMapping::new(NodeKind::Function, &["func_literal"]));
        assert_eq!(table.get(NodeKind::Function).len(), 2);
        assert_eq!(table.kinds().collect::<Vec<_>>(), vec![NodeKind::Function]);
    }

    #[rstest]
    #[case::prefix("testParse", true)]
    #[case::exported_prefix("TestParse", true)]
    #[case::suffix("parse_test", true)]
    #[case::mock("MockStore", true)]
    #[case::plain("Parse", false)]
    fn default_symbol_globs(#[case] name: &str, #[case] ignored: bool) {
        assert_eq!(IgnorePatterns::default().is_ignored_symbol(name), ignored);
    }

    #[test]
    fn default_file_globs_cover_vendor_trees() {
        let patterns = IgnorePatterns::default();
        assert!(patterns.files.iter().any(|glob| glob == "vendor/*"));
        assert!(patterns.files.iter().any(|glob| glob == "node_modules/*"));
    }

    #[rstest]
    #[case::line("// hello world", "hello world")]
    #[case::block("/* first\n * second */", "first")]
    #[case::doc("/// docs here", "docs here")]
    #[case::hash("# note", "note")]
    fn comment_markers_are_stripped(#[case] source: &str, #[case] expected: &str) {
        let language = if source.starts_with('#') {
            SupportedLanguage::Python
        } else {
            SupportedLanguage::Rust
        };
        let mut parser = Parser::new(language).expect("parser init");
        let parsed = parser.parse(source).expect("parse");
        let comment = parsed.root_node().child(0).expect("comment node");
        assert_eq!(
            comment_text(comment, parsed.source_bytes()).as_deref(),
            Some(expected)
        );
    }

    #[test]
    fn scope_walk_skips_plain_blocks() {
        let mut parser = Parser::new(SupportedLanguage::Go).expect("parser init");
        let parsed = parser
            .parse("package main\n\nfunc main() {\n\tx := 1\n}\n")
            .expect("parse");
        let offset = parsed.source().find("x :=").expect("statement");
        let node = parsed
            .root_node()
            .descendant_for_byte_range(offset, offset + 1)
            .expect("identifier");
        assert_eq!(enclosing_scope(node, default_scope_for), ScopeType::Function);
    }

    #[test]
    fn base_attributes_report_lines() {
        let mut parser = Parser::new(SupportedLanguage::Go).expect("parser init");
        let parsed = parser.parse("\nfunc main() {}\n").expect("parse");
        let function = parsed.root_node().named_child(0).expect("function");
        let attributes = base_attributes(function);
        assert_eq!(attributes.get("native_type").map(String::as_str), Some("function_declaration"));
        assert_eq!(attributes.get("start_line").map(String::as_str), Some("2"));
    }
}
