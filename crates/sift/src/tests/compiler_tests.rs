//! Tests for leaf and hierarchy compilation.

use insta::assert_snapshot;
use sift_syntax::providers::{
    GoProvider, JavaScriptProvider, PythonProvider, RustProvider, TypeScriptProvider,
};

use crate::compiler::{CompiledPattern, Predicate, compile_hierarchy, compile_leaf};
use crate::{CompileError, LeafQuery, NodeKind, Pattern, Provider, SupportedLanguage, parse};

fn leaf(text: &str) -> LeafQuery {
    let query = parse(text).unwrap_or_else(|err| panic!("{text:?} should parse: {err}"));
    query
        .as_leaf()
        .cloned()
        .unwrap_or_else(|| panic!("{text:?} should be a single leaf"))
}

fn compiled(provider: &dyn Provider, text: &str) -> CompiledPattern {
    compile_leaf(&leaf(text), provider)
        .unwrap_or_else(|err| panic!("{text:?} should compile: {err}"))
}

fn hierarchy(provider: &dyn Provider, texts: &[&str]) -> Option<CompiledPattern> {
    let leaves: Vec<LeafQuery> = texts.iter().map(|text| leaf(text)).collect();
    let levels: Vec<&LeafQuery> = leaves.iter().collect();
    compile_hierarchy(&levels, provider)
        .unwrap_or_else(|err| panic!("{texts:?} should compile: {err}"))
}

// ===== Leaves =====

#[test]
fn literal_name_uses_eq() {
    let pattern = compiled(&GoProvider::new(), "func:main");
    assert_snapshot!(pattern.text(), @r#"((function_declaration name: (identifier) @d0.name) @target (#eq? @d0.name "main"))"#);
    assert_eq!(pattern.language(), SupportedLanguage::Go);
    assert_eq!(pattern.kind(), NodeKind::Function);
    assert_eq!(pattern.pattern_count(), 1);
    assert!(pattern.has_target());
    assert!(!pattern.has_negation());
}

#[test]
fn prefix_wildcard_uses_anchored_match() {
    let pattern = compiled(&GoProvider::new(), "func:Test*");
    assert_snapshot!(pattern.text(), @r#"((function_declaration name: (identifier) @d0.name) @target (#match? @d0.name "^Test.*"))"#);
}

#[test]
fn bare_wildcard_uses_the_wildcard_template() {
    let pattern = compiled(&GoProvider::new(), "func:*");
    assert_snapshot!(pattern.text(), @"((function_declaration) @target)");
}

#[test]
fn negated_leaf_uses_negated_operator() {
    let pattern = compiled(&GoProvider::new(), "!func:main");
    assert_snapshot!(pattern.text(), @r#"((function_declaration name: (identifier) @d0.name) @target (#not-eq? @d0.name "main"))"#);
    assert!(pattern.has_negation());
}

#[test]
fn multi_identifier_kinds_use_any_operators() {
    let pattern = compiled(&GoProvider::new(), "field:Name");
    assert_snapshot!(pattern.text(), @r#"((field_declaration name: (field_identifier) @d0.name) @target (#any-eq? @d0.name "Name"))"#);
}

#[test]
fn quantified_predicates_are_kept_for_each_pattern_line() {
    let pattern = compiled(&GoProvider::new(), "var:count int");
    let captures: Vec<&str> = pattern
        .quantified_predicates(0)
        .iter()
        .map(Predicate::capture)
        .collect();
    assert_eq!(captures, vec!["d0.name", "d0.type"]);
    assert!(pattern.quantified_predicates(1).is_empty());

    let single = compiled(&GoProvider::new(), "func:main");
    assert!(single.quantified_predicates(0).is_empty());
}

#[test]
fn javascript_fields_use_the_property_field() {
    let pattern = compiled(&JavaScriptProvider::new(), "field:items");
    assert_snapshot!(pattern.text(), @r#"((field_definition property: (property_identifier) @d0.name) @target (#eq? @d0.name "items"))"#);
    assert_eq!(pattern.language(), SupportedLanguage::JavaScript);
}

#[test]
fn type_constraint_keeps_the_type_capture() {
    let pattern = compiled(&GoProvider::new(), "var:count int");
    assert_snapshot!(pattern.text(), @r#"((var_spec name: (identifier) @d0.name type: (_) @d0.type) @target (#any-eq? @d0.name "count") (#any-eq? @d0.type "int"))"#);
    assert_eq!(pattern.pattern_count(), 1);
}

#[test]
fn untyped_variable_matches_every_declaration_form() {
    let pattern = compiled(&GoProvider::new(), "var:count");
    assert_eq!(pattern.pattern_count(), 2);
    assert!(pattern.text().contains("(var_spec name: (identifier) @d0.name) @target"));
    assert!(pattern.text().contains("short_var_declaration"));
    assert!(!pattern.text().contains("@d0.type"));
}

#[test]
fn quoted_import_compares_with_quotes() {
    let pattern = compiled(&GoProvider::new(), "import:fmt");
    assert_snapshot!(pattern.text(), @r#"((import_spec path: (interpreted_string_literal) @d0.name) @target (#eq? @d0.name "\"fmt\""))"#);
}

#[test]
fn quoted_import_wildcard_anchors_outside_the_quotes() {
    let pattern = compiled(&GoProvider::new(), "import:github.com/*");
    assert_snapshot!(pattern.text(), @r#"((import_spec path: (interpreted_string_literal) @d0.name) @target (#match? @d0.name "^\"github\\.com/.*"))"#);
}

#[test]
fn rust_functions_compile() {
    let pattern = compiled(&RustProvider::new(), "fn:parse*");
    assert_snapshot!(pattern.text(), @r#"((function_item name: (identifier) @d0.name) @target (#match? @d0.name "^parse.*"))"#);
}

#[test]
fn python_functions_compile() {
    let pattern = compiled(&PythonProvider::new(), "def:*_test");
    assert_snapshot!(pattern.text(), @r#"((function_definition name: (identifier) @d0.name) @target (#match? @d0.name ".*_test$"))"#);
}

#[test]
fn every_pattern_carries_the_target_capture() {
    let provider = TypeScriptProvider::new();
    for text in ["func:main", "class:User", "method:save", "call:fetch", "import:react"] {
        let pattern = compiled(&provider, text);
        assert!(pattern.has_target(), "{text}: {}", pattern.text());
        assert_eq!(
            pattern.text().lines().count(),
            pattern.pattern_count(),
            "{text}"
        );
    }
}

// ===== Errors =====

#[test]
fn unmapped_kind_is_unsupported() {
    let err = compile_leaf(&leaf("decorator:deprecated"), &GoProvider::new())
        .expect_err("go has no decorators");
    assert!(matches!(
        err,
        CompileError::UnsupportedKind {
            kind: NodeKind::Decorator,
            ..
        }
    ));
}

#[test]
fn identifier_on_wildcard_only_kind_is_rejected() {
    let condition = LeafQuery::new(NodeKind::Condition, Pattern::literal("Nombre"));
    let err = compile_leaf(&condition, &GoProvider::new()).expect_err("wildcard only");
    assert!(matches!(err, CompileError::WildcardOnly { .. }));
}

#[test]
fn type_constraint_without_a_slot_is_reported() {
    let import = LeafQuery::new(NodeKind::Import, Pattern::literal("fmt"))
        .with_type(Pattern::literal("string"));
    let err = compile_leaf(&import, &GoProvider::new()).expect_err("imports have no type");
    assert!(matches!(
        err,
        CompileError::MissingSlot { ref slot, .. } if slot == "type"
    ));
}

// ===== Hierarchies =====

#[test]
fn struct_fields_embed_into_the_parent_pattern() {
    let pattern = hierarchy(&GoProvider::new(), &["struct:User", "field:Name"])
        .expect("fields embed in structs");
    assert_snapshot!(pattern.text(), @r#"((type_spec name: (type_identifier) @d0.name type: (struct_type (field_declaration_list (field_declaration name: (field_identifier) @d1.name) @target))) (#eq? @d0.name "User") (#any-eq? @d1.name "Name"))"#);
    assert_eq!(pattern.kind(), NodeKind::Field);
    assert_eq!(pattern.pattern_count(), 1);
}

#[test]
fn rust_struct_fields_embed() {
    let pattern = hierarchy(&RustProvider::new(), &["struct:Config", "field:port"])
        .expect("fields embed in structs");
    assert_snapshot!(pattern.text(), @r#"((struct_item name: (type_identifier) @d0.name body: (field_declaration_list (field_declaration name: (field_identifier) @d1.name) @target)) (#eq? @d0.name "Config") (#eq? @d1.name "port"))"#);
}

#[test]
fn class_members_embed_for_every_class_form() {
    let pattern = hierarchy(&TypeScriptProvider::new(), &["class:User", "method:save"])
        .expect("methods embed in classes");
    assert_eq!(pattern.pattern_count(), 2);
    assert!(pattern.text().contains("(class_declaration "));
    assert!(pattern.text().contains("(abstract_class_declaration "));
    assert!(
        pattern
            .text()
            .contains("(method_definition name: (property_identifier) @d1.name) @target")
    );
}

#[test]
fn parents_without_members_do_not_embed() {
    let pattern = hierarchy(&GoProvider::new(), &["func:main", "call:Println"]);
    assert!(pattern.is_none());
}

#[test]
fn single_level_hierarchy_compiles_as_a_leaf() {
    let pattern = hierarchy(&GoProvider::new(), &["func:main"]).expect("one level");
    assert_eq!(pattern, compiled(&GoProvider::new(), "func:main"));
}
