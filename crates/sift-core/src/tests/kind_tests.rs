//! Tests for [`NodeKind`] and [`ScopeType`].

use rstest::rstest;

use crate::{NodeKind, ScopeType};

#[rstest]
#[case::func("func", NodeKind::Function)]
#[case::def("def", NodeKind::Function)]
#[case::fn_keyword("fn", NodeKind::Function)]
#[case::struct_word("struct", NodeKind::Class)]
#[case::var("var", NodeKind::Variable)]
#[case::let_word("let", NodeKind::Variable)]
#[case::const_word("const", NodeKind::Constant)]
#[case::assign("assign", NodeKind::Assignment)]
#[case::if_word("if", NodeKind::Condition)]
#[case::while_word("while", NodeKind::Loop)]
#[case::upper_case("FUNC", NodeKind::Function)]
fn aliases_resolve_to_universal_kinds(#[case] word: &str, #[case] expected: NodeKind) {
    assert_eq!(NodeKind::from_alias(word), Some(expected));
}

#[test]
fn canonical_names_resolve_to_themselves() {
    for kind in NodeKind::all() {
        assert_eq!(NodeKind::from_alias(kind.as_str()), Some(*kind));
    }
}

#[rstest]
#[case("widget")]
#[case("")]
fn unknown_words_do_not_resolve(#[case] word: &str) {
    assert_eq!(NodeKind::from_alias(word), None);
}

#[test]
fn only_control_constructs_are_wildcard_only() {
    let wildcard_only: Vec<_> = NodeKind::all()
        .iter()
        .copied()
        .filter(|kind| kind.is_wildcard_only())
        .collect();
    assert_eq!(
        wildcard_only,
        vec![NodeKind::Condition, NodeKind::Loop, NodeKind::Block]
    );
}

#[test]
fn node_kind_serialises_as_snake_case() {
    let json = serde_json::to_string(&NodeKind::Assignment).expect("serialize");
    assert_eq!(json, "\"assignment\"");
}

#[test]
fn scope_defaults_to_file() {
    assert_eq!(ScopeType::default(), ScopeType::File);
    assert_eq!(ScopeType::Function.to_string(), "function");
}
