//! Tests for the query AST.

use rstest::rstest;

use crate::{LeafQuery, NodeKind, Operator, Pattern, Query, ScopeType, WildcardShape};

fn leaf(kind: NodeKind, pattern: &str) -> Query {
    Query::leaf(LeafQuery::new(
        kind,
        Pattern::parse(pattern).expect("valid pattern"),
    ))
}

#[rstest]
#[case::any("*", Pattern::Any)]
#[case::literal("main", Pattern::literal("main"))]
#[case::prefix("Test*", Pattern::Wildcard(WildcardShape::Prefix("Test".to_owned())))]
#[case::suffix("*Handler", Pattern::Wildcard(WildcardShape::Suffix("Handler".to_owned())))]
#[case::contains("*user*", Pattern::Wildcard(WildcardShape::Contains("user".to_owned())))]
#[case::surround(
    "get*Name",
    Pattern::Wildcard(WildcardShape::Surround {
        prefix: "get".to_owned(),
        suffix: "Name".to_owned(),
    })
)]
fn pattern_parse_classifies_shapes(#[case] text: &str, #[case] expected: Pattern) {
    assert_eq!(Pattern::parse(text), Some(expected));
}

#[rstest]
#[case::empty("")]
#[case::double_star("**")]
#[case::two_inner_stars("a*b*c")]
#[case::three_stars("*a*b*")]
#[case::leading_pair("**a")]
fn pattern_parse_rejects_illegal_shapes(#[case] text: &str) {
    assert_eq!(Pattern::parse(text), None);
}

#[rstest]
#[case("*")]
#[case("main")]
#[case("Test*")]
#[case("*Handler")]
#[case("*user*")]
#[case("get*Name")]
fn pattern_display_reproduces_source_text(#[case] text: &str) {
    let pattern = Pattern::parse(text).expect("valid pattern");
    assert_eq!(pattern.to_string(), text);
}

#[test]
fn leaf_builders_record_constraints() {
    let leaf = LeafQuery::new(NodeKind::Field, Pattern::literal("Name"))
        .with_type(Pattern::literal("string"))
        .with_negation(true)
        .with_attribute("visibility", "public")
        .with_scope(ScopeType::Class);
    assert!(leaf.is_negated());
    assert_eq!(leaf.type_constraint(), Some(&Pattern::literal("string")));
    assert_eq!(
        leaf.attributes().get("visibility").map(String::as_str),
        Some("public")
    );
    assert_eq!(leaf.to_string(), "!field:Name string");
}

#[test]
fn universe_widens_pattern_and_clears_negation() {
    let leaf = LeafQuery::new(NodeKind::Function, Pattern::literal("main"))
        .with_negation(true)
        .with_scope(ScopeType::File);
    let universe = leaf.universe();
    assert!(universe.pattern().is_any());
    assert!(!universe.is_negated());
    assert_eq!(universe.scope(), Some(ScopeType::File));
}

#[test]
fn hierarchy_targets_trailing_child() {
    let query = Query::hierarchy(
        leaf(NodeKind::Class, "User"),
        Query::hierarchy(leaf(NodeKind::Method, "*"), leaf(NodeKind::Call, "print")),
    );
    assert_eq!(query.operator(), Some(Operator::Hierarchy));
    assert_eq!(query.target_kinds(), vec![NodeKind::Call]);
    assert_eq!(query.to_string(), "class:User > method:* > call:print");
}

#[test]
fn boolean_targets_union_child_kinds() {
    let query = Query::or(vec![
        leaf(NodeKind::Function, "a"),
        leaf(NodeKind::Method, "b"),
        leaf(NodeKind::Function, "c"),
    ]);
    assert_eq!(
        query.target_kinds(),
        vec![NodeKind::Function, NodeKind::Method]
    );
    assert_eq!(query.to_string(), "(function:a | method:b | function:c)");
}

#[test]
fn not_displays_with_group() {
    let query = Query::not(leaf(NodeKind::Function, "*"));
    assert_eq!(query.to_string(), "!(function:*)");
    assert_eq!(query.target_kinds(), vec![NodeKind::Function]);
    assert!(query.as_leaf().is_none());
}

#[test]
fn leaf_has_no_children() {
    let query = leaf(NodeKind::Function, "main");
    assert!(query.children().is_empty());
    assert!(query.operator().is_none());
}

#[rstest]
#[case::any("*", "anything", true)]
#[case::literal_hit("main", "main", true)]
#[case::literal_miss("main", "mainly", false)]
#[case::prefix("Test*", "TestParse", true)]
#[case::prefix_bare("Test*", "Test", true)]
#[case::suffix_miss("*Handler", "HandlerFn", false)]
#[case::contains("*user*", "load_user_id", true)]
#[case::surround_overlap("ab*ba", "aba", false)]
#[case::surround("get*Name", "getName", true)]
fn pattern_matches_glob_reading(#[case] pattern: &str, #[case] text: &str, #[case] expected: bool) {
    let pattern = Pattern::parse(pattern).expect("valid pattern");
    assert_eq!(pattern.matches(text), expected);
}
