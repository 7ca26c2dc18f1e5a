//! Tests for [`QueryResult`] and [`ResultSet`].

use std::collections::BTreeMap;

use crate::{LineCol, Location, NodeId, NodeKind, QueryResult, ResultSet, ScopeType};

fn result(name: &str, start: usize, end: usize) -> QueryResult {
    QueryResult::new(
        NodeId::new(start, end, 1),
        NodeKind::Function,
        name.to_owned(),
        Location::new(start, end, LineCol::new(1, 1), LineCol::new(1, 1)),
        String::new(),
    )
}

#[test]
fn builders_populate_optional_fields() {
    let mut metadata = BTreeMap::new();
    metadata.insert("query_kind".to_owned(), serde_json::json!("function"));
    let built = result("main", 0, 10)
        .with_metadata(metadata)
        .with_parent(NodeKind::Class, "Server")
        .with_scope(ScopeType::Class);
    assert_eq!(built.parent_kind(), Some(NodeKind::Class));
    assert_eq!(built.parent_name(), Some("Server"));
    assert_eq!(built.scope(), ScopeType::Class);
    assert_eq!(built.metadata_str("query_kind"), Some("function"));
}

#[test]
fn new_set_counts_its_results() {
    let set = ResultSet::new(vec![result("a", 0, 1), result("b", 2, 3)]);
    assert_eq!(set.len(), 2);
    assert_eq!(set.total_matches(), 2);
    assert_eq!(set.names(), vec!["a", "b"]);
}

#[test]
fn explicit_total_may_exceed_len() {
    let set = ResultSet::with_total(vec![result("a", 0, 1)], 4);
    assert_eq!(set.len(), 1);
    assert_eq!(set.total_matches(), 4);
}

#[test]
fn dedup_keeps_first_result_per_node() {
    let set = ResultSet::new(vec![
        result("first", 0, 5),
        result("other", 6, 9),
        result("second", 0, 5),
    ]);
    let unique = set.dedup();
    assert_eq!(unique.names(), vec!["first", "other"]);
    assert_eq!(set.len(), 3);
}

#[test]
fn identity_ignores_value_fields() {
    let set = ResultSet::new(vec![result("a", 0, 5)]);
    assert!(set.contains_node(NodeId::new(0, 5, 1)));
    assert!(!set.contains_node(NodeId::new(0, 5, 2)));
}

#[test]
fn result_set_collects_from_iterator() {
    let set: ResultSet = vec![result("a", 0, 1)].into_iter().collect();
    assert_eq!(set.total_matches(), 1);
    let names: Vec<_> = (&set).into_iter().map(QueryResult::name).collect();
    assert_eq!(names, vec!["a"]);
}

#[test]
fn result_serde_round_trip() {
    let original = result("main", 0, 10).with_parent(NodeKind::Class, "App");
    let json = serde_json::to_string(&original).expect("serialize");
    let restored: QueryResult = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored, original);
}
