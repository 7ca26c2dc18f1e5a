//! Tests for result-set algebra.

use crate::algebra::{contained_within, difference, intersection, union};
use crate::{EvalError, LineCol, Location, NodeId, NodeKind, Operator, QueryResult, ResultSet};

fn result(name: &str, start: usize, end: usize) -> QueryResult {
    QueryResult::new(
        NodeId::new(start, end, 1),
        NodeKind::Function,
        name.to_owned(),
        Location::new(start, end, LineCol::new(1, 1), LineCol::new(1, 1)),
        String::new(),
    )
}

fn set(results: &[(&str, usize, usize)]) -> ResultSet {
    results
        .iter()
        .map(|&(name, start, end)| result(name, start, end))
        .collect()
}

#[test]
fn intersection_keeps_nodes_present_everywhere() {
    let first = set(&[("TestA", 0, 10), ("TestB", 20, 30), ("Helper", 40, 50)]);
    let second = set(&[("TestA", 0, 10), ("Helper", 40, 50)]);
    let third = set(&[("Helper", 40, 50), ("TestA", 0, 10)]);
    let both = intersection(&[first, second, third]).expect("three sets");
    assert_eq!(both.names(), vec!["TestA", "Helper"]);
}

#[test]
fn intersection_compares_node_identity_not_names() {
    let first = set(&[("main", 0, 10)]);
    let second = set(&[("main", 100, 110)]);
    let both = intersection(&[first, second]).expect("two sets");
    assert!(both.is_empty());
}

#[test]
fn intersection_output_is_deduplicated() {
    let first = set(&[("main", 0, 10), ("main", 0, 10)]);
    let second = set(&[("main", 0, 10)]);
    assert_eq!(intersection(&[first, second]).expect("two sets").len(), 1);
}

#[test]
fn union_keeps_duplicates_unless_asked() {
    let first = set(&[("main", 0, 10)]);
    let second = set(&[("main", 0, 10), ("run", 20, 30)]);
    let raw = union(&[first.clone(), second.clone()], false).expect("two sets");
    assert_eq!(raw.names(), vec!["main", "main", "run"]);
    let deduped = union(&[first, second], true).expect("two sets");
    assert_eq!(deduped.names(), vec!["main", "run"]);
}

#[test]
fn difference_removes_excluded_nodes() {
    let universe = set(&[("TestA", 0, 10), ("TestB", 20, 30), ("Helper", 40, 50)]);
    let excluded = set(&[("TestA", 0, 10), ("TestB", 20, 30)]);
    assert_eq!(difference(&universe, &excluded).names(), vec!["Helper"]);
}

#[test]
fn difference_with_empty_exclusion_is_identity() {
    let universe = set(&[("main", 0, 10)]);
    assert_eq!(difference(&universe, &ResultSet::default()), universe);
}

#[test]
fn containment_uses_inclusive_bounds() {
    let parents = set(&[("User", 0, 50)]);
    let children = set(&[("Name", 0, 20), ("Age", 30, 50), ("Other", 60, 70)]);
    assert_eq!(
        contained_within(&children, &parents).names(),
        vec!["Name", "Age"]
    );
}

#[test]
fn containment_excludes_the_same_node() {
    let parents = set(&[("main", 0, 50)]);
    let children = set(&[("main", 0, 50)]);
    assert!(contained_within(&children, &parents).is_empty());
}

#[test]
fn too_few_operands_are_rejected() {
    let single = [set(&[("main", 0, 10)])];
    assert!(matches!(
        intersection(&single),
        Err(EvalError::Arity {
            operator: Operator::And,
            found: 1,
            ..
        })
    ));
    assert!(matches!(
        union(&[], false),
        Err(EvalError::Arity {
            operator: Operator::Or,
            found: 0,
            ..
        })
    ));
}
