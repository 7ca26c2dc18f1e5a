//! Set operations over [`ResultSet`]s.
//!
//! Identity is the originating [`NodeId`](sift_core::NodeId), never value
//! equality, so two results over the same node always compare equal even if
//! their provenance metadata differs.

use std::collections::HashSet;

use sift_core::{EvalError, Operator, ResultSet};

/// Keeps the results of the first set whose node appears in every other set.
///
/// The output is deduplicated and keeps the first set's order.
///
/// # Errors
///
/// Returns [`EvalError::Arity`] for fewer than two sets.
pub fn intersection(sets: &[ResultSet]) -> Result<ResultSet, EvalError> {
    let [first, rest @ ..] = sets else {
        return Err(too_few(Operator::And, 0));
    };
    if rest.is_empty() {
        return Err(too_few(Operator::And, 1));
    }
    let others: Vec<_> = rest.iter().map(ResultSet::node_ids).collect();
    let mut seen = HashSet::new();
    Ok(first
        .iter()
        .filter(|result| others.iter().all(|ids| ids.contains(&result.node)))
        .filter(|result| seen.insert(result.node))
        .cloned()
        .collect())
}

/// Concatenates the sets in order.
///
/// With `dedupe`, only the first result for each node is kept; otherwise a
/// node matched by several operands appears once per operand.
///
/// # Errors
///
/// Returns [`EvalError::Arity`] for fewer than two sets.
pub fn union(sets: &[ResultSet], dedupe: bool) -> Result<ResultSet, EvalError> {
    if sets.len() < 2 {
        return Err(too_few(Operator::Or, sets.len()));
    }
    let combined: ResultSet = sets.iter().flatten().cloned().collect();
    Ok(if dedupe { combined.dedup() } else { combined })
}

/// Keeps the results of `universe` whose node is absent from `excluded`.
#[must_use]
pub fn difference(universe: &ResultSet, excluded: &ResultSet) -> ResultSet {
    let excluded = excluded.node_ids();
    universe
        .iter()
        .filter(|result| !excluded.contains(&result.node))
        .cloned()
        .collect()
}

/// Keeps the results of `children` lying within the byte range of some
/// result of `parents`.
///
/// Bounds are inclusive, but a child is never counted as lying within its
/// own node.
#[must_use]
pub fn contained_within(children: &ResultSet, parents: &ResultSet) -> ResultSet {
    children
        .iter()
        .filter(|child| {
            parents.iter().any(|parent| {
                parent.node != child.node && parent.location.contains(&child.location)
            })
        })
        .cloned()
        .collect()
}

const fn too_few(operator: Operator, found: usize) -> EvalError {
    EvalError::Arity {
        operator,
        expected: "at least 2",
        found,
    }
}
