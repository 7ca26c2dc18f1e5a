//! Evaluation plans.
//!
//! A [`Plan`] is the compiled form of a [`Query`] for one provider. Leaves
//! and natively expressible hierarchies become [`Plan::Native`] steps; the
//! boolean operators, and hierarchies that cannot be embedded in one
//! pattern, become result-level steps combined by [`crate::algebra`].

use sift_core::{EvalError, LeafQuery, Operator, Pattern, Query, SiftError};
use sift_syntax::{NodeMapping, Provider};

use crate::compiler::{CompiledPattern, compile_hierarchy, compile_leaf};

/// A compiled pattern and the leaf whose nodes it reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeStep {
    pattern: CompiledPattern,
    leaf: LeafQuery,
}

impl NativeStep {
    /// Pairs a compiled pattern with its reported leaf.
    #[must_use]
    pub const fn new(pattern: CompiledPattern, leaf: LeafQuery) -> Self {
        Self { pattern, leaf }
    }

    /// Returns the compiled pattern.
    #[must_use]
    pub const fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    /// Returns the leaf echoed into result metadata and whose scope and
    /// attribute constraints filter the results.
    #[must_use]
    pub const fn leaf(&self) -> &LeafQuery {
        &self.leaf
    }
}

/// An executable plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Run one compiled pattern.
    Native(NativeStep),
    /// Keep results of `inner` lying inside some result of `outer`.
    Within {
        /// The ancestor plan.
        outer: Box<Plan>,
        /// The descendant plan, whose results are reported.
        inner: Box<Plan>,
    },
    /// Intersection by node identity.
    And(Vec<Plan>),
    /// Union.
    Or(Vec<Plan>),
    /// Every node of the universe that `excluded` does not report.
    Not {
        /// One plan per kind the negated query reports, each matching `*`.
        universe: Vec<Plan>,
        /// The positive form of the negated query.
        excluded: Box<Plan>,
    },
}

impl Plan {
    /// Builds the plan for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Compile`] if any leaf fails to compile, or
    /// [`EvalError::Arity`] if an operator has the wrong number of operands.
    /// A failure anywhere aborts the whole plan.
    pub fn build(query: &Query, provider: &dyn Provider) -> Result<Self, SiftError> {
        let composite = match query {
            Query::Leaf(leaf) => return leaf_plan(leaf, provider),
            Query::Composite(composite) => composite,
        };
        let children = composite.children();
        match composite.operator() {
            Operator::And | Operator::Or => {
                if children.len() < 2 {
                    return Err(arity(composite.operator(), "at least 2", children.len()));
                }
                let plans = children
                    .iter()
                    .map(|child| Self::build(child, provider))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(if composite.operator() == Operator::And {
                    Self::And(plans)
                } else {
                    Self::Or(plans)
                })
            }
            Operator::Not => match children {
                [child] => not_plan(child, provider),
                _ => Err(arity(Operator::Not, "exactly 1", children.len())),
            },
            Operator::Hierarchy => match children {
                [parent, child] => hierarchy_plan(parent, child, provider),
                _ => Err(arity(Operator::Hierarchy, "exactly 2", children.len())),
            },
        }
    }

    /// Returns every compiled pattern in the plan, depth first.
    #[must_use]
    pub fn patterns(&self) -> Vec<&CompiledPattern> {
        let mut patterns = Vec::new();
        self.collect_patterns(&mut patterns);
        patterns
    }

    fn collect_patterns<'a>(&'a self, patterns: &mut Vec<&'a CompiledPattern>) {
        match self {
            Self::Native(step) => patterns.push(step.pattern()),
            Self::Within { outer, inner } => {
                outer.collect_patterns(patterns);
                inner.collect_patterns(patterns);
            }
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect_patterns(patterns);
                }
            }
            Self::Not { universe, excluded } => {
                for plan in universe {
                    plan.collect_patterns(patterns);
                }
                excluded.collect_patterns(patterns);
            }
        }
    }
}

fn arity(operator: Operator, expected: &'static str, found: usize) -> SiftError {
    EvalError::Arity {
        operator,
        expected,
        found,
    }
    .into()
}

/// Returns whether a negated leaf must be evaluated as a complement.
///
/// That is the case when it has no predicate to flip, or when its kind
/// groups several identifiers under one declaration: a flipped `any-`
/// predicate keeps `var a, b` for `!var:a`.
fn needs_complement(leaf: &LeafQuery, provider: &dyn Provider) -> bool {
    let bare = leaf.pattern().is_any() && leaf.type_constraint().is_none();
    let grouped = provider
        .node_kind_mappings(leaf.kind())
        .iter()
        .any(NodeMapping::is_multi_identifier);
    leaf.is_negated() && (bare || grouped)
}

fn leaf_plan(leaf: &LeafQuery, provider: &dyn Provider) -> Result<Plan, SiftError> {
    if needs_complement(leaf, provider) {
        let positive = Query::leaf(leaf.clone().with_negation(false));
        return not_plan(&positive, provider);
    }
    let pattern = compile_leaf(leaf, provider)?;
    Ok(Plan::Native(NativeStep::new(pattern, leaf.clone())))
}

fn not_plan(child: &Query, provider: &dyn Provider) -> Result<Plan, SiftError> {
    let universe = match child.as_leaf() {
        Some(leaf) => vec![leaf_plan(&leaf.universe(), provider)?],
        None => child
            .target_kinds()
            .into_iter()
            .map(|kind| leaf_plan(&LeafQuery::new(kind, Pattern::Any), provider))
            .collect::<Result<Vec<_>, _>>()?,
    };
    let excluded = Plan::build(child, provider)?;
    Ok(Plan::Not {
        universe,
        excluded: Box::new(excluded),
    })
}

fn hierarchy_plan(
    parent: &Query,
    child: &Query,
    provider: &dyn Provider,
) -> Result<Plan, SiftError> {
    let mut chain = Vec::new();
    if leaf_chain(parent, &mut chain) && leaf_chain(child, &mut chain) {
        return chain_plan(&chain, provider);
    }
    Ok(Plan::Within {
        outer: Box::new(Plan::build(parent, provider)?),
        inner: Box::new(Plan::build(child, provider)?),
    })
}

/// Flattens nested hierarchies of plain leaves into `chain`. Returns `false`
/// if any part is a boolean operator.
fn leaf_chain<'q>(query: &'q Query, chain: &mut Vec<&'q LeafQuery>) -> bool {
    match (query.as_leaf(), query.operator()) {
        (Some(leaf), _) => {
            chain.push(leaf);
            true
        }
        (None, Some(Operator::Hierarchy)) => query
            .children()
            .iter()
            .all(|child| leaf_chain(child, chain)),
        _ => false,
    }
}

fn chain_plan(chain: &[&LeafQuery], provider: &dyn Provider) -> Result<Plan, SiftError> {
    let [first, rest @ ..] = chain else {
        return Err(arity(Operator::Hierarchy, "exactly 2", 0));
    };
    let Some(last) = rest.last() else {
        return leaf_plan(first, provider);
    };

    let parents_unfiltered = chain
        .iter()
        .take(chain.len() - 1)
        .all(|leaf| leaf.attributes().is_empty() && leaf.scope().is_none());
    let has_complement = chain.iter().any(|leaf| needs_complement(leaf, provider));
    if parents_unfiltered
        && !has_complement
        && let Some(pattern) = compile_hierarchy(chain, provider)?
    {
        return Ok(Plan::Native(NativeStep::new(pattern, (*last).clone())));
    }

    Ok(Plan::Within {
        outer: Box::new(leaf_plan(first, provider)?),
        inner: Box::new(chain_plan(rest, provider)?),
    })
}
