//! Execution of plans against source text.
//!
//! The source is parsed once per evaluation. Each native step runs its
//! compiled pattern over the shared tree and turns every `@target` capture
//! into a [`QueryResult`] through the provider callbacks; the remaining
//! steps combine those sets with [`crate::algebra`]. The result limit
//! applies to the combined set, so the algebra always sees complete
//! operands.

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;
use sift_core::{EngineConfig, EvalError, NodeId, NodeKind, QueryResult, ResultSet};
use sift_syntax::{ParseResult, Parser, Provider, node_location, node_text};
use streaming_iterator::StreamingIterator;
use tracing::{debug, warn};
use tree_sitter::{Language, Node, QueryCursor};

use crate::algebra;
use crate::compiler::{CompiledPattern, PredicateCheck, TARGET_CAPTURE};
use crate::plan::{NativeStep, Plan};

/// Runs plans for one provider.
pub struct Evaluator<'e> {
    provider: &'e dyn Provider,
    config: &'e EngineConfig,
}

/// A parsed source shared by every step of one evaluation.
struct SourceTree {
    parsed: ParseResult,
    grammar: Language,
}

impl<'e> Evaluator<'e> {
    /// Creates an evaluator.
    #[must_use]
    pub const fn new(provider: &'e dyn Provider, config: &'e EngineConfig) -> Self {
        Self { provider, config }
    }

    /// Evaluates `plan` against `source`.
    ///
    /// Sources with syntax errors are still evaluated over the recovered
    /// tree.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::EmptySource`] for empty input,
    /// [`EvalError::MissingGrammar`] if the provider has no grammar,
    /// [`EvalError::Parser`] if the source cannot be parsed, or
    /// [`EvalError::Pattern`] if Tree-sitter rejects a compiled pattern.
    pub fn evaluate(&self, plan: &Plan, source: &str) -> Result<ResultSet, EvalError> {
        if source.is_empty() {
            return Err(EvalError::EmptySource);
        }
        let language = self.provider.language();
        let grammar = self
            .provider
            .language_grammar()
            .ok_or_else(|| EvalError::missing_grammar(language.as_str()))?;
        let parsed = Parser::with_grammar(language, &grammar)
            .and_then(|mut parser| parser.parse(source))
            .map_err(|e| EvalError::parser(language.as_str(), e.to_string()))?;
        if parsed.has_errors() {
            debug!(
                %language,
                errors = parsed.errors().len(),
                "source has syntax errors, matching the recovered tree"
            );
        }
        let results = self.run(plan, &SourceTree { parsed, grammar })?;
        Ok(self.limit(results))
    }

    /// Truncates `results` to the configured maximum, keeping the total.
    fn limit(&self, results: ResultSet) -> ResultSet {
        let total = results.len();
        let limit = self.config.max_results();
        if total <= limit {
            return results;
        }
        warn!(total, limit, "result limit reached, truncating");
        let mut kept = results.into_results();
        kept.truncate(limit);
        ResultSet::with_total(kept, total)
    }

    fn run(&self, plan: &Plan, tree: &SourceTree) -> Result<ResultSet, EvalError> {
        match plan {
            Plan::Native(step) => self.native(step, tree),
            Plan::Within { outer, inner } => {
                let parents = self.run(outer, tree)?;
                let children = self.run(inner, tree)?;
                Ok(algebra::contained_within(&children, &parents))
            }
            Plan::And(children) => algebra::intersection(&self.run_all(children, tree)?),
            Plan::Or(children) => {
                algebra::union(&self.run_all(children, tree)?, self.config.dedupe_union())
            }
            Plan::Not { universe, excluded } => {
                let everything: ResultSet = self
                    .run_all(universe, tree)?
                    .into_iter()
                    .flatten()
                    .collect();
                let removed = self.run(excluded, tree)?;
                Ok(algebra::difference(&everything.dedup(), &removed))
            }
        }
    }

    fn run_all(&self, plans: &[Plan], tree: &SourceTree) -> Result<Vec<ResultSet>, EvalError> {
        plans.iter().map(|plan| self.run(plan, tree)).collect()
    }

    fn native(&self, step: &NativeStep, tree: &SourceTree) -> Result<ResultSet, EvalError> {
        let language = self.provider.language();
        let pattern = step.pattern();
        let query = tree_sitter::Query::new(&tree.grammar, pattern.text())
            .map_err(|e| EvalError::pattern(language.as_str(), e.offset, e.message))?;
        let target = query
            .capture_index_for_name(TARGET_CAPTURE)
            .ok_or_else(|| EvalError::MissingTarget {
                capture: TARGET_CAPTURE.to_owned(),
            })?;
        let checks = quantified_checks(pattern, &query, language.as_str())?;

        let source = tree.parsed.source_bytes();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, tree.parsed.root_node(), source);
        let mut seen = HashSet::new();
        let mut results = Vec::new();
        while let Some(found) = matches.next() {
            let satisfied = checks.get(found.pattern_index).is_none_or(|pattern_checks| {
                pattern_checks.iter().all(|(index, check)| {
                    found.nodes_for_capture_index(*index).any(|node| {
                        node_text(node, source).is_some_and(|text| check.accepts(text))
                    })
                })
            });
            if !satisfied {
                continue;
            }
            for capture in found.captures.iter().filter(|c| c.index == target) {
                if seen.insert(node_id(capture.node))
                    && let Some(result) = self.extract(capture.node, step, source)
                {
                    results.push(result);
                }
            }
        }

        results.sort_by(|a, b| {
            a.location
                .start_byte
                .cmp(&b.location.start_byte)
                .then(b.location.end_byte.cmp(&a.location.end_byte))
        });
        debug!(kind = %pattern.kind(), matches = results.len(), "native step complete");
        Ok(ResultSet::new(results))
    }

    /// Builds the result for one captured node, or returns `None` if the
    /// provider cannot classify or name it, or it fails the leaf's scope
    /// and attribute constraints.
    fn extract(&self, node: Node<'_>, step: &NativeStep, source: &[u8]) -> Option<QueryResult> {
        let Some(kind) = self.provider.node_to_universal_kind(node, source) else {
            debug!(node_type = node.kind(), "skipping capture with no universal kind");
            return None;
        };
        let Some(name) = self.provider.node_display_name(node, source) else {
            debug!(node_type = node.kind(), "skipping capture with no display name");
            return None;
        };

        let leaf = step.leaf();
        let scope = self.provider.node_enclosing_scope(node);
        if leaf.scope().is_some_and(|wanted| wanted != scope) {
            return None;
        }
        let attributes = self.provider.node_attributes(node, source);
        let satisfied = leaf
            .attributes()
            .iter()
            .all(|(key, value)| attributes.get(key) == Some(value));
        if !satisfied {
            return None;
        }

        let mut metadata: BTreeMap<String, Value> = attributes
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        metadata.insert("node_type".to_owned(), Value::from(node.kind()));
        metadata.insert("query_kind".to_owned(), Value::from(leaf.kind().as_str()));
        metadata.insert(
            "query_pattern".to_owned(),
            Value::String(leaf.pattern().to_string()),
        );

        let text = node_text(node, source).unwrap_or_default();
        let content = truncate(text, self.config.max_content_bytes()).to_owned();
        let mut result = QueryResult::new(node_id(node), kind, name, node_location(node), content)
            .with_metadata(metadata)
            .with_scope(scope);
        if let Some((parent_kind, parent_name)) = self.structural_parent(node, source) {
            result = result.with_parent(parent_kind, parent_name);
        }
        Some(result)
    }

    /// Finds the nearest ancestor with a universal kind other than a plain
    /// block.
    fn structural_parent(&self, node: Node<'_>, source: &[u8]) -> Option<(NodeKind, String)> {
        let mut current = node.parent();
        while let Some(ancestor) = current {
            if let Some(kind) = self.provider.node_to_universal_kind(ancestor, source)
                && kind != NodeKind::Block
            {
                let name = self
                    .provider
                    .node_display_name(ancestor, source)
                    .unwrap_or_default();
                return Some((kind, name));
            }
            current = ancestor.parent();
        }
        None
    }
}

/// Resolves the `any-` predicates of every pattern in `compiled` to
/// capture indices of `query`.
fn quantified_checks(
    compiled: &CompiledPattern,
    query: &tree_sitter::Query,
    language: &str,
) -> Result<Vec<Vec<(u32, PredicateCheck)>>, EvalError> {
    (0..compiled.pattern_count())
        .map(|pattern_index| {
            compiled
                .quantified_predicates(pattern_index)
                .iter()
                .map(|predicate| {
                    let index = query
                        .capture_index_for_name(predicate.capture())
                        .ok_or_else(|| EvalError::MissingTarget {
                            capture: predicate.capture().to_owned(),
                        })?;
                    let check = predicate
                        .check()
                        .map_err(|e| EvalError::pattern(language, 0, e.to_string()))?;
                    Ok((index, check))
                })
                .collect()
        })
        .collect()
}

fn node_id(node: Node<'_>) -> NodeId {
    NodeId::new(node.start_byte(), node.end_byte(), node.kind_id())
}

/// Cuts `text` to at most `max` bytes without splitting a character.
fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let end = (0..=max)
        .rev()
        .find(|&index| text.is_char_boundary(index))
        .unwrap_or_default();
    text.get(..end).unwrap_or_default()
}
