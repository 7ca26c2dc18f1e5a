//! Translation of leaf queries into Tree-sitter query text.
//!
//! The compiler looks up the provider's [`NodeMapping`]s for a leaf's kind,
//! picks the templates able to carry the leaf's predicates, and renders one
//! pattern per template. Patterns for the same leaf are joined into one
//! query, so a match of any template is a match of the leaf.
//!
//! A hierarchy of leaves can be rendered as a single pattern when each
//! parent template has a members slot accepting the next leaf's kind. See
//! [`compile_hierarchy`].

mod predicate;
mod render;

use sift_core::{CompileError, LeafQuery, NodeKind};
use sift_syntax::{NodeMapping, Provider, Slot, SupportedLanguage, Template};
use tracing::debug;

pub use predicate::{
    Predicate, PredicateCheck, PredicateOp, PredicateStyle, escape_string, identity_predicate,
    wildcard_regex,
};

use render::{Level, render_chain};

/// Name of the capture marking the reported node.
pub const TARGET_CAPTURE: &str = "target";

/// Tree-sitter query text ready for execution, with the metadata the
/// evaluator needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    text: String,
    language: SupportedLanguage,
    kind: NodeKind,
    pattern_count: usize,
    negated: bool,
    quantified: Vec<Vec<Predicate>>,
}

impl CompiledPattern {
    /// Returns the query text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the language the text was rendered for.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Returns the kind of the reported nodes.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the number of alternative patterns in the text.
    #[must_use]
    pub const fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Returns whether any identity predicate is negated.
    #[must_use]
    pub const fn has_negation(&self) -> bool {
        self.negated
    }

    /// Returns the `any-` predicates of the pattern at `pattern_index`.
    ///
    /// Tree-sitter never rejects a match on these, so the evaluator checks
    /// them against the captured nodes.
    #[must_use]
    pub fn quantified_predicates(&self, pattern_index: usize) -> &[Predicate] {
        self.quantified
            .get(pattern_index)
            .map_or(&[], Vec::as_slice)
    }

    /// Returns the name of the capture marking the reported node.
    #[must_use]
    pub const fn target_capture(&self) -> &'static str {
        TARGET_CAPTURE
    }

    /// Returns whether the text carries the target capture.
    #[must_use]
    pub fn has_target(&self) -> bool {
        self.text.contains(&format!("@{TARGET_CAPTURE}"))
    }
}

/// A template a leaf can be rendered with.
#[derive(Debug, Clone, Copy)]
struct Candidate<'p> {
    template: &'p Template,
    multi: bool,
}

/// Compiles one leaf.
///
/// # Errors
///
/// Returns [`CompileError::UnsupportedKind`] if the provider has no mapping
/// for the kind, [`CompileError::WildcardOnly`] for a concrete identifier on
/// a wildcard-only kind, [`CompileError::MissingSlot`] if no template can
/// carry the predicates, or [`CompileError::InvalidRegex`].
pub fn compile_leaf(
    leaf: &LeafQuery,
    provider: &dyn Provider,
) -> Result<CompiledPattern, CompileError> {
    let options = candidates(leaf, provider, true)?;
    let chains = options
        .into_iter()
        .map(|candidate| vec![candidate])
        .collect::<Vec<_>>();
    assemble(&[leaf], &chains, provider.language())
}

/// Compiles `parent > ... > child` into a single pattern whose target is the
/// last leaf.
///
/// Returns `Ok(None)` when the chain cannot be expressed natively: a child
/// template reports a node other than its root, or no parent template has a
/// members slot for the next kind. Callers then fall back to a containment
/// filter over separately evaluated leaves.
///
/// # Errors
///
/// Returns the same errors as [`compile_leaf`] for any level.
pub fn compile_hierarchy(
    levels: &[&LeafQuery],
    provider: &dyn Provider,
) -> Result<Option<CompiledPattern>, CompileError> {
    if levels.len() < 2 {
        return levels
            .first()
            .map(|leaf| compile_leaf(leaf, provider))
            .transpose();
    }

    let last = levels.len() - 1;
    let mut options = Vec::with_capacity(levels.len());
    for (depth, leaf) in levels.iter().enumerate() {
        let level_options = candidates(leaf, provider, depth == last)?;
        if depth > 0
            && !level_options
                .iter()
                .all(|candidate| candidate.template.target_is_root())
        {
            debug!(kind = %leaf.kind(), "child template reports a nested node");
            return Ok(None);
        }
        options.push(level_options);
    }

    let kinds: Vec<NodeKind> = levels.iter().map(|leaf| leaf.kind()).collect();
    let chains = embeddable_chains(&options, &kinds);
    if chains.is_empty() {
        debug!(kinds = ?kinds, "no members slot accepts the next level");
        return Ok(None);
    }
    assemble(levels, &chains, provider.language()).map(Some)
}

/// Returns every combination of one template per level in which each
/// template accepts the next level's kind.
fn embeddable_chains<'p>(
    options: &[Vec<Candidate<'p>>],
    kinds: &[NodeKind],
) -> Vec<Vec<Candidate<'p>>> {
    let mut chains: Vec<Vec<Candidate<'p>>> = vec![Vec::new()];
    for (level_options, kind) in options.iter().zip(kinds) {
        let mut extended = Vec::new();
        for chain in &chains {
            let accepted = chain
                .last()
                .is_none_or(|parent| parent.template.accepts_member(*kind));
            if !accepted {
                continue;
            }
            for candidate in level_options {
                let mut next = chain.clone();
                next.push(*candidate);
                extended.push(next);
            }
        }
        chains = extended;
    }
    chains
}

fn assemble(
    leaves: &[&LeafQuery],
    chains: &[Vec<Candidate<'_>>],
    language: SupportedLanguage,
) -> Result<CompiledPattern, CompileError> {
    let mut patterns = Vec::with_capacity(chains.len());
    let mut quantified = Vec::with_capacity(chains.len());
    let mut negated = false;
    for chain in chains {
        let levels: Vec<Level<'_>> = leaves
            .iter()
            .zip(chain)
            .map(|(leaf, candidate)| Level {
                leaf,
                template: candidate.template,
                multi: candidate.multi,
            })
            .collect();
        let rendered = render_chain(&levels)?;
        negated |= rendered.negated;
        patterns.push(rendered.text);
        quantified.push(rendered.quantified);
    }

    let kind = leaves.last().map_or(NodeKind::Block, |leaf| leaf.kind());
    let compiled = CompiledPattern {
        text: patterns.join("\n"),
        language,
        kind,
        pattern_count: patterns.len(),
        negated,
        quantified,
    };
    debug!(
        %language,
        %kind,
        patterns = compiled.pattern_count,
        text = %compiled.text,
        "compiled pattern"
    );
    Ok(compiled)
}

/// Selects the templates able to render `leaf`.
///
/// Wildcard templates are preferred for a bare `*` when `allow_wildcard` is
/// set. Templates lacking a slot the leaf's predicates need are skipped.
fn candidates<'p>(
    leaf: &LeafQuery,
    provider: &'p dyn Provider,
    allow_wildcard: bool,
) -> Result<Vec<Candidate<'p>>, CompileError> {
    let kind = leaf.kind();
    if kind.is_wildcard_only() && !leaf.pattern().is_any() {
        return Err(CompileError::WildcardOnly {
            kind,
            pattern: leaf.pattern().to_string(),
        });
    }
    let language = provider.language();
    let mappings = provider.node_kind_mappings(kind);
    if mappings.is_empty() {
        return Err(CompileError::unsupported_kind(kind, language.as_str()));
    }

    let needs_name = !leaf.pattern().is_any();
    let needs_type = leaf.type_constraint().is_some();
    let plain = !needs_name && !needs_type;

    let mut selected = Vec::new();
    for mapping in mappings {
        let templates = if plain && allow_wildcard && !mapping.wildcard_templates().is_empty() {
            mapping.wildcard_templates()
        } else {
            mapping.templates()
        };
        selected.extend(
            templates
                .iter()
                .filter(|template| !needs_name || template.has_slot(Slot::Name))
                .filter(|template| !needs_type || template.has_slot(Slot::Type))
                .map(|template| Candidate {
                    template,
                    multi: mapping.is_multi_identifier(),
                }),
        );
    }

    if selected.is_empty() {
        let slot = if needs_type && !mappings.iter().any(NodeMapping::has_type_slot) {
            Slot::Type
        } else {
            Slot::Name
        };
        return Err(CompileError::missing_slot(
            kind,
            slot.as_str(),
            language.as_str(),
        ));
    }
    Ok(selected)
}
