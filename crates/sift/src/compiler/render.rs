//! Rendering of template chains into Tree-sitter query text.
//!
//! One chain of templates renders to one pattern of the form
//! `((root ...) (#pred ...) ...)`. Captures are namespaced by depth
//! (`@d0.name`, `@d1.type`) so that embedded levels never collide, and the
//! node reported as the match carries `@target`.

use sift_core::{CompileError, LeafQuery, NodeKind};
use sift_syntax::{Element, NodeShape, Slot, Template, TemplateNode, TextFilter};

use super::TARGET_CAPTURE;
use super::predicate::{Predicate, PredicateOp, PredicateStyle, escape_string, identity_predicate};

/// One level of a chain: a leaf and the template chosen for it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Level<'a> {
    pub(crate) leaf: &'a LeafQuery,
    pub(crate) template: &'a Template,
    pub(crate) multi: bool,
}

/// A rendered pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Rendered {
    pub(crate) text: String,
    pub(crate) negated: bool,
    /// The `any-` predicates, which the evaluator enforces.
    pub(crate) quantified: Vec<Predicate>,
}

/// Renders `levels`, embedding each level in the first members slot of the
/// previous one that accepts its kind.
pub(crate) fn render_chain(levels: &[Level<'_>]) -> Result<Rendered, CompileError> {
    let mut renderer = Renderer {
        levels,
        predicates: Vec::new(),
        quantified: Vec::new(),
        negated: false,
        aux: 0,
    };
    let body = renderer.level(0)?;
    let mut text = format!("({body}");
    for predicate in &renderer.predicates {
        text.push(' ');
        text.push_str(predicate);
    }
    text.push(')');
    Ok(Rendered {
        text,
        negated: renderer.negated,
        quantified: renderer.quantified,
    })
}

/// Returns the capture name of `slot` at `depth`.
pub(crate) fn slot_capture(depth: usize, slot: Slot) -> String {
    format!("d{depth}.{}", slot.as_str())
}

struct Renderer<'a> {
    levels: &'a [Level<'a>],
    predicates: Vec<String>,
    quantified: Vec<Predicate>,
    negated: bool,
    aux: usize,
}

/// Per-level rendering state.
struct Cursor<'a> {
    depth: usize,
    level: Level<'a>,
    child_kind: Option<NodeKind>,
    embedded: bool,
}

impl Renderer<'_> {
    fn level(&mut self, depth: usize) -> Result<String, CompileError> {
        let Some(level) = self.levels.get(depth).copied() else {
            return Ok(String::new());
        };
        self.identity_predicates(depth, level)?;
        let mut cursor = Cursor {
            depth,
            level,
            child_kind: self.levels.get(depth + 1).map(|child| child.leaf.kind()),
            embedded: false,
        };
        let root = level.template.root();
        Ok(self.node(root, &mut cursor, true)?.unwrap_or_default())
    }

    fn identity_predicates(&mut self, depth: usize, level: Level<'_>) -> Result<(), CompileError> {
        let style = PredicateStyle {
            quantified: level.multi,
            negated: level.leaf.is_negated(),
            quoted: level.template.is_name_quoted(),
        };
        let name = identity_predicate(
            level.leaf.pattern(),
            &slot_capture(depth, Slot::Name),
            style,
        )?;
        let type_predicate = match level.leaf.type_constraint() {
            Some(constraint) => identity_predicate(
                constraint,
                &slot_capture(depth, Slot::Type),
                PredicateStyle {
                    quoted: false,
                    ..style
                },
            )?,
            None => None,
        };
        for predicate in name.into_iter().chain(type_predicate) {
            self.negated |= predicate.op().is_negated();
            self.predicates.push(predicate.render());
            if predicate.op().is_quantified() {
                self.quantified.push(predicate);
            }
        }
        Ok(())
    }

    fn node(
        &mut self,
        node: &TemplateNode,
        cursor: &mut Cursor<'_>,
        is_root: bool,
    ) -> Result<Option<String>, CompileError> {
        if !is_root && is_optional_type(node) && cursor.level.leaf.type_constraint().is_none() {
            return Ok(None);
        }

        let mut text = String::new();
        if let Some(field) = node.field_name() {
            text.push_str(field);
            text.push_str(": ");
        }
        match node.shape() {
            NodeShape::Named(node_type) => {
                text.push('(');
                text.push_str(node_type);
                for element in node.children() {
                    if let Some(child) = self.element(element, cursor)? {
                        text.push(' ');
                        text.push_str(&child);
                    }
                }
                text.push(')');
            }
            NodeShape::Token(token) => {
                text.push('"');
                text.push_str(&escape_string(token));
                text.push('"');
            }
            NodeShape::Alternatives(node_types) => {
                let alternatives: Vec<_> = node_types
                    .iter()
                    .map(|node_type| format!("({node_type})"))
                    .collect();
                text.push('[');
                text.push_str(&alternatives.join(" "));
                text.push(']');
            }
        }

        if let Some(slot) = node.slot() {
            text.push_str(" @");
            text.push_str(&slot_capture(cursor.depth, slot));
        }
        if let Some(filter) = node.text_filter() {
            let capture = if let Some(slot) = node.slot() {
                slot_capture(cursor.depth, slot)
            } else {
                let aux = format!("d{}.lit{}", cursor.depth, self.aux);
                self.aux += 1;
                text.push_str(" @");
                text.push_str(&aux);
                aux
            };
            self.predicates.push(filter_predicate(filter, &capture).render());
        }
        let is_last = cursor.depth + 1 == self.levels.len();
        let is_target =
            node.is_target() || (is_root && !cursor.level.template.root().has_target());
        if is_last && is_target {
            text.push_str(" @");
            text.push_str(TARGET_CAPTURE);
        }
        Ok(Some(text))
    }

    fn element(
        &mut self,
        element: &Element,
        cursor: &mut Cursor<'_>,
    ) -> Result<Option<String>, CompileError> {
        match element {
            Element::Node(child) => self.node(child, cursor, false),
            Element::Members(kinds) => {
                let accepts = cursor.child_kind.is_some_and(|kind| kinds.contains(&kind));
                if !accepts || cursor.embedded {
                    return Ok(None);
                }
                cursor.embedded = true;
                self.level(cursor.depth + 1).map(Some)
            }
        }
    }
}

/// A subtree that only exists to capture a declared type. It is dropped
/// unless the query constrains the type, so untyped declarations still
/// match.
fn is_optional_type(node: &TemplateNode) -> bool {
    node.has_slot(Slot::Type)
        && !node.has_slot(Slot::Name)
        && !node.has_target()
        && !has_members(node)
}

fn has_members(node: &TemplateNode) -> bool {
    node.children().iter().any(|element| match element {
        Element::Node(child) => has_members(child),
        Element::Members(_) => true,
    })
}

fn filter_predicate(filter: TextFilter, capture: &str) -> Predicate {
    match filter {
        TextFilter::Equals(value) => Predicate::new(PredicateOp::Eq, capture, value),
        TextFilter::Matches(value) => Predicate::new(PredicateOp::Match, capture, value),
        TextFilter::NotMatches(value) => Predicate::new(PredicateOp::NotMatch, capture, value),
    }
}
