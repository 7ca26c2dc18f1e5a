//! The structured query AST produced by the DSL parser.
//!
//! A [`Query`] is either a [`LeafQuery`] naming one universal kind and an
//! identifier [`Pattern`], or a [`CompositeQuery`] combining child queries
//! with an [`Operator`]. Queries are immutable once built.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kind::{NodeKind, ScopeType};

/// One of the four legal single-wildcard shapes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WildcardShape {
    /// `X*`
    Prefix(String),
    /// `*X`
    Suffix(String),
    /// `*X*`
    Contains(String),
    /// `X*Y`
    Surround {
        /// Literal text before the wildcard.
        prefix: String,
        /// Literal text after the wildcard.
        suffix: String,
    },
}

/// An identifier pattern: a literal, `*`, or a wildcard expression.
///
/// # Example
///
/// ```
/// use sift_core::{Pattern, WildcardShape};
///
/// assert_eq!(Pattern::parse("*"), Some(Pattern::Any));
/// assert_eq!(
///     Pattern::parse("Test*"),
///     Some(Pattern::Wildcard(WildcardShape::Prefix(String::from("Test"))))
/// );
/// assert_eq!(Pattern::parse("a*b*c"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    /// Matches any identifier.
    Any,
    /// Matches exactly this identifier.
    Literal(String),
    /// Matches identifiers of the given shape.
    Wildcard(WildcardShape),
}

impl Pattern {
    /// Creates a literal pattern.
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// Classifies pattern text.
    ///
    /// Returns `None` for empty text and for wildcard expressions outside the
    /// four supported shapes (`X*`, `*X`, `*X*`, `X*Y`).
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        if text == "*" {
            return Some(Self::Any);
        }
        match text.matches('*').count() {
            0 => Some(Self::Literal(text.to_owned())),
            1 => {
                let (prefix, suffix) = text.split_once('*')?;
                let shape = match (prefix.is_empty(), suffix.is_empty()) {
                    (false, true) => WildcardShape::Prefix(prefix.to_owned()),
                    (true, false) => WildcardShape::Suffix(suffix.to_owned()),
                    (false, false) => WildcardShape::Surround {
                        prefix: prefix.to_owned(),
                        suffix: suffix.to_owned(),
                    },
                    (true, true) => return Some(Self::Any),
                };
                Some(Self::Wildcard(shape))
            }
            2 => {
                let inner = text.strip_prefix('*')?.strip_suffix('*')?;
                (!inner.is_empty() && !inner.contains('*'))
                    .then(|| Self::Wildcard(WildcardShape::Contains(inner.to_owned())))
            }
            _ => None,
        }
    }

    /// Returns whether this is the match-anything pattern.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Returns the literal text of the pattern without wildcard markers.
    ///
    /// Used for quote checks on import paths.
    #[must_use]
    pub fn literal_text(&self) -> String {
        match self {
            Self::Any => String::new(),
            Self::Literal(text)
            | Self::Wildcard(
                WildcardShape::Prefix(text)
                | WildcardShape::Suffix(text)
                | WildcardShape::Contains(text),
            ) => text.clone(),
            Self::Wildcard(WildcardShape::Surround { prefix, suffix }) => {
                format!("{prefix}{suffix}")
            }
        }
    }

    /// Tests `text` against the shell-glob reading of this pattern.
    ///
    /// # Example
    ///
    /// ```
    /// use sift_core::Pattern;
    ///
    /// let pattern = Pattern::parse("get*Name").expect("valid pattern");
    /// assert!(pattern.matches("getUserName"));
    /// assert!(!pattern.matches("getName2"));
    /// ```
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Literal(literal) => text == literal,
            Self::Wildcard(WildcardShape::Prefix(prefix)) => text.starts_with(prefix.as_str()),
            Self::Wildcard(WildcardShape::Suffix(suffix)) => text.ends_with(suffix.as_str()),
            Self::Wildcard(WildcardShape::Contains(inner)) => text.contains(inner.as_str()),
            Self::Wildcard(WildcardShape::Surround { prefix, suffix }) => {
                text.len() >= prefix.len() + suffix.len()
                    && text.starts_with(prefix.as_str())
                    && text.ends_with(suffix.as_str())
            }
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Literal(text) => f.write_str(text),
            Self::Wildcard(WildcardShape::Prefix(text)) => write!(f, "{text}*"),
            Self::Wildcard(WildcardShape::Suffix(text)) => write!(f, "*{text}"),
            Self::Wildcard(WildcardShape::Contains(text)) => write!(f, "*{text}*"),
            Self::Wildcard(WildcardShape::Surround { prefix, suffix }) => {
                write!(f, "{prefix}*{suffix}")
            }
        }
    }
}

/// A single `kind:pattern` query.
///
/// # Example
///
/// ```
/// use sift_core::{LeafQuery, NodeKind, Pattern, ScopeType};
///
/// let leaf = LeafQuery::new(NodeKind::Variable, Pattern::literal("count"))
///     .with_type(Pattern::literal("int"))
///     .with_scope(ScopeType::Function);
/// assert_eq!(leaf.to_string(), "variable:count int");
/// assert_eq!(leaf.scope(), Some(ScopeType::Function));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafQuery {
    kind: NodeKind,
    pattern: Pattern,
    type_constraint: Option<Pattern>,
    negated: bool,
    attributes: BTreeMap<String, String>,
    scope: Option<ScopeType>,
}

impl LeafQuery {
    /// Creates a positive leaf query with no constraints.
    #[must_use]
    pub const fn new(kind: NodeKind, pattern: Pattern) -> Self {
        Self {
            kind,
            pattern,
            type_constraint: None,
            negated: false,
            attributes: BTreeMap::new(),
            scope: None,
        }
    }

    /// Adds a secondary type constraint.
    #[must_use]
    pub fn with_type(mut self, type_constraint: Pattern) -> Self {
        self.type_constraint = Some(type_constraint);
        self
    }

    /// Sets the negation flag.
    #[must_use]
    pub const fn with_negation(mut self, negated: bool) -> Self {
        self.negated = negated;
        self
    }

    /// Requires the provider attribute `key` to equal `value` on every result.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Restricts results to nodes whose enclosing scope is `scope`.
    #[must_use]
    pub const fn with_scope(mut self, scope: ScopeType) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Returns the universal kind.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the identifier pattern.
    #[must_use]
    pub const fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Returns the type constraint, if any.
    #[must_use]
    pub const fn type_constraint(&self) -> Option<&Pattern> {
        self.type_constraint.as_ref()
    }

    /// Returns whether the identifier predicates are negated.
    #[must_use]
    pub const fn is_negated(&self) -> bool {
        self.negated
    }

    /// Returns the attribute constraints.
    #[must_use]
    pub const fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Returns the scope constraint, if any.
    #[must_use]
    pub const fn scope(&self) -> Option<ScopeType> {
        self.scope
    }

    /// Returns a copy of this leaf with negation cleared and the pattern
    /// widened to `*`, keeping scope and attribute constraints.
    #[must_use]
    pub fn universe(&self) -> Self {
        Self {
            kind: self.kind,
            pattern: Pattern::Any,
            type_constraint: None,
            negated: false,
            attributes: self.attributes.clone(),
            scope: self.scope,
        }
    }
}

impl fmt::Display for LeafQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("!")?;
        }
        write!(f, "{}:{}", self.kind, self.pattern)?;
        if let Some(type_constraint) = &self.type_constraint {
            write!(f, " {type_constraint}")?;
        }
        Ok(())
    }
}

/// Combinators joining child queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Intersection of child results.
    And,
    /// Union of child results.
    Or,
    /// Complement of the single child's results.
    Not,
    /// `parent > child`: the child nested inside the parent.
    Hierarchy,
}

impl Operator {
    /// Returns the DSL symbol for this operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::And => "&",
            Self::Or => "|",
            Self::Not => "!",
            Self::Hierarchy => ">",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Hierarchy => "HIERARCHY",
        };
        f.write_str(name)
    }
}

/// A combinator node with ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeQuery {
    operator: Operator,
    children: Vec<Query>,
}

impl CompositeQuery {
    /// Returns the operator.
    #[must_use]
    pub const fn operator(&self) -> Operator {
        self.operator
    }

    /// Returns the ordered children.
    #[must_use]
    pub fn children(&self) -> &[Query] {
        &self.children
    }
}

/// A parsed query: a leaf, or an operator over child queries.
///
/// Hierarchies are right-recursive: `A > B > C` is
/// `Hierarchy[A, Hierarchy[B, C]]`, so the match target is always the
/// trailing leaf.
///
/// # Example
///
/// ```
/// use sift_core::{LeafQuery, NodeKind, Pattern, Query};
///
/// let query = Query::hierarchy(
///     Query::leaf(LeafQuery::new(NodeKind::Class, Pattern::literal("User"))),
///     Query::leaf(LeafQuery::new(NodeKind::Field, Pattern::literal("Name"))),
/// );
/// assert_eq!(query.to_string(), "class:User > field:Name");
/// assert_eq!(query.target_kinds(), vec![NodeKind::Field]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    /// A single `kind:pattern` query.
    Leaf(LeafQuery),
    /// An operator applied to child queries.
    Composite(CompositeQuery),
}

impl Query {
    /// Wraps a leaf query.
    #[must_use]
    pub const fn leaf(leaf: LeafQuery) -> Self {
        Self::Leaf(leaf)
    }

    /// Creates an operator node. Arity is checked when the query is
    /// evaluated.
    #[must_use]
    pub const fn composite(operator: Operator, children: Vec<Self>) -> Self {
        Self::Composite(CompositeQuery { operator, children })
    }

    /// Creates an `AND` node.
    #[must_use]
    pub const fn and(children: Vec<Self>) -> Self {
        Self::composite(Operator::And, children)
    }

    /// Creates an `OR` node.
    #[must_use]
    pub const fn or(children: Vec<Self>) -> Self {
        Self::composite(Operator::Or, children)
    }

    /// Creates a `NOT` node over one child.
    #[must_use]
    pub fn not(child: Self) -> Self {
        Self::composite(Operator::Not, vec![child])
    }

    /// Creates a `parent > child` node.
    #[must_use]
    pub fn hierarchy(parent: Self, child: Self) -> Self {
        Self::composite(Operator::Hierarchy, vec![parent, child])
    }

    /// Returns the leaf, if this is one.
    #[must_use]
    pub const fn as_leaf(&self) -> Option<&LeafQuery> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Composite(_) => None,
        }
    }

    /// Returns the operator, or `None` for leaves.
    #[must_use]
    pub const fn operator(&self) -> Option<Operator> {
        match self {
            Self::Leaf(_) => None,
            Self::Composite(composite) => Some(composite.operator),
        }
    }

    /// Returns the children; empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Leaf(_) => &[],
            Self::Composite(composite) => &composite.children,
        }
    }

    /// Returns the universal kinds whose nodes this query reports.
    ///
    /// For a hierarchy this is the trailing child's kinds; for `AND`/`OR`
    /// the union of the children's kinds in first-seen order.
    #[must_use]
    pub fn target_kinds(&self) -> Vec<NodeKind> {
        match self {
            Self::Leaf(leaf) => vec![leaf.kind],
            Self::Composite(composite) => match composite.operator {
                Operator::Hierarchy | Operator::Not => composite
                    .children
                    .last()
                    .map(Self::target_kinds)
                    .unwrap_or_default(),
                Operator::And | Operator::Or => {
                    let mut kinds = Vec::new();
                    for kind in composite.children.iter().flat_map(Self::target_kinds) {
                        if !kinds.contains(&kind) {
                            kinds.push(kind);
                        }
                    }
                    kinds
                }
            },
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(leaf) => leaf.fmt(f),
            Self::Composite(composite) => match composite.operator {
                Operator::Not => {
                    f.write_str("!(")?;
                    write_joined(f, &composite.children, " ")?;
                    f.write_str(")")
                }
                Operator::Hierarchy => write_joined(f, &composite.children, " > "),
                Operator::And | Operator::Or => {
                    let separator = format!(" {} ", composite.operator.symbol());
                    f.write_str("(")?;
                    write_joined(f, &composite.children, &separator)?;
                    f.write_str(")")
                }
            },
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Query], separator: &str) -> fmt::Result {
    for (index, child) in children.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{child}")?;
    }
    Ok(())
}
