//! Uniform match records produced by evaluation.
//!
//! A [`QueryResult`] describes one matched syntax node in language-neutral
//! terms. A [`ResultSet`] is an ordered collection of them. Set operations
//! compare results by [`NodeId`], the identity of the originating native
//! node, never by value equality.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::kind::{NodeKind, ScopeType};
use crate::location::Location;

/// Identity of a native syntax node within one parsed tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    /// Start byte offset of the node.
    pub start_byte: usize,
    /// End byte offset of the node.
    pub end_byte: usize,
    /// Grammar-specific numeric node type.
    pub kind_id: u16,
}

impl NodeId {
    /// Creates a node identity.
    #[must_use]
    pub const fn new(start_byte: usize, end_byte: usize, kind_id: u16) -> Self {
        Self {
            start_byte,
            end_byte,
            kind_id,
        }
    }
}

/// One matched node.
///
/// # Example
///
/// ```
/// use sift_core::{LineCol, Location, NodeId, NodeKind, QueryResult, ScopeType};
///
/// let location = Location::new(0, 16, LineCol::new(1, 1), LineCol::new(1, 17));
/// let result = QueryResult::new(
///     NodeId::new(0, 16, 7),
///     NodeKind::Function,
///     String::from("main"),
///     location,
///     String::from("func main() {}"),
/// )
/// .with_scope(ScopeType::File);
/// assert_eq!(result.name(), "main");
/// assert!(result.parent_kind().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Identity of the originating native node.
    pub node: NodeId,
    /// Universal kind of the node.
    pub kind: NodeKind,
    /// Display name reported by the provider.
    pub name: String,
    /// Position of the node.
    pub location: Location,
    /// Source text of the node.
    pub content: String,
    /// Provider attributes plus query provenance.
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// Kind of the nearest structural parent, if any.
    pub parent_kind: Option<NodeKind>,
    /// Name of the nearest structural parent, if any.
    pub parent_name: Option<String>,
    /// Enclosing lexical scope.
    pub scope: ScopeType,
}

impl QueryResult {
    /// Creates a result with empty metadata, no parent, and file scope.
    #[must_use]
    pub const fn new(
        node: NodeId,
        kind: NodeKind,
        name: String,
        location: Location,
        content: String,
    ) -> Self {
        Self {
            node,
            kind,
            name,
            location,
            content,
            metadata: BTreeMap::new(),
            parent_kind: None,
            parent_name: None,
            scope: ScopeType::File,
        }
    }

    /// Replaces the metadata map.
    #[must_use]
    pub fn with_metadata(mut self, metadata: BTreeMap<String, serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Records the structural parent.
    #[must_use]
    pub fn with_parent(mut self, kind: NodeKind, name: impl Into<String>) -> Self {
        self.parent_kind = Some(kind);
        self.parent_name = Some(name.into());
        self
    }

    /// Sets the enclosing scope.
    #[must_use]
    pub const fn with_scope(mut self, scope: ScopeType) -> Self {
        self.scope = scope;
        self
    }

    /// Returns the node identity.
    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// Returns the universal kind.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the location.
    #[must_use]
    pub const fn location(&self) -> &Location {
        &self.location
    }

    /// Returns the matched source text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the metadata map.
    #[must_use]
    pub const fn metadata(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.metadata
    }

    /// Returns a metadata entry as a string, if present and textual.
    #[must_use]
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(serde_json::Value::as_str)
    }

    /// Returns the parent kind.
    #[must_use]
    pub const fn parent_kind(&self) -> Option<NodeKind> {
        self.parent_kind
    }

    /// Returns the parent name.
    #[must_use]
    pub fn parent_name(&self) -> Option<&str> {
        self.parent_name.as_deref()
    }

    /// Returns the enclosing scope.
    #[must_use]
    pub const fn scope(&self) -> ScopeType {
        self.scope
    }
}

/// An ordered collection of results.
///
/// `total_matches` counts every match the producing evaluation saw, which can
/// exceed `len()` when a result limit truncated the set.
///
/// # Example
///
/// ```
/// use sift_core::ResultSet;
///
/// let set = ResultSet::default();
/// assert!(set.is_empty());
/// assert_eq!(set.total_matches(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    results: Vec<QueryResult>,
    total_matches: usize,
}

impl ResultSet {
    /// Creates a set whose total equals the number of results.
    #[must_use]
    pub fn new(results: Vec<QueryResult>) -> Self {
        let total_matches = results.len();
        Self {
            results,
            total_matches,
        }
    }

    /// Creates a set with an explicit total match count.
    #[must_use]
    pub const fn with_total(results: Vec<QueryResult>, total_matches: usize) -> Self {
        Self {
            results,
            total_matches,
        }
    }

    /// Returns the results in order.
    #[must_use]
    pub fn results(&self) -> &[QueryResult] {
        &self.results
    }

    /// Consumes the set, returning its results.
    #[must_use]
    pub fn into_results(self) -> Vec<QueryResult> {
        self.results
    }

    /// Returns the total match count.
    #[must_use]
    pub const fn total_matches(&self) -> usize {
        self.total_matches
    }

    /// Returns the number of results held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns whether the set holds no results.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterates over the results.
    pub fn iter(&self) -> std::slice::Iter<'_, QueryResult> {
        self.results.iter()
    }

    /// Returns the identities of every result.
    #[must_use]
    pub fn node_ids(&self) -> HashSet<NodeId> {
        self.results.iter().map(QueryResult::node).collect()
    }

    /// Returns whether a result over `node` is present.
    #[must_use]
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.results.iter().any(|result| result.node == node)
    }

    /// Returns the result names in order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.results.iter().map(QueryResult::name).collect()
    }

    /// Returns a new set keeping the first result for each node identity.
    #[must_use]
    pub fn dedup(&self) -> Self {
        let mut seen = HashSet::new();
        let results: Vec<_> = self
            .results
            .iter()
            .filter(|result| seen.insert(result.node))
            .cloned()
            .collect();
        Self::new(results)
    }
}

impl IntoIterator for ResultSet {
    type Item = QueryResult;
    type IntoIter = std::vec::IntoIter<QueryResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a QueryResult;
    type IntoIter = std::slice::Iter<'a, QueryResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl FromIterator<QueryResult> for ResultSet {
    fn from_iter<I: IntoIterator<Item = QueryResult>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
