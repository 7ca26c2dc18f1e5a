//! Tagged native pattern templates.
//!
//! Providers describe how each universal kind appears in their grammar as a
//! small tree of [`TemplateNode`]s instead of query text with positional
//! placeholders. The query compiler walks the tree to render Tree-sitter
//! query text and attaches predicates to the named [`Slot`] captures.
//!
//! Conventions:
//!
//! - The node marked with [`TemplateNode::target`] is the one reported as a
//!   match. When no node is marked, the root is the target.
//! - A node capturing [`Slot::Type`] is rendered only when the query carries a
//!   type constraint, so untyped declarations still match plain queries.
//! - [`Element::Members`] marks the position where a child template of one
//!   of the listed kinds may be embedded by a hierarchical query.

use sift_core::NodeKind;

/// A named capture position that predicates attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The primary identifier of the matched construct.
    Name,
    /// The declared type of the matched construct.
    Type,
}

impl Slot {
    /// Returns the capture suffix for this slot.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Type => "type",
        }
    }
}

/// A fixed constraint on the text of a template node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFilter {
    /// The node text equals the value.
    Equals(&'static str),
    /// The node text matches the regex.
    Matches(&'static str),
    /// The node text does not match the regex.
    NotMatches(&'static str),
}

/// The node pattern a template node renders to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    /// A named node type, or `_` for any named node.
    Named(&'static str),
    /// An anonymous token such as `let`.
    Token(&'static str),
    /// Any one of several named node types. Rendered as an alternation, so
    /// it cannot carry children.
    Alternatives(&'static [&'static str]),
}

/// A child position inside a template node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// A fixed child node.
    Node(TemplateNode),
    /// An embedding point for members of the listed kinds.
    Members(&'static [NodeKind]),
}

/// One node of a native pattern template.
///
/// # Example
///
/// ```
/// use sift_syntax::{Slot, TemplateNode};
///
/// let node = TemplateNode::new("function_declaration")
///     .child(TemplateNode::new("identifier").field("name").capture(Slot::Name));
/// assert!(node.has_slot(Slot::Name));
/// assert!(!node.has_slot(Slot::Type));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateNode {
    shape: NodeShape,
    field: Option<&'static str>,
    capture: Option<Slot>,
    filter: Option<TextFilter>,
    target: bool,
    children: Vec<Element>,
}

impl TemplateNode {
    const fn with_shape(shape: NodeShape) -> Self {
        Self {
            shape,
            field: None,
            capture: None,
            filter: None,
            target: false,
            children: Vec::new(),
        }
    }

    /// Creates a node of one named type.
    #[must_use]
    pub const fn new(node_type: &'static str) -> Self {
        Self::with_shape(NodeShape::Named(node_type))
    }

    /// Creates an anonymous token node.
    #[must_use]
    pub const fn token(text: &'static str) -> Self {
        Self::with_shape(NodeShape::Token(text))
    }

    /// Creates a node matching any of several named types.
    #[must_use]
    pub const fn any_of(node_types: &'static [&'static str]) -> Self {
        Self::with_shape(NodeShape::Alternatives(node_types))
    }

    /// Binds the node to a field of its parent.
    #[must_use]
    pub const fn field(mut self, name: &'static str) -> Self {
        self.field = Some(name);
        self
    }

    /// Captures the node into `slot`.
    #[must_use]
    pub const fn capture(mut self, slot: Slot) -> Self {
        self.capture = Some(slot);
        self
    }

    /// Constrains the node text.
    #[must_use]
    pub const fn filter(mut self, filter: TextFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Marks the node as the reported match.
    #[must_use]
    pub const fn target(mut self) -> Self {
        self.target = true;
        self
    }

    /// Appends a fixed child.
    #[must_use]
    pub fn child(mut self, node: Self) -> Self {
        self.children.push(Element::Node(node));
        self
    }

    /// Appends an embedding point for members of `kinds`.
    #[must_use]
    pub fn members(mut self, kinds: &'static [NodeKind]) -> Self {
        self.children.push(Element::Members(kinds));
        self
    }

    /// Returns the node shape.
    #[must_use]
    pub const fn shape(&self) -> NodeShape {
        self.shape
    }

    /// Returns the parent field this node is bound to.
    #[must_use]
    pub const fn field_name(&self) -> Option<&'static str> {
        self.field
    }

    /// Returns the slot this node is captured into.
    #[must_use]
    pub const fn slot(&self) -> Option<Slot> {
        self.capture
    }

    /// Returns the fixed text constraint.
    #[must_use]
    pub const fn text_filter(&self) -> Option<TextFilter> {
        self.filter
    }

    /// Returns whether this node is explicitly marked as the target.
    #[must_use]
    pub const fn is_target(&self) -> bool {
        self.target
    }

    /// Returns the child elements.
    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Returns whether this node or a descendant captures `slot`.
    #[must_use]
    pub fn has_slot(&self, slot: Slot) -> bool {
        self.capture == Some(slot)
            || self.child_nodes().any(|child| child.has_slot(slot))
    }

    /// Returns whether this node or a descendant is marked as the target.
    #[must_use]
    pub fn has_target(&self) -> bool {
        self.target || self.child_nodes().any(Self::has_target)
    }

    /// Returns whether an embedding point below this node accepts `kind`.
    #[must_use]
    pub fn accepts_member(&self, kind: NodeKind) -> bool {
        self.children.iter().any(|element| match element {
            Element::Node(child) => child.accepts_member(kind),
            Element::Members(kinds) => kinds.contains(&kind),
        })
    }

    fn child_nodes(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|element| match element {
            Element::Node(child) => Some(child),
            Element::Members(_) => None,
        })
    }
}

/// A complete native pattern for one structural form of a kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    root: TemplateNode,
    quoted_name: bool,
}

impl Template {
    /// Creates a template rooted at `root`.
    #[must_use]
    pub const fn new(root: TemplateNode) -> Self {
        Self {
            root,
            quoted_name: false,
        }
    }

    /// Declares that the name capture is a string literal including its
    /// quotes, as with Go import paths.
    #[must_use]
    pub const fn quoted_name(mut self) -> Self {
        self.quoted_name = true;
        self
    }

    /// Returns the root node.
    #[must_use]
    pub const fn root(&self) -> &TemplateNode {
        &self.root
    }

    /// Returns whether the name capture includes surrounding quotes.
    #[must_use]
    pub const fn is_name_quoted(&self) -> bool {
        self.quoted_name
    }

    /// Returns whether any node captures `slot`.
    #[must_use]
    pub fn has_slot(&self, slot: Slot) -> bool {
        self.root.has_slot(slot)
    }

    /// Returns whether an embedding point accepts `kind`.
    #[must_use]
    pub fn accepts_member(&self, kind: NodeKind) -> bool {
        self.root.accepts_member(kind)
    }

    /// Returns whether the reported node is the root.
    #[must_use]
    pub fn target_is_root(&self) -> bool {
        self.root.target || !self.root.has_target()
    }
}

/// How one universal kind maps onto a provider's grammar.
///
/// `templates` are tried together: a match of any of them is a match of the
/// kind. `wildcard_templates` are cheaper forms without identifier captures,
/// preferred for a bare `*` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeMapping {
    kind: NodeKind,
    native_node_types: Vec<&'static str>,
    templates: Vec<Template>,
    wildcard_templates: Vec<Template>,
    multi_identifier: bool,
}

impl NodeMapping {
    /// Creates an empty mapping for `kind` over the listed native types.
    #[must_use]
    pub fn new(kind: NodeKind, native_node_types: &[&'static str]) -> Self {
        Self {
            kind,
            native_node_types: native_node_types.to_vec(),
            templates: Vec::new(),
            wildcard_templates: Vec::new(),
            multi_identifier: false,
        }
    }

    /// Adds a base template.
    #[must_use]
    pub fn template(mut self, template: Template) -> Self {
        self.templates.push(template);
        self
    }

    /// Adds a wildcard-only template.
    #[must_use]
    pub fn wildcard(mut self, template: Template) -> Self {
        self.wildcard_templates.push(template);
        self
    }

    /// Declares that one declaration can bind several identifiers.
    #[must_use]
    pub const fn multi_identifier(mut self) -> Self {
        self.multi_identifier = true;
        self
    }

    /// Returns the universal kind.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the native node types this mapping covers.
    #[must_use]
    pub fn native_node_types(&self) -> &[&'static str] {
        &self.native_node_types
    }

    /// Returns the base templates.
    #[must_use]
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Returns the wildcard-only templates.
    #[must_use]
    pub fn wildcard_templates(&self) -> &[Template] {
        &self.wildcard_templates
    }

    /// Returns whether grouped declarations bind several identifiers.
    #[must_use]
    pub const fn is_multi_identifier(&self) -> bool {
        self.multi_identifier
    }

    /// Returns whether any base template captures the identifier.
    #[must_use]
    pub fn has_name_slot(&self) -> bool {
        self.templates.iter().any(|template| template.has_slot(Slot::Name))
    }

    /// Returns whether any base template captures a declared type.
    #[must_use]
    pub fn has_type_slot(&self) -> bool {
        self.templates.iter().any(|template| template.has_slot(Slot::Type))
    }
}
