//! Universal node kinds and lexical scopes.
//!
//! Every language provider maps its native grammar onto the closed set of
//! [`NodeKind`] values defined here, which is what lets one query text run
//! unchanged against Go, Python, TypeScript, JavaScript or Rust sources.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A language-independent syntactic concept.
///
/// # Example
///
/// ```
/// use sift_core::NodeKind;
///
/// assert_eq!(NodeKind::from_alias("func"), Some(NodeKind::Function));
/// assert_eq!(NodeKind::from_alias("struct"), Some(NodeKind::Class));
/// assert_eq!(NodeKind::Condition.to_string(), "condition");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Free-standing function declarations.
    Function,
    /// Classes, structs, and interfaces.
    Class,
    /// Functions bound to a receiver or declared in a class body.
    Method,
    /// Variable declarations.
    Variable,
    /// Constant declarations.
    Constant,
    /// Struct fields and class properties.
    Field,
    /// Import statements.
    Import,
    /// Call expressions.
    Call,
    /// Assignment statements.
    Assignment,
    /// Conditional statements.
    Condition,
    /// Loop statements.
    Loop,
    /// Generic statement blocks.
    Block,
    /// Comments.
    Comment,
    /// Decorators, annotations, and attributes.
    Decorator,
    /// Type declarations and aliases.
    Type,
}

impl NodeKind {
    /// Resolves a DSL kind word, including its short aliases.
    ///
    /// Matching is case-insensitive. Returns `None` for unknown words.
    #[must_use]
    pub fn from_alias(word: &str) -> Option<Self> {
        let normalised = word.trim().to_ascii_lowercase();
        let kind = match normalised.as_str() {
            "function" | "func" | "fn" | "def" => Self::Function,
            "class" | "struct" | "interface" => Self::Class,
            "method" => Self::Method,
            "variable" | "var" | "let" => Self::Variable,
            "constant" | "const" => Self::Constant,
            "field" | "property" | "prop" => Self::Field,
            "import" | "use" => Self::Import,
            "call" => Self::Call,
            "assignment" | "assign" => Self::Assignment,
            "condition" | "if" => Self::Condition,
            "loop" | "for" | "while" => Self::Loop,
            "block" => Self::Block,
            "comment" => Self::Comment,
            "decorator" | "annotation" | "attribute" => Self::Decorator,
            "type" => Self::Type,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns the canonical lower-case name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Class => "class",
            Self::Method => "method",
            Self::Variable => "variable",
            Self::Constant => "constant",
            Self::Field => "field",
            Self::Import => "import",
            Self::Call => "call",
            Self::Assignment => "assignment",
            Self::Condition => "condition",
            Self::Loop => "loop",
            Self::Block => "block",
            Self::Comment => "comment",
            Self::Decorator => "decorator",
            Self::Type => "type",
        }
    }

    /// Returns whether the kind has no stable identifier and therefore only
    /// accepts the `*` pattern.
    #[must_use]
    pub const fn is_wildcard_only(self) -> bool {
        matches!(self, Self::Condition | Self::Loop | Self::Block)
    }

    /// Returns whether patterns for this kind name an import path.
    #[must_use]
    pub const fn is_import_like(self) -> bool {
        matches!(self, Self::Import)
    }

    /// Returns whether the DSL accepts a trailing type constraint for this
    /// kind (`var:count int`).
    #[must_use]
    pub const fn accepts_type_constraint(self) -> bool {
        matches!(self, Self::Variable | Self::Constant | Self::Field)
    }

    /// Returns all kinds in declaration order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Function,
            Self::Class,
            Self::Method,
            Self::Variable,
            Self::Constant,
            Self::Field,
            Self::Import,
            Self::Call,
            Self::Assignment,
            Self::Condition,
            Self::Loop,
            Self::Block,
            Self::Comment,
            Self::Decorator,
            Self::Type,
        ]
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The lexical scope enclosing a matched node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeType {
    /// Top level of a source file.
    #[default]
    File,
    /// Inside a class, struct, or interface body.
    Class,
    /// Inside a function or method body.
    Function,
    /// Inside a nested statement block.
    Block,
}

impl ScopeType {
    /// Returns the lower-case name of this scope.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Class => "class",
            Self::Function => "function",
            Self::Block => "block",
        }
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
