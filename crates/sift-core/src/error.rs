//! Error types for parsing, compiling, and evaluating queries.
//!
//! Each pipeline stage has its own enum. [`SiftError`] unifies them for the
//! engine entry points. All of them are surfaced to the caller; only
//! per-node extraction problems are recovered inside the evaluator.

use thiserror::Error;

use crate::kind::NodeKind;
use crate::query::Operator;

/// Malformed query text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// The query text was empty or whitespace.
    #[error("query is empty")]
    Empty,

    /// A leaf lacked the `kind:` separator.
    #[error("expected `kind:pattern` at offset {offset}, found `{found}`")]
    MissingSeparator {
        /// Byte offset of the offending token.
        offset: usize,
        /// The offending token.
        found: String,
    },

    /// The kind word is not part of the vocabulary.
    #[error("unknown node kind `{kind}` at offset {offset}")]
    UnknownKind {
        /// Byte offset of the kind word.
        offset: usize,
        /// The unrecognised word.
        kind: String,
    },

    /// Nothing followed `kind:`.
    #[error("missing pattern after `{kind}:` at offset {offset}")]
    EmptyPattern {
        /// Byte offset just after the separator.
        offset: usize,
        /// The kind that lacked a pattern.
        kind: NodeKind,
    },

    /// An operator had an empty operand, as in `a > > b` or `a &`.
    #[error("empty operand for `{operator}` at offset {offset}")]
    EmptySegment {
        /// Byte offset of the operator.
        offset: usize,
        /// The operator symbol.
        operator: String,
    },

    /// A concrete identifier was given for a kind that only accepts `*`.
    #[error("`{kind}` only accepts `*`, found `{pattern}`")]
    WildcardOnly {
        /// The wildcard-only kind.
        kind: NodeKind,
        /// The rejected pattern.
        pattern: String,
    },

    /// An import path contained a quote character.
    #[error("import paths must be unquoted, found `{pattern}`")]
    QuotedImport {
        /// The rejected pattern.
        pattern: String,
    },

    /// A wildcard expression did not fit `X*`, `*X`, `*X*`, or `X*Y`.
    #[error("invalid wildcard `{pattern}`: expected X*, *X, *X* or X*Y")]
    InvalidWildcard {
        /// The rejected pattern.
        pattern: String,
    },

    /// `!` was not followed by a query.
    #[error("`!` at offset {offset} is not followed by a query")]
    UnterminatedNegation {
        /// Byte offset of the `!`.
        offset: usize,
    },

    /// A parenthesis was not closed or not opened.
    #[error("unbalanced parenthesis at offset {offset}")]
    UnbalancedParenthesis {
        /// Byte offset of the parenthesis.
        offset: usize,
    },

    /// A token appeared where it cannot.
    #[error("unexpected `{token}` at offset {offset}")]
    UnexpectedToken {
        /// Byte offset of the token.
        offset: usize,
        /// The token text.
        token: String,
    },

    /// A type constraint followed a kind that has none.
    #[error("`{kind}` does not accept a type constraint (offset {offset})")]
    UnsupportedTypeConstraint {
        /// Byte offset of the type word.
        offset: usize,
        /// The kind that was given a type.
        kind: NodeKind,
    },
}

impl ParseError {
    /// Creates a missing-separator error.
    #[must_use]
    pub fn missing_separator(offset: usize, found: impl Into<String>) -> Self {
        Self::MissingSeparator {
            offset,
            found: found.into(),
        }
    }

    /// Creates an unknown-kind error.
    #[must_use]
    pub fn unknown_kind(offset: usize, kind: impl Into<String>) -> Self {
        Self::UnknownKind {
            offset,
            kind: kind.into(),
        }
    }

    /// Creates an empty-segment error.
    #[must_use]
    pub fn empty_segment(offset: usize, operator: impl Into<String>) -> Self {
        Self::EmptySegment {
            offset,
            operator: operator.into(),
        }
    }

    /// Creates an unexpected-token error.
    #[must_use]
    pub fn unexpected(offset: usize, token: impl Into<String>) -> Self {
        Self::UnexpectedToken {
            offset,
            token: token.into(),
        }
    }
}

/// Failure translating a leaf into a native pattern.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompileError {
    /// The active provider has no mapping for the kind.
    #[error("{language} does not support `{kind}` queries")]
    UnsupportedKind {
        /// The unmapped kind.
        kind: NodeKind,
        /// The provider's language.
        language: String,
    },

    /// A concrete identifier reached the compiler for a wildcard-only kind.
    #[error("`{kind}` only accepts `*`, found `{pattern}`")]
    WildcardOnly {
        /// The wildcard-only kind.
        kind: NodeKind,
        /// The rejected pattern.
        pattern: String,
    },

    /// A predicate was built but no template exposes the slot it targets.
    #[error("no `{slot}` capture available for `{kind}` in {language}")]
    MissingSlot {
        /// The kind being compiled.
        kind: NodeKind,
        /// The missing slot name.
        slot: String,
        /// The provider's language.
        language: String,
    },

    /// A translated wildcard was rejected by the regex engine.
    #[error("wildcard `{pattern}` produced an invalid regex: {message}")]
    InvalidRegex {
        /// The wildcard text.
        pattern: String,
        /// Regex engine message.
        message: String,
    },
}

impl CompileError {
    /// Creates an unsupported-kind error.
    #[must_use]
    pub fn unsupported_kind(kind: NodeKind, language: impl Into<String>) -> Self {
        Self::UnsupportedKind {
            kind,
            language: language.into(),
        }
    }

    /// Creates a missing-slot error.
    #[must_use]
    pub fn missing_slot(
        kind: NodeKind,
        slot: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self::MissingSlot {
            kind,
            slot: slot.into(),
            language: language.into(),
        }
    }
}

/// Failure while evaluating a compiled query against a source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    /// The source text was empty.
    #[error("source is empty")]
    EmptySource,

    /// The provider supplied no grammar.
    #[error("no grammar available for {language}")]
    MissingGrammar {
        /// The provider's language.
        language: String,
    },

    /// The native parser rejected the grammar or produced no tree.
    #[error("failed to parse {language} source: {message}")]
    Parser {
        /// The provider's language.
        language: String,
        /// Description of the failure.
        message: String,
    },

    /// The native engine rejected a compiled pattern.
    #[error("invalid native pattern for {language} at offset {offset}: {message}")]
    Pattern {
        /// The provider's language.
        language: String,
        /// Byte offset into the pattern text.
        offset: usize,
        /// Description of the failure.
        message: String,
    },

    /// A compiled pattern has no result marker capture.
    #[error("compiled pattern has no `@{capture}` capture")]
    MissingTarget {
        /// The expected marker capture name.
        capture: String,
    },

    /// `AND`/`OR` was applied to fewer than two operands, or `NOT` to other
    /// than one.
    #[error("{operator} expects {expected} operand(s), found {found}")]
    Arity {
        /// The operator.
        operator: Operator,
        /// Human-readable expectation.
        expected: &'static str,
        /// Number of operands given.
        found: usize,
    },
}

impl EvalError {
    /// Creates a missing-grammar error.
    #[must_use]
    pub fn missing_grammar(language: impl Into<String>) -> Self {
        Self::MissingGrammar {
            language: language.into(),
        }
    }

    /// Creates a parser error.
    #[must_use]
    pub fn parser(language: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parser {
            language: language.into(),
            message: message.into(),
        }
    }

    /// Creates a native pattern error.
    #[must_use]
    pub fn pattern(language: impl Into<String>, offset: usize, message: impl Into<String>) -> Self {
        Self::Pattern {
            language: language.into(),
            offset,
            message: message.into(),
        }
    }
}

/// Any failure raised by the engine entry points.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SiftError {
    /// The query text was malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A leaf could not be compiled for the active provider.
    #[error(transparent)]
    Compile(#[from] CompileError),
    /// Evaluation failed.
    #[error(transparent)]
    Eval(#[from] EvalError),
}
