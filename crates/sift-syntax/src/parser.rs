//! Tree-sitter parsing wrapper.
//!
//! Each evaluation owns its own [`Parser`]; Tree-sitter parsers are not
//! shared between concurrent calls. Parsing is error-tolerant, so a
//! [`ParseResult`] may hold both a usable tree and error nodes.

use std::ops::Range;

use crate::error::SyntaxError;
use crate::language::SupportedLanguage;
use crate::position::point_to_one_based;

/// A parsed syntax tree together with the source it was built from.
#[derive(Debug)]
pub struct ParseResult {
    tree: tree_sitter::Tree,
    source: String,
    language: SupportedLanguage,
}

impl ParseResult {
    /// Returns the parsed syntax tree.
    #[must_use]
    pub const fn tree(&self) -> &tree_sitter::Tree {
        &self.tree
    }

    /// Returns the source code that was parsed.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the source as bytes, as the query cursor expects.
    #[must_use]
    pub fn source_bytes(&self) -> &[u8] {
        self.source.as_bytes()
    }

    /// Returns the language of the parsed code.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Returns the root node of the syntax tree.
    #[must_use]
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Returns whether the tree contains ERROR or MISSING nodes.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Collects every ERROR or MISSING node in document order.
    #[must_use]
    pub fn errors(&self) -> Vec<SyntaxErrorInfo> {
        let mut errors = Vec::new();
        collect_error_nodes(self.tree.root_node(), &mut errors);
        errors
    }
}

/// A syntax error found in parsed source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    /// Byte range of the error in the source.
    pub byte_range: Range<usize>,
    /// Line number (one-based) where the error starts.
    pub line: u32,
    /// Column number (one-based) where the error starts.
    pub column: u32,
    /// Human-readable description of the error.
    pub message: String,
}

impl SyntaxErrorInfo {
    fn from_node(node: tree_sitter::Node<'_>) -> Self {
        let (line, column) = point_to_one_based(node.start_position());
        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else {
            "syntax error".to_owned()
        };
        Self {
            byte_range: node.byte_range(),
            line,
            column,
            message,
        }
    }
}

/// Tree-sitter parser bound to one grammar.
pub struct Parser {
    inner: tree_sitter::Parser,
    language: SupportedLanguage,
}

impl Parser {
    /// Creates a parser using the built-in grammar for `language`.
    ///
    /// # Errors
    ///
    /// Returns an error if Tree-sitter rejects the grammar.
    pub fn new(language: SupportedLanguage) -> Result<Self, SyntaxError> {
        Self::with_grammar(language, &language.tree_sitter_language())
    }

    /// Creates a parser for `language` using a grammar supplied by a
    /// provider.
    ///
    /// # Errors
    ///
    /// Returns an error if Tree-sitter rejects the grammar, typically because
    /// of an ABI version mismatch.
    pub fn with_grammar(
        language: SupportedLanguage,
        grammar: &tree_sitter::Language,
    ) -> Result<Self, SyntaxError> {
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(grammar)
            .map_err(|e| SyntaxError::parser_init(language, e.to_string()))?;
        Ok(Self { inner, language })
    }

    /// Returns the language this parser is configured for.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Parses source code.
    ///
    /// # Errors
    ///
    /// Returns an error if Tree-sitter produces no tree at all.
    pub fn parse(&mut self, source: &str) -> Result<ParseResult, SyntaxError> {
        let tree = self
            .inner
            .parse(source, None)
            .ok_or_else(|| SyntaxError::parse(self.language, "parser produced no tree"))?;

        Ok(ParseResult {
            tree,
            source: source.to_owned(),
            language: self.language,
        })
    }
}

fn collect_error_nodes(node: tree_sitter::Node<'_>, errors: &mut Vec<SyntaxErrorInfo>) {
    if node.is_error() || node.is_missing() {
        errors.push(SyntaxErrorInfo::from_node(node));
    }
    if !node.has_error() {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, errors);
    }
}
