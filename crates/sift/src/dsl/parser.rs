//! Recursive-descent parser from tokens to a [`Query`].
//!
//! Precedence, tightest first: `!`, `>`, `&`, `|`. Hierarchies are
//! right-recursive and chains of one boolean operator collect into a single
//! n-ary node.

use sift_core::{LeafQuery, NodeKind, ParseError, Pattern, Query};

use super::lexer::{Token, TokenKind, tokenize};

const QUOTE_CHARS: [char; 3] = ['"', '\'', '`'];

/// Parses query text into a [`Query`].
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first problem found. Nothing is
/// coerced: `if:name` is rejected rather than read as `if:*`.
///
/// # Example
///
/// ```
/// use sift::parse;
///
/// let query = parse("struct:User > field:Name")?;
/// assert_eq!(query.to_string(), "class:User > field:Name");
/// # Ok::<(), sift::ParseError>(())
/// ```
pub fn parse(text: &str) -> Result<Query, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    let mut parser = QueryParser {
        tokens: tokenize(text)?,
        position: 0,
    };
    let query = parser.disjunction()?;
    match parser.advance() {
        None => Ok(query),
        Some(token) if token.kind == TokenKind::Close => Err(ParseError::UnbalancedParenthesis {
            offset: token.offset,
        }),
        Some(token) => Err(ParseError::unexpected(token.offset, token.text())),
    }
}

struct QueryParser {
    tokens: Vec<Token>,
    position: usize,
}

impl QueryParser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    /// Consumes the next token if it spells `operator`.
    fn eat_boolean(&mut self, operator: &TokenKind) -> Option<Token> {
        let matches = self
            .peek()
            .and_then(Token::boolean_operator)
            .is_some_and(|found| &found == operator);
        if matches { self.advance() } else { None }
    }

    fn eat(&mut self, kind: &TokenKind) -> Option<Token> {
        if self.peek().is_some_and(|token| &token.kind == kind) {
            self.advance()
        } else {
            None
        }
    }

    /// Fails with [`ParseError::EmptySegment`] unless an operand can start at
    /// the current position.
    fn require_operand(&self, operator: &Token) -> Result<(), ParseError> {
        let missing = self.peek().is_none_or(|token| {
            token.boolean_operator().is_some()
                || matches!(token.kind, TokenKind::Child | TokenKind::Close)
        });
        if missing {
            return Err(ParseError::empty_segment(operator.offset, operator.text()));
        }
        Ok(())
    }

    fn disjunction(&mut self) -> Result<Query, ParseError> {
        let mut operands = vec![self.conjunction()?];
        while let Some(operator) = self.eat_boolean(&TokenKind::Or) {
            self.require_operand(&operator)?;
            operands.push(self.conjunction()?);
        }
        Ok(collect(operands, Query::or))
    }

    fn conjunction(&mut self) -> Result<Query, ParseError> {
        let mut operands = vec![self.hierarchy()?];
        while let Some(operator) = self.eat_boolean(&TokenKind::And) {
            self.require_operand(&operator)?;
            operands.push(self.hierarchy()?);
        }
        Ok(collect(operands, Query::and))
    }

    fn hierarchy(&mut self) -> Result<Query, ParseError> {
        let parent = self.unary()?;
        let Some(operator) = self.eat(&TokenKind::Child) else {
            return Ok(parent);
        };
        self.require_operand(&operator)?;
        let child = self.hierarchy()?;
        Ok(Query::hierarchy(parent, child))
    }

    fn unary(&mut self) -> Result<Query, ParseError> {
        let Some(bang) = self.eat(&TokenKind::Bang) else {
            return self.primary();
        };
        let dangling = self.peek().is_none_or(|token| {
            token.boolean_operator().is_some()
                || matches!(token.kind, TokenKind::Child | TokenKind::Close)
        });
        if dangling {
            return Err(ParseError::UnterminatedNegation {
                offset: bang.offset,
            });
        }
        Ok(negate(self.unary()?))
    }

    fn primary(&mut self) -> Result<Query, ParseError> {
        let Some(token) = self.advance() else {
            return Err(ParseError::Empty);
        };
        if token.boolean_operator().is_some() {
            return Err(ParseError::empty_segment(token.offset, token.text()));
        }
        match &token.kind {
            TokenKind::Open => self.group(&token),
            TokenKind::Close => Err(ParseError::UnbalancedParenthesis {
                offset: token.offset,
            }),
            TokenKind::Child => Err(ParseError::empty_segment(token.offset, token.text())),
            TokenKind::Word(word) => self.leaf(word, token.offset),
            TokenKind::Bang | TokenKind::And | TokenKind::Or => {
                Err(ParseError::unexpected(token.offset, token.text()))
            }
        }
    }

    fn group(&mut self, open: &Token) -> Result<Query, ParseError> {
        if let Some(close) = self.eat(&TokenKind::Close) {
            return Err(ParseError::unexpected(close.offset, close.text()));
        }
        let inner = self.disjunction()?;
        match self.advance() {
            Some(token) if token.kind == TokenKind::Close => Ok(inner),
            Some(token) => Err(ParseError::unexpected(token.offset, token.text())),
            None => Err(ParseError::UnbalancedParenthesis {
                offset: open.offset,
            }),
        }
    }

    fn leaf(&mut self, word: &str, offset: usize) -> Result<Query, ParseError> {
        let (kind_text, inline_pattern, pattern_offset) = self.split_kind(word, offset)?;
        let kind = NodeKind::from_alias(&kind_text)
            .ok_or_else(|| ParseError::unknown_kind(offset, kind_text.clone()))?;

        let pattern_text = if inline_pattern.is_empty() {
            self.detached_pattern()
                .ok_or(ParseError::EmptyPattern {
                    offset: pattern_offset,
                    kind,
                })?
        } else {
            inline_pattern
        };
        let pattern = leaf_pattern(kind, &pattern_text)?;
        let mut leaf = LeafQuery::new(kind, pattern);

        if let Some(type_word) = self.trailing_word() {
            if type_word.text().contains(':') {
                return Err(ParseError::unexpected(type_word.offset, type_word.text()));
            }
            if !kind.accepts_type_constraint() {
                return Err(ParseError::UnsupportedTypeConstraint {
                    offset: type_word.offset,
                    kind,
                });
            }
            self.advance();
            let text = type_word.text();
            let type_pattern =
                Pattern::parse(&text).ok_or(ParseError::InvalidWildcard { pattern: text })?;
            leaf = leaf.with_type(type_pattern);
        }
        if let Some(extra) = self.trailing_word() {
            return Err(ParseError::unexpected(extra.offset, extra.text()));
        }
        Ok(Query::leaf(leaf))
    }

    /// Splits `kind:pattern`, allowing whitespace on either side of the
    /// colon. Returns the kind word, the pattern text if it was attached, and
    /// the offset where the pattern should start.
    fn split_kind(
        &mut self,
        word: &str,
        offset: usize,
    ) -> Result<(String, String, usize), ParseError> {
        if let Some((kind, pattern)) = word.split_once(':') {
            if kind.is_empty() {
                return Err(ParseError::missing_separator(offset, word));
            }
            return Ok((kind.to_owned(), pattern.to_owned(), offset + kind.len() + 1));
        }
        let separated = self
            .peek()
            .and_then(|token| token.word().map(|next| (next.to_owned(), token.offset)))
            .and_then(|(next, next_offset)| {
                next.strip_prefix(':')
                    .map(|pattern| (pattern.to_owned(), next_offset + 1))
            });
        let Some((pattern, pattern_offset)) = separated else {
            return Err(ParseError::missing_separator(offset, word));
        };
        self.advance();
        Ok((word.to_owned(), pattern, pattern_offset))
    }

    /// Consumes a pattern written as its own word, as in `func: main`.
    fn detached_pattern(&mut self) -> Option<String> {
        let token = self.trailing_word()?;
        if token.text().contains(':') {
            return None;
        }
        self.advance();
        Some(token.text())
    }

    /// Returns the next token if it is a plain word rather than an operator
    /// keyword.
    fn trailing_word(&self) -> Option<Token> {
        self.peek()
            .filter(|token| token.word().is_some() && token.boolean_operator().is_none())
            .cloned()
    }
}

fn collect(mut operands: Vec<Query>, build: fn(Vec<Query>) -> Query) -> Query {
    if operands.len() == 1
        && let Some(single) = operands.pop()
    {
        return single;
    }
    build(operands)
}

/// Applies `!` to a parsed operand.
///
/// A leaf with something to negate flips its predicate polarity; a bare
/// `kind:*` or any composite becomes a `NOT` node evaluated by set
/// difference.
fn negate(operand: Query) -> Query {
    match operand {
        Query::Leaf(leaf) if !leaf.pattern().is_any() || leaf.type_constraint().is_some() => {
            let negated = !leaf.is_negated();
            Query::leaf(leaf.with_negation(negated))
        }
        other => Query::not(other),
    }
}

fn leaf_pattern(kind: NodeKind, text: &str) -> Result<Pattern, ParseError> {
    if kind.is_import_like() && text.contains(QUOTE_CHARS) {
        return Err(ParseError::QuotedImport {
            pattern: text.to_owned(),
        });
    }
    let pattern = Pattern::parse(text).ok_or_else(|| ParseError::InvalidWildcard {
        pattern: text.to_owned(),
    })?;
    if kind.is_wildcard_only() && !pattern.is_any() {
        return Err(ParseError::WildcardOnly {
            kind,
            pattern: text.to_owned(),
        });
    }
    Ok(pattern)
}
