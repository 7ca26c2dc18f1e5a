//! Tokeniser for query text.
//!
//! Words run until whitespace or one of `> & | ! ( )`. Colons stay inside
//! words so that paths such as `std::io` survive; the parser splits the
//! `kind:` prefix off itself.

use sift_core::ParseError;

/// One lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// A run of non-operator characters.
    Word(String),
    /// `>`
    Child,
    /// `&` or `&&`
    And,
    /// `|` or `||`
    Or,
    /// `!`
    Bang,
    /// `(`
    Open,
    /// `)`
    Close,
}

/// A token and the byte offset it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) offset: usize,
}

impl Token {
    /// Returns the token as it would appear in query text.
    pub(crate) fn text(&self) -> String {
        match &self.kind {
            TokenKind::Word(word) => word.clone(),
            TokenKind::Child => ">".to_owned(),
            TokenKind::And => "&".to_owned(),
            TokenKind::Or => "|".to_owned(),
            TokenKind::Bang => "!".to_owned(),
            TokenKind::Open => "(".to_owned(),
            TokenKind::Close => ")".to_owned(),
        }
    }

    /// Returns the word text, if this is a word.
    pub(crate) fn word(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Word(word) => Some(word),
            _ => None,
        }
    }

    /// Returns the boolean operator this token spells, including the `and`
    /// and `or` keywords.
    pub(crate) fn boolean_operator(&self) -> Option<TokenKind> {
        match &self.kind {
            TokenKind::And => Some(TokenKind::And),
            TokenKind::Or => Some(TokenKind::Or),
            TokenKind::Word(word) if word.eq_ignore_ascii_case("and") => Some(TokenKind::And),
            TokenKind::Word(word) if word.eq_ignore_ascii_case("or") => Some(TokenKind::Or),
            _ => None,
        }
    }
}

const fn is_operator_char(c: char) -> bool {
    matches!(c, '>' | '&' | '|' | '!' | '(' | ')')
}

/// Splits query text into tokens.
pub(crate) fn tokenize(text: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        let kind = match c {
            _ if c.is_whitespace() => continue,
            '>' => TokenKind::Child,
            '!' => TokenKind::Bang,
            '(' => TokenKind::Open,
            ')' => TokenKind::Close,
            '&' | '|' => {
                if chars.next_if(|&(_, next)| next == c).is_some()
                    && chars.peek().is_some_and(|&(_, next)| next == c)
                {
                    return Err(ParseError::unexpected(offset, c.to_string().repeat(3)));
                }
                if c == '&' {
                    TokenKind::And
                } else {
                    TokenKind::Or
                }
            }
            _ => {
                let mut end = offset + c.len_utf8();
                while let Some((next_offset, next)) =
                    chars.next_if(|&(_, next)| !next.is_whitespace() && !is_operator_char(next))
                {
                    end = next_offset + next.len_utf8();
                }
                let word = text.get(offset..end).unwrap_or_default();
                TokenKind::Word(word.to_owned())
            }
        };
        tokens.push(Token { kind, offset });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text)
            .expect("tokenize")
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    fn word(text: &str) -> TokenKind {
        TokenKind::Word(text.to_owned())
    }

    #[test]
    fn splits_operators_from_words() {
        assert_eq!(
            kinds("class:User>field:Name"),
            vec![word("class:User"), TokenKind::Child, word("field:Name")]
        );
    }

    #[test]
    fn doubled_operators_are_one_token() {
        assert_eq!(
            kinds("a:b && c:d || e:f"),
            vec![
                word("a:b"),
                TokenKind::And,
                word("c:d"),
                TokenKind::Or,
                word("e:f")
            ]
        );
    }

    #[test]
    fn colons_stay_inside_words() {
        assert_eq!(kinds("use:std::io"), vec![word("use:std::io")]);
    }

    #[test]
    fn offsets_are_byte_positions() {
        let tokens = tokenize("  !(func:a)").expect("tokenize");
        let offsets: Vec<_> = tokens.iter().map(|token| token.offset).collect();
        assert_eq!(offsets, vec![2, 3, 4, 10]);
    }

    #[test]
    fn keywords_are_boolean_operators() {
        let tokens = tokenize("AND or").expect("tokenize");
        let operators: Vec<_> = tokens.iter().map(Token::boolean_operator).collect();
        assert_eq!(operators, vec![Some(TokenKind::And), Some(TokenKind::Or)]);
    }

    #[test]
    fn tripled_operator_is_rejected() {
        assert!(matches!(
            tokenize("a:b &&& c:d"),
            Err(ParseError::UnexpectedToken { offset: 4, .. })
        ));
    }
}
