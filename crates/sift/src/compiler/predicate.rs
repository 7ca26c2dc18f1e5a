//! Identity predicates and wildcard translation.

use sift_core::{CompileError, Pattern, WildcardShape};

/// A Tree-sitter text predicate operator.
///
/// Polarity and quantification are independent: every operator has a
/// negated counterpart and an `any-` form for captures that bind several
/// nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateOp {
    /// `#eq?`
    Eq,
    /// `#not-eq?`
    NotEq,
    /// `#any-eq?`
    AnyEq,
    /// `#any-not-eq?`
    AnyNotEq,
    /// `#match?`
    Match,
    /// `#not-match?`
    NotMatch,
    /// `#any-match?`
    AnyMatch,
    /// `#any-not-match?`
    AnyNotMatch,
}

impl PredicateOp {
    /// Selects the operator for a predicate.
    #[must_use]
    pub const fn select(regex: bool, negated: bool, quantified: bool) -> Self {
        match (regex, negated, quantified) {
            (false, false, false) => Self::Eq,
            (false, true, false) => Self::NotEq,
            (false, false, true) => Self::AnyEq,
            (false, true, true) => Self::AnyNotEq,
            (true, false, false) => Self::Match,
            (true, true, false) => Self::NotMatch,
            (true, false, true) => Self::AnyMatch,
            (true, true, true) => Self::AnyNotMatch,
        }
    }

    /// Returns the operator with its polarity flipped.
    #[must_use]
    pub const fn negate(self) -> Self {
        Self::select(self.is_regex(), !self.is_negated(), self.is_quantified())
    }

    /// Returns whether the operator compares against a regex.
    #[must_use]
    pub const fn is_regex(self) -> bool {
        matches!(
            self,
            Self::Match | Self::NotMatch | Self::AnyMatch | Self::AnyNotMatch
        )
    }

    /// Returns whether the operator is a negated form.
    #[must_use]
    pub const fn is_negated(self) -> bool {
        matches!(
            self,
            Self::NotEq | Self::AnyNotEq | Self::NotMatch | Self::AnyNotMatch
        )
    }

    /// Returns whether the operator is an `any-` form.
    #[must_use]
    pub const fn is_quantified(self) -> bool {
        matches!(
            self,
            Self::AnyEq | Self::AnyNotEq | Self::AnyMatch | Self::AnyNotMatch
        )
    }

    /// Returns the predicate name including `#` and `?`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "#eq?",
            Self::NotEq => "#not-eq?",
            Self::AnyEq => "#any-eq?",
            Self::AnyNotEq => "#any-not-eq?",
            Self::Match => "#match?",
            Self::NotMatch => "#not-match?",
            Self::AnyMatch => "#any-match?",
            Self::AnyNotMatch => "#any-not-match?",
        }
    }
}

/// A predicate bound to a capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    op: PredicateOp,
    capture: String,
    value: String,
}

impl Predicate {
    /// Creates a predicate comparing `capture` with `value`.
    #[must_use]
    pub fn new(op: PredicateOp, capture: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            op,
            capture: capture.into(),
            value: value.into(),
        }
    }

    /// Returns the operator.
    #[must_use]
    pub const fn op(&self) -> PredicateOp {
        self.op
    }

    /// Returns the capture name without `@`.
    #[must_use]
    pub fn capture(&self) -> &str {
        &self.capture
    }

    /// Returns the unescaped comparison value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Renders the predicate as query text.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "({} @{} \"{}\")",
            self.op.as_str(),
            self.capture,
            escape_string(&self.value)
        )
    }

    /// Prepares the predicate for evaluation outside Tree-sitter.
    ///
    /// Tree-sitter accepts every match whose capture binds no node
    /// satisfying an `any-` predicate, so the evaluator applies those
    /// predicates itself.
    ///
    /// # Errors
    ///
    /// Returns the regex error if a match operator carries an invalid
    /// regex.
    pub fn check(&self) -> Result<PredicateCheck, regex::Error> {
        let matcher = if self.op.is_regex() {
            Matcher::Regex(regex::Regex::new(&self.value)?)
        } else {
            Matcher::Text(self.value.clone())
        };
        Ok(PredicateCheck {
            capture: self.capture.clone(),
            negated: self.op.is_negated(),
            matcher,
        })
    }
}

/// A predicate ready to test captured text.
#[derive(Debug, Clone)]
pub struct PredicateCheck {
    capture: String,
    negated: bool,
    matcher: Matcher,
}

#[derive(Debug, Clone)]
enum Matcher {
    Text(String),
    Regex(regex::Regex),
}

impl PredicateCheck {
    /// Returns the capture name without `@`.
    #[must_use]
    pub fn capture(&self) -> &str {
        &self.capture
    }

    /// Returns whether `text` satisfies the predicate.
    #[must_use]
    pub fn accepts(&self, text: &str) -> bool {
        let hit = match &self.matcher {
            Matcher::Text(value) => value == text,
            Matcher::Regex(regex) => regex.is_match(text),
        };
        hit != self.negated
    }
}

/// Options shared by the predicates of one template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PredicateStyle {
    /// Use the `any-` operators.
    pub quantified: bool,
    /// Use the negated operators.
    pub negated: bool,
    /// The captured text carries surrounding double quotes.
    pub quoted: bool,
}

/// Builds the identity predicate for `pattern` against `capture`.
///
/// Returns `Ok(None)` for `*`, which needs no predicate.
///
/// # Errors
///
/// Returns [`CompileError::InvalidRegex`] if a translated wildcard is not a
/// valid regex.
pub fn identity_predicate(
    pattern: &Pattern,
    capture: &str,
    style: PredicateStyle,
) -> Result<Option<Predicate>, CompileError> {
    let (regex, value) = match pattern {
        Pattern::Any => return Ok(None),
        Pattern::Literal(text) if style.quoted => (false, format!("\"{text}\"")),
        Pattern::Literal(text) => (false, text.clone()),
        Pattern::Wildcard(shape) => {
            let translated = wildcard_regex(shape, style.quoted);
            regex::Regex::new(&translated).map_err(|error| CompileError::InvalidRegex {
                pattern: pattern.to_string(),
                message: error.to_string(),
            })?;
            (true, translated)
        }
    };
    let op = PredicateOp::select(regex, style.negated, style.quantified);
    Ok(Some(Predicate::new(op, capture, value)))
}

/// Translates a wildcard shape into an anchored regex, escaping every
/// literal segment.
///
/// With `quoted`, the anchors sit outside a pair of double quotes so the
/// regex matches the raw string literal.
///
/// # Example
///
/// ```
/// use sift::compiler::wildcard_regex;
/// use sift_core::WildcardShape;
///
/// let shape = WildcardShape::Prefix(String::from("v1."));
/// assert_eq!(wildcard_regex(&shape, false), r"^v1\..*");
/// ```
#[must_use]
pub fn wildcard_regex(shape: &WildcardShape, quoted: bool) -> String {
    let quote = if quoted { "\"" } else { "" };
    match shape {
        WildcardShape::Prefix(prefix) => format!("^{quote}{}.*", regex::escape(prefix)),
        WildcardShape::Suffix(suffix) => format!(".*{}{quote}$", regex::escape(suffix)),
        WildcardShape::Contains(inner) => format!(".*{}.*", regex::escape(inner)),
        WildcardShape::Surround { prefix, suffix } => format!(
            "^{quote}{}.*{}{quote}$",
            regex::escape(prefix),
            regex::escape(suffix)
        ),
    }
}

/// Escapes text for a Tree-sitter query string literal.
#[must_use]
pub fn escape_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::eq(false, false, false, "#eq?")]
    #[case::not_eq(false, true, false, "#not-eq?")]
    #[case::any_eq(false, false, true, "#any-eq?")]
    #[case::any_not_eq(false, true, true, "#any-not-eq?")]
    #[case::matches(true, false, false, "#match?")]
    #[case::not_match(true, true, false, "#not-match?")]
    #[case::any_match(true, false, true, "#any-match?")]
    #[case::any_not_match(true, true, true, "#any-not-match?")]
    fn operator_selection(
        #[case] regex: bool,
        #[case] negated: bool,
        #[case] quantified: bool,
        #[case] expected: &str,
    ) {
        let op = PredicateOp::select(regex, negated, quantified);
        assert_eq!(op.as_str(), expected);
        assert_eq!(op.negate().negate(), op);
        assert_eq!(op.negate().is_quantified(), quantified);
    }

    #[rstest]
    #[case::prefix(WildcardShape::Prefix("Test".to_owned()), "^Test.*")]
    #[case::suffix(WildcardShape::Suffix("Handler".to_owned()), ".*Handler$")]
    #[case::contains(WildcardShape::Contains("User".to_owned()), ".*User.*")]
    #[case::surround(
        WildcardShape::Surround { prefix: "get".to_owned(), suffix: "Name".to_owned() },
        "^get.*Name$"
    )]
    #[case::escaped(WildcardShape::Prefix("a.b+".to_owned()), r"^a\.b\+.*")]
    fn wildcard_translation(#[case] shape: WildcardShape, #[case] expected: &str) {
        assert_eq!(wildcard_regex(&shape, false), expected);
    }

    #[rstest]
    #[case::prefix("Test*", &["Test", "TestA", "Test_b"], &["", "Tes", "aTest"])]
    #[case::suffix("*Handler", &["Handler", "HttpHandler"], &["", "Handlers", "handler"])]
    #[case::contains("*User*", &["User", "getUserName"], &["", "Usr", "user"])]
    #[case::surround("get*Name", &["getName", "getUserName"], &["", "get", "Name", "getNames"])]
    #[case::metachars("a.b+*", &["a.b+", "a.b+c"], &["", "axbb", "a.bb", "ab+"])]
    fn translated_regex_agrees_with_glob_matching(
        #[case] glob: &str,
        #[case] accepted: &[&str],
        #[case] rejected: &[&str],
    ) {
        let pattern = Pattern::parse(glob).expect("pattern");
        let Pattern::Wildcard(shape) = &pattern else {
            panic!("{glob} should be a wildcard");
        };
        let regex = regex::Regex::new(&wildcard_regex(shape, false)).expect("regex");
        for text in accepted.iter().chain(rejected) {
            assert_eq!(
                regex.is_match(text),
                pattern.matches(text),
                "{glob} against {text:?}"
            );
        }
        assert!(accepted.iter().all(|text| regex.is_match(text)));
        assert!(!rejected.iter().any(|text| regex.is_match(text)));
    }

    #[rstest]
    #[case::literal("a.b+", "a.b+", true)]
    #[case::literal_is_not_a_regex("a.b+", "axbb", false)]
    #[case::exact_only("main", "mainly", false)]
    fn literal_predicates_compare_text_exactly(
        #[case] literal: &str,
        #[case] text: &str,
        #[case] expected: bool,
    ) {
        let predicate =
            identity_predicate(&Pattern::literal(literal), "d0.name", PredicateStyle::default())
                .expect("compiles")
                .expect("predicate");
        assert_eq!(predicate.op(), PredicateOp::Eq);
        let check = predicate.check().expect("check");
        assert_eq!(check.accepts(text), expected);
    }

    #[rstest]
    #[case::any_eq(false, "b", false)]
    #[case::any_eq_hit(false, "a", true)]
    #[case::any_not_eq(true, "a", false)]
    #[case::any_not_eq_hit(true, "b", true)]
    fn quantified_checks_honour_polarity(
        #[case] negated: bool,
        #[case] text: &str,
        #[case] expected: bool,
    ) {
        let style = PredicateStyle {
            quantified: true,
            negated,
            quoted: false,
        };
        let predicate = identity_predicate(&Pattern::literal("a"), "d0.name", style)
            .expect("compiles")
            .expect("predicate");
        assert!(predicate.op().is_quantified());
        let check = predicate.check().expect("check");
        assert_eq!(check.capture(), "d0.name");
        assert_eq!(check.accepts(text), expected);
    }

    #[test]
    fn quantified_regex_checks_match_anchored() {
        let style = PredicateStyle {
            quantified: true,
            ..PredicateStyle::default()
        };
        let pattern = Pattern::parse("Test*").expect("pattern");
        let check = identity_predicate(&pattern, "d0.name", style)
            .expect("compiles")
            .expect("predicate")
            .check()
            .expect("check");
        assert!(check.accepts("TestA"));
        assert!(!check.accepts("ATest"));
    }

    #[rstest]
    #[case::prefix(WildcardShape::Prefix("github.com/".to_owned()), r#"^"github\.com/.*"#)]
    #[case::suffix(WildcardShape::Suffix("/http".to_owned()), r#".*/http"$"#)]
    #[case::contains(WildcardShape::Contains("net".to_owned()), ".*net.*")]
    fn quoted_wildcard_translation(#[case] shape: WildcardShape, #[case] expected: &str) {
        assert_eq!(wildcard_regex(&shape, true), expected);
    }

    #[test]
    fn any_needs_no_predicate() {
        let predicate = identity_predicate(&Pattern::Any, "d0.name", PredicateStyle::default())
            .expect("compiles");
        assert!(predicate.is_none());
    }

    #[test]
    fn quoted_literal_compares_with_quotes() {
        let style = PredicateStyle {
            quoted: true,
            ..PredicateStyle::default()
        };
        let predicate = identity_predicate(&Pattern::literal("fmt"), "d0.name", style)
            .expect("compiles")
            .expect("predicate");
        assert_eq!(predicate.value(), "\"fmt\"");
        assert_eq!(predicate.render(), r#"(#eq? @d0.name "\"fmt\"")"#);
    }

    #[test]
    fn regex_backslashes_are_escaped_for_the_query() {
        let pattern = Pattern::parse("v1.*").expect("pattern");
        let predicate = identity_predicate(&pattern, "d0.name", PredicateStyle::default())
            .expect("compiles")
            .expect("predicate");
        assert_eq!(predicate.render(), r#"(#match? @d0.name "^v1\\..*")"#);
    }
}
