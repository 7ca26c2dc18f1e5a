//! The languages Sift ships providers for.
//!
//! Each language carries its canonical name, the aliases accepted when a
//! caller names it, the file extensions that select it, and the grammar its
//! provider parses with. Path detection looks at the extension only.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

/// A language with a built-in provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum SupportedLanguage {
    /// Go.
    #[default]
    Go,
    /// Rust.
    Rust,
    /// Python, including stub files.
    Python,
    /// TypeScript and TSX.
    TypeScript,
    /// JavaScript, JSX and the Node module extensions.
    JavaScript,
}

impl SupportedLanguage {
    const ALL: [Self; 5] = [
        Self::Go,
        Self::Rust,
        Self::Python,
        Self::TypeScript,
        Self::JavaScript,
    ];

    /// Every supported language, in registry order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &Self::ALL
    }

    /// The canonical lower-case name, used in errors, logs and config keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Python => "python",
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
        }
    }

    /// Other names accepted by [`FromStr`].
    #[must_use]
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Go => &["golang"],
            Self::Rust => &["rs"],
            Self::Python => &["py"],
            Self::TypeScript => &["ts", "tsx"],
            Self::JavaScript => &["js", "jsx", "node"],
        }
    }

    /// File extensions, without the dot, that select this language.
    #[must_use]
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Go => &["go"],
            Self::Rust => &["rs"],
            Self::Python => &["py", "pyi"],
            Self::TypeScript => &["ts", "tsx", "mts", "cts"],
            Self::JavaScript => &["js", "jsx", "mjs", "cjs"],
        }
    }

    /// Selects the language owning `ext`, ignoring ASCII case.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::all().iter().copied().find(|language| {
            language
                .extensions()
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
    }

    /// Selects the language of `path` from its extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_extension(path.extension()?.to_str()?)
    }

    /// The grammar this language is parsed with.
    ///
    /// TypeScript uses the TSX grammar, which accepts plain `.ts` sources
    /// as well as JSX elements.
    #[must_use]
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            Self::Go => tree_sitter_go::LANGUAGE.into(),
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        }
    }

    fn answers_to(self, name: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(name)
            || self
                .aliases()
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A language name that no provider answers to.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("no provider for language `{name}`")]
pub struct LanguageParseError {
    name: String,
}

impl LanguageParseError {
    /// The rejected name, trimmed.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for SupportedLanguage {
    type Err = LanguageParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let name = input.trim();
        Self::all()
            .iter()
            .copied()
            .find(|language| language.answers_to(name))
            .ok_or_else(|| LanguageParseError {
                name: name.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn extensions_belong_to_exactly_one_language() {
        let mut seen = std::collections::HashSet::new();
        for language in SupportedLanguage::all() {
            for ext in language.extensions() {
                assert!(seen.insert(*ext), "{ext} is claimed twice");
                assert_eq!(SupportedLanguage::from_extension(ext), Some(*language));
            }
        }
    }

    #[rstest]
    #[case::golang_alias(" golang ", SupportedLanguage::Go)]
    #[case::upper_case("GO", SupportedLanguage::Go)]
    #[case::tsx_name("tsx", SupportedLanguage::TypeScript)]
    #[case::node_name("node", SupportedLanguage::JavaScript)]
    #[case::short_rust("rs", SupportedLanguage::Rust)]
    fn names_and_aliases_resolve(#[case] name: &str, #[case] expected: SupportedLanguage) {
        assert_eq!(name.parse::<SupportedLanguage>(), Ok(expected));
    }

    #[test]
    fn unknown_names_report_the_trimmed_input() {
        let error = " php ".parse::<SupportedLanguage>().expect_err("php has no provider");
        assert_eq!(error.name(), "php");
        assert_eq!(error.to_string(), "no provider for language `php`");
    }

    #[rstest]
    #[case::typescript("web/api.ts", Some(SupportedLanguage::TypeScript))]
    #[case::jsx("web/App.JSX", Some(SupportedLanguage::JavaScript))]
    #[case::commonjs("scripts/build.cjs", Some(SupportedLanguage::JavaScript))]
    #[case::php("index.php", None)]
    #[case::dotfile(".gitignore", None)]
    #[case::no_extension("Makefile", None)]
    fn paths_select_by_extension(#[case] path: &str, #[case] expected: Option<SupportedLanguage>) {
        assert_eq!(SupportedLanguage::from_path(Path::new(path)), expected);
    }

    #[test]
    fn typescript_grammar_accepts_jsx() {
        let grammar = SupportedLanguage::TypeScript.tree_sitter_language();
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&grammar).expect("grammar loads");
        let tree = parser
            .parse("const view: Props = <App title=\"x\" />;", None)
            .expect("parse");
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn javascript_has_its_own_grammar() {
        let javascript = SupportedLanguage::JavaScript.tree_sitter_language();
        let typescript = SupportedLanguage::TypeScript.tree_sitter_language();
        assert_eq!(javascript.id_for_node_kind("type_annotation", true), 0);
        assert!(typescript.id_for_node_kind("type_annotation", true) != 0);
    }

    #[test]
    fn display_uses_the_canonical_name() {
        for language in SupportedLanguage::all() {
            assert_eq!(language.to_string().parse(), Ok(*language));
            assert!(!language.aliases().contains(&language.as_str()));
        }
    }
}
