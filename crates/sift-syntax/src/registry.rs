//! Lookup of providers by language, name, or file path.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::SyntaxError;
use crate::language::SupportedLanguage;
use crate::provider::Provider;
use crate::providers;

/// Owns one provider per language.
///
/// Providers are immutable once registered, so a shared reference to the
/// registry may be used from any number of threads.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<SupportedLanguage, Box<dyn Provider>>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in provider of every supported
    /// language.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for language in SupportedLanguage::all() {
            registry.register(providers::builtin(*language));
        }
        registry
    }

    /// Registers `provider`, replacing any provider for the same language.
    pub fn register(&mut self, provider: Box<dyn Provider>) {
        self.providers.insert(provider.language(), provider);
    }

    /// Returns the provider for `language`.
    #[must_use]
    pub fn get(&self, language: SupportedLanguage) -> Option<&dyn Provider> {
        self.providers.get(&language).map(AsRef::as_ref)
    }

    /// Returns the provider for a language name such as `"golang"`.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&dyn Provider> {
        name.parse().ok().and_then(|language| self.get(language))
    }

    /// Returns the provider for the language of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::UnknownLanguage`] if the extension is not
    /// recognised, or [`SyntaxError::UnregisteredLanguage`] if no provider is
    /// registered for it.
    pub fn for_path(&self, path: &Path) -> Result<&dyn Provider, SyntaxError> {
        let language = SupportedLanguage::from_path(path)
            .ok_or_else(|| SyntaxError::unknown_language(path.to_path_buf()))?;
        self.get(language)
            .ok_or_else(|| SyntaxError::unregistered(language))
    }

    /// Returns the registered languages in order.
    pub fn languages(&self) -> impl Iterator<Item = SupportedLanguage> + '_ {
        self.providers.keys().copied()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("languages", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}
