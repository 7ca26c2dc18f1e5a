//! Engine and query plan types for the Sift facade.
//!
//! The [`Engine`] parses query text, compiles it into a [`QueryPlan`] for
//! one language, and executes that plan against source text. Compilation
//! and execution are separate phases, so one plan can be run over many
//! files of the same language.

use sift_core::{EngineConfig, EvalError, ParseError, Query, ResultSet, SiftError};
use sift_syntax::{Provider, ProviderRegistry, SupportedLanguage};
use tracing::{debug, instrument};

use crate::dsl;
use crate::evaluator::Evaluator;
use crate::plan::Plan;

/// A compiled query for one language.
///
/// # Example
///
/// ```
/// use sift::{Engine, EngineConfig, SupportedLanguage};
///
/// let engine = Engine::new(EngineConfig::default());
/// let plan = engine.compile(SupportedLanguage::Go, "func:main")?;
/// assert_eq!(plan.language(), SupportedLanguage::Go);
/// assert_eq!(plan.query().to_string(), "function:main");
/// # Ok::<(), sift::SiftError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    query: Query,
    language: SupportedLanguage,
    plan: Plan,
}

impl QueryPlan {
    /// Compiles `query` with `provider`.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Compile`] if any leaf cannot be expressed for the
    /// provider's language, or [`SiftError::Eval`] for an operator with the
    /// wrong number of operands.
    pub fn new(query: Query, provider: &dyn Provider) -> Result<Self, SiftError> {
        let plan = Plan::build(&query, provider)?;
        Ok(Self {
            query,
            language: provider.language(),
            plan,
        })
    }

    /// Returns the parsed query.
    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }

    /// Returns the target language.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Returns the executable plan.
    #[must_use]
    pub const fn plan(&self) -> &Plan {
        &self.plan
    }
}

/// Compiles and executes structural queries over Tree-sitter syntax trees.
///
/// # Example
///
/// ```
/// use sift::{Engine, EngineConfig, SupportedLanguage};
///
/// let engine = Engine::new(EngineConfig::default());
/// let results = engine.evaluate(
///     SupportedLanguage::Go,
///     "func:main",
///     "package main\n\nfunc main() {}\n",
/// )?;
/// assert_eq!(results.names(), vec!["main"]);
/// # Ok::<(), sift::SiftError>(())
/// ```
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    registry: ProviderRegistry,
}

impl Engine {
    /// Creates an engine with the built-in providers.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_registry(config, ProviderRegistry::with_defaults())
    }

    /// Creates an engine over a custom provider registry.
    #[must_use]
    pub const fn with_registry(config: EngineConfig, registry: ProviderRegistry) -> Self {
        Self { config, registry }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the provider registry.
    #[must_use]
    pub const fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Parses and compiles query text for `language`.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Parse`] for malformed text,
    /// [`EvalError::MissingGrammar`] if no provider is registered for the
    /// language, or any error of [`QueryPlan::new`].
    #[instrument(skip(self))]
    pub fn compile(&self, language: SupportedLanguage, text: &str) -> Result<QueryPlan, SiftError> {
        let query = dsl::parse(text).inspect_err(|error: &ParseError| {
            debug!(%error, "query text rejected");
        })?;
        self.compile_query(language, query)
    }

    /// Compiles an already parsed query for `language`.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::MissingGrammar`] if no provider is registered for
    /// the language, or any error of [`QueryPlan::new`].
    pub fn compile_query(
        &self,
        language: SupportedLanguage,
        query: Query,
    ) -> Result<QueryPlan, SiftError> {
        QueryPlan::new(query, self.provider(language)?)
    }

    /// Executes a plan with the registered provider for its language.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Eval`] if evaluation fails.
    #[instrument(
        skip(self, plan, source),
        fields(query = %plan.query(), language = %plan.language())
    )]
    pub fn execute(&self, plan: &QueryPlan, source: &str) -> Result<ResultSet, SiftError> {
        self.execute_with(self.provider(plan.language())?, plan, source)
    }

    /// Executes a plan with an explicit provider.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Eval`] if evaluation fails.
    pub fn execute_with(
        &self,
        provider: &dyn Provider,
        plan: &QueryPlan,
        source: &str,
    ) -> Result<ResultSet, SiftError> {
        let results = Evaluator::new(provider, &self.config).evaluate(plan.plan(), source)?;
        debug!(
            matches = results.len(),
            total = results.total_matches(),
            "evaluation complete"
        );
        Ok(results)
    }

    /// Parses, compiles, and executes in one call.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`Engine::compile`] or
    /// [`Engine::execute`].
    #[instrument(skip(self, source))]
    pub fn evaluate(
        &self,
        language: SupportedLanguage,
        text: &str,
        source: &str,
    ) -> Result<ResultSet, SiftError> {
        let plan = self.compile(language, text)?;
        self.execute(&plan, source)
    }

    fn provider(&self, language: SupportedLanguage) -> Result<&dyn Provider, EvalError> {
        self.registry
            .get(language)
            .ok_or_else(|| EvalError::missing_grammar(language.as_str()))
    }
}
