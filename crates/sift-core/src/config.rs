//! Engine configuration and logging settings.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Default tracing filter directive.
pub(crate) const DEFAULT_LOG_FILTER: &str = "info";

/// Supported logging output formats.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// Structured JSON suitable for ingestion by logging stacks.
    Json,
    /// Human-readable single line output.
    #[default]
    Compact,
}

/// Errors encountered while parsing a [`LogFormat`] from text.
pub type LogFormatParseError = strum::ParseError;

/// Engine configuration controlling result limits, union semantics, and
/// logging.
///
/// # Defaults
///
/// - `dedupe_union`: `false` (OR is a raw union)
/// - `max_results`: 10 000 per evaluated query
/// - `max_content_bytes`: 1 048 576 (1 MiB)
/// - `log_filter`: `"info"`
/// - `log_format`: [`LogFormat::Compact`]
///
/// # Example
///
/// ```
/// use sift_core::EngineConfig;
///
/// let config = EngineConfig::default().with_dedupe_union(true);
/// assert!(config.dedupe_union());
/// assert_eq!(config.max_results(), 10_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Whether OR drops results whose node already appeared.
    dedupe_union: bool,
    /// Maximum results kept from one evaluated query.
    max_results: usize,
    /// Maximum bytes of source text kept in a result's content.
    max_content_bytes: usize,
    /// Tracing filter directive.
    log_filter: String,
    /// Tracing output format.
    log_format: LogFormat,
}

impl EngineConfig {
    /// Sets whether OR de-duplicates by node identity.
    #[must_use]
    pub const fn with_dedupe_union(mut self, dedupe_union: bool) -> Self {
        self.dedupe_union = dedupe_union;
        self
    }

    /// Sets the result limit, applied to the final combined set.
    #[must_use]
    pub const fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Sets the content length limit.
    #[must_use]
    pub const fn with_max_content_bytes(mut self, max_content_bytes: usize) -> Self {
        self.max_content_bytes = max_content_bytes;
        self
    }

    /// Sets the tracing filter directive.
    #[must_use]
    pub fn with_log_filter(mut self, log_filter: impl Into<String>) -> Self {
        self.log_filter = log_filter.into();
        self
    }

    /// Sets the tracing output format.
    #[must_use]
    pub const fn with_log_format(mut self, log_format: LogFormat) -> Self {
        self.log_format = log_format;
        self
    }

    /// Returns whether OR de-duplicates by node identity.
    #[must_use]
    pub const fn dedupe_union(&self) -> bool {
        self.dedupe_union
    }

    /// Returns the result limit.
    #[must_use]
    pub const fn max_results(&self) -> usize {
        self.max_results
    }

    /// Returns the content length limit.
    #[must_use]
    pub const fn max_content_bytes(&self) -> usize {
        self.max_content_bytes
    }

    /// Returns the tracing filter directive.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the tracing output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dedupe_union: false,
            max_results: 10_000,
            max_content_bytes: 1_048_576,
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            log_format: LogFormat::default(),
        }
    }
}
