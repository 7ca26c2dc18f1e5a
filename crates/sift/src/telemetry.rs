//! Structured logging initialisation for embedders of the engine.
//!
//! The library only emits `tracing` events. Hosts that do not install their
//! own subscriber can call [`initialise`] once to log to stderr, usually
//! with a [`TelemetryConfig`] taken from the [`EngineConfig`].

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use sift_core::{EngineConfig, LogFormat};
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Filter and format of the stderr subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    filter: String,
    format: LogFormat,
}

impl TelemetryConfig {
    /// Creates a configuration from an `EnvFilter` directive and a format.
    #[must_use]
    pub fn new(filter: impl Into<String>, format: LogFormat) -> Self {
        Self {
            filter: filter.into(),
            format,
        }
    }

    /// Returns the filter directive.
    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Returns the output format.
    #[must_use]
    pub const fn format(&self) -> LogFormat {
        self.format
    }
}

impl From<&EngineConfig> for TelemetryConfig {
    fn from(config: &EngineConfig) -> Self {
        Self::new(config.log_filter(), config.log_format())
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

/// Handle returned when telemetry has been initialised.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to parse the configured log filter expression.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Failed to install the tracing subscriber.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the global tracing subscriber on first use.
///
/// Repeated calls are idempotent and return a fresh [`TelemetryHandle`]
/// without touching the global state again.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] if the configured filter does not
/// parse, or [`TelemetryError::Subscriber`] if another subscriber was
/// installed first.
pub fn initialise(config: &TelemetryConfig) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(config))
        .map(|_| TelemetryHandle)
}

fn install_subscriber(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_new(config.filter())
        .map_err(|error| TelemetryError::Filter(error.to_string()))?;

    let builder = |env_filter: EnvFilter| {
        fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_level(true)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .with_timer(fmt::time::UtcTime::rfc_3339())
    };

    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.format() {
        LogFormat::Json => Box::new(builder(filter).json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder(filter).compact().finish()),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}
