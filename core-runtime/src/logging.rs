//! # Logging & Tracing Infrastructure
//!
//! Configures the `tracing-subscriber` stack used by the playback core.
//! The adapter logs engine property traffic at `debug`, contained bridge
//! failures at `warn`, and lifecycle milestones at `info`; hosts pick the
//! verbosity through [`LoggingConfig`] or the `RUST_LOG` environment
//! variable.
//!
//! ## Usage
//!
//! ```no_run
//! use core_runtime::logging::{init_logging, LoggingConfig};
//!
//! init_logging(LoggingConfig::default()).expect("failed to initialize logging");
//! tracing::info!("player core starting");
//! ```

use crate::error::{CoreError, Result};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors, for development.
    Pretty,
    /// Structured JSON for machine parsing.
    Json,
    /// Single-line compact format for production.
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Compact;
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Filter directive, e.g. `"core_player=debug"`. Falls back to the
    /// `RUST_LOG` environment variable, then to `info`.
    pub filter: Option<String>,
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

/// Install the global tracing subscriber.
///
/// Returns an error if a subscriber is already installed for this process.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = match &config.filter {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| CoreError::InvalidConfig(format!("bad log filter: {e}")))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
    };
    result.map_err(|e| CoreError::LoggingInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_filter_is_rejected() {
        let config = LoggingConfig::default().with_filter("not=a=filter");
        assert!(matches!(
            init_logging(config),
            Err(CoreError::InvalidConfig(_))
        ));
    }
}
