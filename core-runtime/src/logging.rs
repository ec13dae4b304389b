//! Logging and tracing setup.
//!
//! Configures the `tracing-subscriber` pipeline once at startup. The filter
//! honors `RUST_LOG` when set, falling back to the configured default level.

use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{Result, RuntimeError};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors
    Pretty,
    /// Compact single-line format
    Compact,
    /// Structured JSON for machine parsing
    Json,
}

impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        return Self::Pretty;

        #[cfg(not(debug_assertions))]
        return Self::Compact;
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Output format
    pub format: LogFormat,

    /// Default filter directive when `RUST_LOG` is unset
    pub default_directive: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            default_directive: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_default_directive(mut self, directive: impl Into<String>) -> Self {
        self.default_directive = directive.into();
        self
    }
}

/// Initialize the global tracing subscriber.
///
/// # Errors
///
/// Returns a `Logging` error if a subscriber is already installed or the
/// filter directive is invalid.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_directive))
        .map_err(|e| RuntimeError::Logging(format!("Invalid filter directive: {}", e)))?;

    let builder = fmt().with_env_filter(filter);

    let result = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| RuntimeError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.default_directive, "info");
    }

    #[test]
    fn test_builder_overrides() {
        let config = LoggingConfig::default()
            .with_format(LogFormat::Json)
            .with_default_directive("debug,hyper=warn");

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.default_directive, "debug,hyper=warn");
    }
}
