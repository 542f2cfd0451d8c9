//! Structured logging configuration.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Environment variable holding the log filter directive.
pub const LOG_FILTER_ENV: &str = "PROMPTMENU_LOG";

/// Environment variable selecting the log format.
pub const LOG_FORMAT_ENV: &str = "PROMPTMENU_LOG_FORMAT";

/// Filter used when nothing else is configured.
pub const DEFAULT_FILTER: &str = "warn";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Event filter.
    pub filter: EnvFilter,
    /// Log file; stderr when absent.
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Resolves logging from file settings and the environment.
    ///
    /// The filter is `debug` when `verbose` is set, else [`LOG_FILTER_ENV`],
    /// else the configured level, else [`DEFAULT_FILTER`]. The format follows
    /// [`LOG_FORMAT_ENV`] over the configured format.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let env_filter = std::env::var(LOG_FILTER_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty());
        let directive = if verbose {
            "debug".to_string()
        } else {
            env_filter
                .or_else(|| settings.and_then(|s| s.level.clone()))
                .unwrap_or_else(|| DEFAULT_FILTER.to_string())
        };

        let format = std::env::var(LOG_FORMAT_ENV)
            .ok()
            .or_else(|| settings.and_then(|s| s.format.clone()))
            .and_then(|f| LogFormat::parse(&f))
            .unwrap_or_default();

        Self {
            format,
            filter: build_filter(&directive),
            file: settings.and_then(|s| s.file.clone()),
        }
    }
}

/// Builds a filter, falling back to [`DEFAULT_FILTER`] for bad directives.
fn build_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
