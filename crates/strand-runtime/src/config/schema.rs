//! Configuration schema definitions.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strand_core::EventKind;
use strand_framework::Catalog;

use super::error::{ConfigError, ConfigResult};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StrandConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Event dispatch settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Normalization catalog overrides, keyed by event name.
    ///
    /// Entries replace the built-in parameter names of their event; events
    /// not listed keep the built-in entry.
    #[serde(default)]
    pub catalog: HashMap<String, Vec<String>>,
}

impl StrandConfig {
    /// Builds the normalization catalog: the built-in table with the
    /// configured overrides applied.
    pub fn catalog(&self) -> ConfigResult<Catalog> {
        let mut catalog = Catalog::default();
        for (name, params) in &self.catalog {
            let kind = EventKind::from_name(name);
            if !kind.is_known() {
                return Err(ConfigError::UnknownEvent(name.clone()));
            }
            catalog.insert(kind, params.iter().cloned());
        }
        Ok(catalog)
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Event dispatch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Capacity of the raw event channel feeding the dispatcher.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,

    /// Log every event the root chain ignored.
    #[serde(default)]
    pub log_ignored: bool,

    /// Upper bound on processing one event, in milliseconds. No limit if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            log_ignored: false,
            timeout_ms: None,
        }
    }
}

impl DispatchConfig {
    /// Returns the processing time limit, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

fn default_channel_capacity() -> usize {
    256
}

// =============================================================================
// Logging
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Global log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Output destination.
    #[serde(default)]
    pub output: LogOutput,

    /// Log file path, used when `output` is `file`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,

    /// Per-module level overrides, e.g. `strand_core = "trace"`.
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,

    /// Include thread IDs.
    #[serde(default)]
    pub thread_ids: bool,

    /// Include source file and line.
    #[serde(default)]
    pub file_location: bool,

    /// Span lifecycle events to log.
    #[serde(default)]
    pub span_events: SpanEventConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            file_path: None,
            filters: HashMap::new(),
            thread_ids: false,
            file_location: false,
            span_events: SpanEventConfig::default(),
        }
    }
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Returns the level as a filter directive string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to a `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Structured JSON lines. Requires the `json-log` feature.
    Json,
}

/// Log destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpanEventConfig {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub enter: bool,
    #[serde(default)]
    pub exit: bool,
    #[serde(default)]
    pub close: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_overrides_apply() {
        let mut config = StrandConfig::default();
        config
            .catalog
            .insert("ready".into(), vec!["session".into()]);

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.get(EventKind::Ready), Some(&["session".to_string()][..]));
        assert_eq!(catalog.get(EventKind::Message), Some(&["message".to_string()][..]));
    }

    #[test]
    fn test_unknown_catalog_event_is_rejected() {
        let mut config = StrandConfig::default();
        config.catalog.insert("not_an_event".into(), Vec::new());

        let err = config.catalog().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownEvent(ref name) if name == "not_an_event"));
    }

    #[test]
    fn test_dispatch_defaults() {
        let dispatch = DispatchConfig::default();
        assert_eq!(dispatch.channel_capacity, 256);
        assert!(!dispatch.log_ignored);
        assert_eq!(dispatch.timeout(), None);
    }
}
