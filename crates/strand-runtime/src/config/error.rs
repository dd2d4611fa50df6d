//! Errors raised while loading or validating configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Why a [`StrandConfig`](super::StrandConfig) could not be produced.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested file does not exist.
    #[error("config file {0} does not exist")]
    FileNotFound(PathBuf),

    /// A source was malformed, or the merged values did not fit the schema.
    #[error("could not read configuration: {0}")]
    ParseError(String),

    /// A value was read but is out of range or inconsistent.
    #[error("invalid configuration value: {message}")]
    ValidationError { message: String },

    /// `catalog` has an entry for an event name the catalog does not define.
    #[error("catalog entry for unknown event `{0}`")]
    UnknownEvent(String),
}

impl ConfigError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
