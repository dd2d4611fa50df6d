//! Configuration module for the Strand runtime.
//!
//! Settings for logging, event dispatch and the normalization catalog are
//! layered from defaults, configuration files and `STRAND_*` environment
//! variables.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    DispatchConfig, LogFormat, LogLevel, LogOutput, LoggingConfig, SpanEventConfig, StrandConfig,
};
pub use validation::validate_config;
