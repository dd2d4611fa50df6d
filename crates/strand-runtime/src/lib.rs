//! Strand Runtime - event dispatch, configuration and logging.
//!
//! This crate provides:
//! - The [`Dispatcher`], which runs each raw event from a connection through
//!   a root middleware on its own Tokio task
//! - Layered configuration (`strand.toml`, profiles, `STRAND_*` variables)
//! - Logging setup on top of `tracing-subscriber`
//!
//! ```rust,ignore
//! use strand_runtime::{Dispatcher, config::load_config, event_channel, logging};
//!
//! #[tokio::main]
//! async fn main() -> strand_runtime::RuntimeResult<()> {
//!     let config = load_config()?;
//!     logging::init_from_config(&config.logging);
//!
//!     let dispatcher = Dispatcher::from_config(connection, root, &config)?;
//!     let (events, rx) = event_channel(config.dispatch.channel_capacity);
//!
//!     // Hand `events` to the client; run until Ctrl+C.
//!     dispatcher.run(rx).await
//! }
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod logging;

// Re-exports
pub use config::{
    ConfigError, ConfigLoader, ConfigResult, DispatchConfig, LoggingConfig, Profile, StrandConfig,
};
pub use dispatcher::{DispatchStats, Dispatcher, DispatcherBuilder, RawEvent, event_channel};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};

// Re-export tracing for use by applications
pub use tracing;
pub use tracing_subscriber;

/// Logging macros and span helpers.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
