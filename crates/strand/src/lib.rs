//! # Strand
//!
//! Composable middleware chains for routing chat client events.
//!
//! ## Overview
//!
//! Every event a chat client receives is run through one root middleware.
//! Middleware are small async units that inspect the event, bind named
//! arguments, and either pass the call on or stop it. They compose into
//! [`Chain`](strand_core::Chain)s and
//! [`FirstSuccess`](strand_core::FirstSuccess) groups, which are middleware
//! themselves.
//!
//! ```text
//! ┌────────────┐     ┌────────────┐     ┌───────────┐     ┌─────────┐     ┌──────────┐
//! │ Connection │────▶│ Dispatcher │────▶│ Normalize │────▶│ Filters │────▶│ Handlers │
//! └────────────┘     └────────────┘     └───────────┘     └─────────┘     └──────────┘
//!                     one task per         binds event      event kind,     first
//!                     event                parameters       content, ...    success
//! ```
//!
//! - **Core** (`strand-core`): the middleware contract, chains, collections
//! - **Framework** (`strand-framework`): normalization, filters, decorators
//! - **Runtime** (`strand-runtime`): dispatcher, configuration, logging
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use strand::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> strand::runtime::RuntimeResult<()> {
//!     let config = load_config()?;
//!     init_from_config(&config.logging);
//!
//!     let ping = pattern(r"^!ping$")?.apply(from_fn(|ctx, args, kwargs, next| {
//!         Box::pin(async move {
//!             info!("pong");
//!             Ok(Outcome::Handled)
//!         })
//!     }));
//!
//!     let root = chain![ping, not_authored_by_bot(), event(EventKind::Message)];
//!
//!     let dispatcher = Dispatcher::from_config(connection, root, &config)?;
//!     let (events, rx) = event_channel(config.dispatch.channel_capacity);
//!     dispatcher.run(rx).await
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: load `strand.toml` configuration files (default)
//! - `yaml-config`: load `strand.yaml` configuration files
//! - `json-log`: JSON log output

pub use strand_core as core;
pub use strand_framework as framework;
pub use strand_runtime as runtime;

pub use strand_core::{chain, first_success};

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use strand::prelude::*;
/// ```
pub mod prelude {
    // Middleware contract and composition
    pub use strand_core::prelude::*;

    // Normalization and filters
    pub use strand_framework::prelude::*;

    // Dispatch
    pub use strand_runtime::config::load_config;
    pub use strand_runtime::logging::init_from_config;
    pub use strand_runtime::{Dispatcher, RawEvent, StrandConfig, event_channel};

    // Logging macros
    pub use strand_runtime::prelude::*;
}
