//! # Strand Framework
//!
//! Ready-made middleware for chat event routing.
//!
//! This layer provides:
//! - Event normalization driven by a per-event parameter [`Catalog`]
//! - Filters for event kind, message content, author and channel kind
//! - [`Decorator`] for wrapping handlers in filters
//! - A Tower [`Service`](tower::Service) adapter for whole chains
//!
//! Everything here is ordinary middleware built on `strand-core`; none of it
//! needs engine support.
//!
//! # Example
//!
//! ```rust,ignore
//! use strand_core::{chain, first_success, from_fn};
//! use strand_framework::prelude::*;
//!
//! let commands = first_success![
//!     pattern(r"^!ping$")?.apply(from_fn(on_ping)),
//!     pattern(r"^!roll (?P<sides>\d+)$")?.apply(from_fn(on_roll)),
//! ];
//!
//! let root = chain![
//!     commands,
//!     not_authored_by_bot(),
//!     event(EventKind::Message),
//!     Normalize::default(),
//! ];
//! ```

pub mod catalog;
pub mod decorator;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod service;

pub use catalog::Catalog;
pub use decorator::Decorator;
pub use error::{FilterError, FilterResult};
pub use filter::{
    AuthorFilter, ChannelFilter, ChannelKind, ChannelTypes, EventFilter, Pattern,
    authored_by_bot, channel_type, event, not_authored_by_bot, pattern,
};
pub use normalize::Normalize;
pub use service::MiddlewareService;

/// Prelude for common imports.
pub mod prelude {
    pub use super::{
        Catalog, ChannelTypes, Decorator, MiddlewareService, Normalize, authored_by_bot,
        channel_type, event, not_authored_by_bot, pattern,
    };
    pub use strand_core::EventKind;
}
