//! Framework layer - Middleware composition.
//!
//! This module contains the middleware engine:
//! - The [`Middleware`] capability and its [`Next`] continuation
//! - Unit variants: function-wrapped and state-injecting middleware
//! - Collections: sequential [`Chain`] and [`FirstSuccess`] grouping
//! - Assembly helpers for building chains from mixed units

pub mod chain;
pub mod collection;
pub mod first_success;
pub mod function;
pub mod middleware;
pub mod state;

pub use chain::{Chain, chain_of, decorate};
pub use collection::{MiddlewareCollection, collection_of};
pub use first_success::FirstSuccess;
pub use function::{FnMiddleware, as_middleware, from_fn};
pub use middleware::{BoxedMiddleware, IntoMiddleware, Middleware, Next};
pub use state::{STATE_KEY, StateMiddleware};
