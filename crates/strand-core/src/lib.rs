//! # Strand Core
//!
//! The middleware engine of the Strand chat event framework.
//!
//! Events emitted by a chat connection are wrapped in a [`Context`] and routed
//! through a composable chain of [`Middleware`]. Each unit may inspect or
//! rewrite the event's arguments, hand it on through [`Next`], or stop and
//! report [`Outcome::Ignore`].
//!
//! ## Architecture Layers
//!
//! ### Foundation Layer
//!
//! - **Events**: the closed catalog of event names ([`EventKind`])
//! - **Context**: per-event argument envelope ([`Context`])
//! - **Outcomes**: success versus ignore ([`Outcome`], [`is_successful_result`])
//!
//! ### Framework Layer
//!
//! - **Middleware**: the processing capability ([`Middleware`], [`Next`])
//! - **Units**: [`FnMiddleware`], [`StateMiddleware`]
//! - **Collections**: [`Chain`], [`FirstSuccess`]
//! - **Assembly**: [`chain_of`], [`collection_of`], [`decorate`], [`chain!`]
//!
//! ### Integration Layer
//!
//! - **Connection**: the event source an event came from ([`Connection`])
//!
//! ## Example
//!
//! ```rust,ignore
//! use strand_core::{chain, from_fn, Context, EventKind, Kwargs, Next, Outcome};
//!
//! let log = from_fn(|ctx, args, kwargs, next| {
//!     Box::pin(async move {
//!         tracing::info!(event = %ctx.event(), "got event");
//!         next.run(ctx, args, kwargs).await
//!     })
//! });
//! let reply = from_fn(|_ctx, _args, _kwargs, _next| {
//!     Box::pin(async move { Ok(Outcome::Handled) })
//! });
//!
//! // `log` was added last, so it runs first.
//! let root = chain![reply, log];
//!
//! let mut ctx = Context::new(EventKind::Ready, Vec::new(), Kwargs::new());
//! root.run(&mut ctx, Vec::new(), Kwargs::new(), Next::noop()).await?;
//! ```

// Architectural layers
pub mod foundation;
pub mod framework;
pub mod integration;

// Re-export foundation types
pub use foundation::{
    Args, BoxError, Context, EventKind, Kwargs, MiddlewareError, Outcome, RunResult,
    is_successful_result,
};

// Re-export framework types
pub use framework::{
    BoxedMiddleware, Chain, FirstSuccess, FnMiddleware, IntoMiddleware, Middleware,
    MiddlewareCollection, Next, STATE_KEY, StateMiddleware, as_middleware, chain_of,
    collection_of, decorate, from_fn,
};

// Re-export integration types
pub use integration::{BoxedConnection, Connection};

// Re-exported for middleware implementors.
pub use async_trait::async_trait;

/// Builds a [`Chain`] from a list of middleware.
///
/// Members are listed in insertion order: the first one runs last.
///
/// ```rust,ignore
/// let root = chain![handler, Normalize::default()];
/// ```
#[macro_export]
macro_rules! chain {
    () => {
        $crate::Chain::new()
    };
    ($($unit:expr),+ $(,)?) => {
        $crate::chain_of([$($crate::IntoMiddleware::into_middleware($unit)),+])
    };
}

/// Builds a [`FirstSuccess`] group from a list of alternatives, tried in order.
#[macro_export]
macro_rules! first_success {
    () => {
        $crate::FirstSuccess::new()
    };
    ($($unit:expr),+ $(,)?) => {
        $crate::collection_of::<$crate::FirstSuccess, _>([
            $($crate::IntoMiddleware::into_middleware($unit)),+
        ])
    };
}

/// Prelude for common imports.
pub mod prelude {
    pub use super::foundation::{
        Args, BoxError, Context, EventKind, Kwargs, MiddlewareError, Outcome, RunResult,
        is_successful_result,
    };
    pub use super::framework::{
        BoxedMiddleware, Chain, FirstSuccess, IntoMiddleware, Middleware, MiddlewareCollection,
        Next, StateMiddleware, chain_of, decorate, from_fn,
    };
    pub use super::integration::{BoxedConnection, Connection};
    pub use super::{async_trait, chain, first_success};
}
