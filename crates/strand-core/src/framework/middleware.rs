//! The middleware capability.
//!
//! This module defines the [`Middleware`] trait that every processing step
//! implements, and [`Next`], the continuation a middleware calls to hand the
//! event to the rest of the chain.
//!
//! # Calling Convention
//!
//! `run` receives the context, the call's positional and keyword arguments,
//! and the continuation as separate parameters:
//!
//! ```rust,ignore
//! async fn run(&self, ctx: &mut Context, args: Args, kwargs: Kwargs, next: Next) -> RunResult;
//! ```
//!
//! Keeping `ctx` and `next` out of `args` means filters can grow and shrink
//! the positional list without ever touching the control parameters.
//!
//! A middleware that wants the event to continue calls
//! `next.run(ctx, args, kwargs)`, forwarding every argument it received, even
//! ones it does not use. A middleware that does not call `next` stops
//! propagation and returns [`Outcome::Ignore`] ("not for me") or any other
//! outcome ("handled here").
//!
//! ```rust,ignore
//! struct OnlyReady;
//!
//! #[async_trait]
//! impl Middleware for OnlyReady {
//!     async fn run(&self, ctx: &mut Context, args: Args, kwargs: Kwargs, next: Next) -> RunResult {
//!         if ctx.event() == EventKind::Ready {
//!             return next.run(ctx, args, kwargs).await;
//!         }
//!         Ok(Outcome::Ignore)
//!     }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::foundation::context::{Args, Context, Kwargs};
use crate::foundation::error::RunResult;
use crate::foundation::outcome::Outcome;

/// One step in an event processing chain.
///
/// Implementations may filter, transform, or terminate processing. See the
/// [module documentation](self) for the calling convention.
#[async_trait]
pub trait Middleware: Send + Sync + 'static {
    /// Runs this middleware.
    ///
    /// `ctx` may be rewritten (or replaced outright) before `next` is called.
    async fn run(&self, ctx: &mut Context, args: Args, kwargs: Kwargs, next: Next) -> RunResult;

    /// The function this middleware was built from, if any.
    ///
    /// Function-wrapped units report the wrapped callable; a [`Chain`]
    /// mirrors its first-added unit, so a chain grown by decoration can
    /// still be traced back to the handler at its core.
    ///
    /// [`Chain`]: crate::Chain
    fn source(&self) -> Option<&str> {
        None
    }

    /// A human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// A shared, type-erased middleware.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// Conversion into a [`BoxedMiddleware`].
///
/// Implemented for every [`Middleware`] and for [`BoxedMiddleware`] itself.
/// Plain async closures are converted with [`from_fn`](crate::from_fn).
pub trait IntoMiddleware {
    /// Performs the conversion.
    fn into_middleware(self) -> BoxedMiddleware;
}

impl<M: Middleware> IntoMiddleware for M {
    fn into_middleware(self) -> BoxedMiddleware {
        Arc::new(self)
    }
}

impl IntoMiddleware for BoxedMiddleware {
    fn into_middleware(self) -> BoxedMiddleware {
        self
    }
}

// =============================================================================
// Next - the continuation value
// =============================================================================

#[derive(Clone)]
enum Link {
    /// The terminal continuation. Does nothing and reports success.
    Noop,
    /// Run `unit` with `next` as its continuation.
    Step { unit: BoxedMiddleware, next: Next },
}

/// The continuation handed to a middleware.
///
/// `Next` is a cheap-to-clone value describing "everything that runs after
/// me". The root of every dispatch starts from [`Next::noop`]; collections
/// build longer continuations with [`Next::link`].
#[derive(Clone)]
pub struct Next {
    link: Arc<Link>,
}

impl Next {
    /// The terminal continuation.
    ///
    /// Reached only if nothing in the chain opted out. Returns
    /// [`Outcome::Handled`].
    pub fn noop() -> Self {
        Self {
            link: Arc::new(Link::Noop),
        }
    }

    /// A continuation that runs `unit`, with `next` as the unit's continuation.
    pub fn link(unit: BoxedMiddleware, next: Next) -> Self {
        Self {
            link: Arc::new(Link::Step { unit, next }),
        }
    }

    /// A terminal continuation that runs `unit` and then stops.
    pub fn to(unit: impl IntoMiddleware) -> Self {
        Self::link(unit.into_middleware(), Self::noop())
    }

    /// Returns `true` if this is the terminal no-op continuation.
    pub fn is_noop(&self) -> bool {
        matches!(*self.link, Link::Noop)
    }

    /// Invokes the continuation.
    pub async fn run(self, ctx: &mut Context, args: Args, kwargs: Kwargs) -> RunResult {
        match &*self.link {
            Link::Noop => Ok(Outcome::Handled),
            Link::Step { unit, next } => unit.run(ctx, args, kwargs, next.clone()).await,
        }
    }
}

impl Default for Next {
    fn default() -> Self {
        Self::noop()
    }
}

impl std::fmt::Debug for Next {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut depth = 0;
        let mut current = self;
        while let Link::Step { next, .. } = &*current.link {
            depth += 1;
            current = next;
        }
        f.debug_struct("Next").field("depth", &depth).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::event::EventKind;
    use serde_json::json;

    struct Tag(&'static str);

    #[async_trait]
    impl Middleware for Tag {
        async fn run(
            &self,
            ctx: &mut Context,
            args: Args,
            kwargs: Kwargs,
            next: Next,
        ) -> RunResult {
            ctx.args_mut().push(json!(self.0));
            next.run(ctx, args, kwargs).await
        }
    }

    #[tokio::test]
    async fn test_noop_reports_handled() {
        let mut ctx = Context::new(EventKind::Ready, Vec::new(), Kwargs::new());
        let outcome = Next::noop()
            .run(&mut ctx, Vec::new(), Kwargs::new())
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Handled);
    }

    #[tokio::test]
    async fn test_linked_units_run_outermost_first() {
        let inner = Next::to(Tag("inner"));
        let outer = Next::link(Tag("outer").into_middleware(), inner);

        let mut ctx = Context::new(EventKind::Ready, Vec::new(), Kwargs::new());
        outer
            .run(&mut ctx, Vec::new(), Kwargs::new())
            .await
            .unwrap();

        assert_eq!(ctx.args(), &[json!("outer"), json!("inner")]);
    }

    #[test]
    fn test_debug_reports_depth() {
        let next = Next::link(Tag("a").into_middleware(), Next::to(Tag("b")));
        assert_eq!(format!("{next:?}"), "Next { depth: 2 }");
        assert!(Next::noop().is_noop());
    }
}
