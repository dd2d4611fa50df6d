//! Sequential middleware composition.
//!
//! A [`Chain`] threads one call through all of its members. The first member
//! added is the innermost: it runs last, right before the chain's own `next`.
//! Every later member wraps the ones before it, so the member added last sees
//! the event first.
//!
//! ```text
//! added:   U1, U2, U3
//! runs:    U3 → U2 → U1 → next
//! ```
//!
//! This ordering is what makes decoration work: wrapping a handler in a
//! filter appends the filter, and the filter then runs in front of everything
//! already assembled.
//!
//! ```rust,ignore
//! // pattern runs first, then event filter, then the handler
//! let greet = chain![from_fn(greet_handler), event(EventKind::Message), pattern(r"hi (?P<name>\w+)")?];
//! ```

use async_trait::async_trait;
use tracing::trace;

use crate::foundation::context::{Args, Context, Kwargs};
use crate::foundation::error::RunResult;
use crate::framework::collection::{MiddlewareCollection, collection_of};
use crate::framework::middleware::{BoxedMiddleware, IntoMiddleware, Middleware, Next};

/// Sequential composition of middleware.
#[derive(Clone, Default)]
pub struct Chain {
    units: Vec<BoxedMiddleware>,
}

impl Chain {
    /// Creates an empty chain. An empty chain forwards straight to `next`.
    pub fn new() -> Self {
        Self { units: Vec::new() }
    }

    /// Appends a member (builder pattern).
    pub fn with(mut self, unit: impl IntoMiddleware) -> Self {
        self.units.push(unit.into_middleware());
        self
    }

    /// Wraps this chain in `outer`.
    ///
    /// `outer` is appended, so it runs before every member already in the
    /// chain.
    pub fn decorate(self, outer: impl IntoMiddleware) -> Self {
        self.with(outer)
    }

    /// Builds the continuation that runs this chain in front of `next`.
    ///
    /// Folds the members in insertion order, each one becoming the new
    /// outermost link around the continuation built so far.
    pub fn compose(&self, next: Next) -> Next {
        self.units
            .iter()
            .cloned()
            .fold(next, |inner, unit| Next::link(unit, inner))
    }
}

impl MiddlewareCollection for Chain {
    fn units(&self) -> &[BoxedMiddleware] {
        &self.units
    }

    fn push(&mut self, unit: BoxedMiddleware) {
        self.units.push(unit);
    }
}

#[async_trait]
impl Middleware for Chain {
    async fn run(&self, ctx: &mut Context, args: Args, kwargs: Kwargs, next: Next) -> RunResult {
        trace!(
            event = %ctx.event(),
            units = self.units.len(),
            source = self.source().unwrap_or("anonymous"),
            "Running chain"
        );
        self.compose(next).run(ctx, args, kwargs).await
    }

    /// Mirrors the first-added member.
    fn source(&self) -> Option<&str> {
        self.units.first().and_then(|unit| unit.source())
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("units", &self.units.iter().map(|u| u.name()).collect::<Vec<_>>())
            .finish()
    }
}

/// Creates a chain of `units`, in order.
pub fn chain_of<I>(units: I) -> Chain
where
    I: IntoIterator<Item = BoxedMiddleware>,
{
    collection_of(units)
}

/// Wraps `inner` in `outer`, producing a chain in which `outer` runs first.
///
/// The result is always the two-member chain `[inner, outer]`. When `inner`
/// is itself a chain this is equivalent to [`Chain::decorate`]: a chain used
/// as a member runs its own members in place, so the execution order is
/// `outer`, then `inner`'s members from last-added to first-added, then the
/// caller's `next`.
pub fn decorate(outer: impl IntoMiddleware, inner: impl IntoMiddleware) -> Chain {
    Chain::new().with(inner).with(outer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::event::EventKind;
    use crate::foundation::outcome::Outcome;
    use crate::framework::function::FnMiddleware;
    use serde_json::json;
    use std::sync::Arc;

    struct Push(&'static str);

    #[async_trait]
    impl Middleware for Push {
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

    fn trail(ctx: &Context) -> Vec<&str> {
        ctx.args().iter().filter_map(|v| v.as_str()).collect()
    }

    #[tokio::test]
    async fn test_empty_chain_forwards_to_next() {
        let mut ctx = Context::new(EventKind::Ready, Vec::new(), Kwargs::new());
        let outcome = Chain::new()
            .run(&mut ctx, Vec::new(), Kwargs::new(), Next::to(Push("end")))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Handled);
        assert_eq!(trail(&ctx), vec!["end"]);
    }

    #[tokio::test]
    async fn test_nested_chain_matches_appended_chain() {
        let nested = decorate(Push("outer"), Chain::new().with(Push("a")).with(Push("b")));
        let appended = Chain::new()
            .with(Push("a"))
            .with(Push("b"))
            .decorate(Push("outer"));

        let mut first = Context::new(EventKind::Ready, Vec::new(), Kwargs::new());
        nested
            .run(&mut first, Vec::new(), Kwargs::new(), Next::noop())
            .await
            .unwrap();

        let mut second = Context::new(EventKind::Ready, Vec::new(), Kwargs::new());
        appended
            .run(&mut second, Vec::new(), Kwargs::new(), Next::noop())
            .await
            .unwrap();

        assert_eq!(trail(&first), vec!["outer", "b", "a"]);
        assert_eq!(trail(&first), trail(&second));
    }

    struct Stop;

    #[async_trait]
    impl Middleware for Stop {
        async fn run(&self, _ctx: &mut Context, _args: Args, _kwargs: Kwargs, _next: Next) -> RunResult {
            Ok(Outcome::Ignore)
        }
    }

    #[tokio::test]
    async fn test_last_added_runs_first() {
        let chain = chain_of([
            Push("u1").into_middleware(),
            Push("u2").into_middleware(),
            Push("u3").into_middleware(),
        ]);

        let mut ctx = Context::new(EventKind::Message, Vec::new(), Kwargs::new());
        let outcome = chain
            .run(&mut ctx, Vec::new(), Kwargs::new(), Next::to(Push("terminal")))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Handled);
        assert_eq!(trail(&ctx), vec!["u3", "u2", "u1", "terminal"]);
    }

    #[tokio::test]
    async fn test_ignore_short_circuits() {
        let chain = Chain::new()
            .with(Push("u1"))
            .with(Stop)
            .with(Push("u3"));

        let mut ctx = Context::new(EventKind::Message, Vec::new(), Kwargs::new());
        let outcome = chain
            .run(&mut ctx, Vec::new(), Kwargs::new(), Next::to(Push("terminal")))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Ignore);
        assert_eq!(trail(&ctx), vec!["u3"]);
    }

    #[test]
    fn test_add_middleware_returns_member() {
        let mut chain = Chain::new();
        let added = chain.add_middleware(Push("a"));

        assert_eq!(chain.len(), 1);
        assert!(Arc::ptr_eq(&added, &chain.units()[0]));
    }

    #[test]
    fn test_source_mirrors_first_member() {
        let handler = FnMiddleware::named("greet", |ctx, args, kwargs, next: Next| {
            Box::pin(next.run(ctx, args, kwargs))
        });

        let chain = decorate(Push("filter"), handler);
        assert_eq!(chain.source(), Some("greet"));

        let wrapped = decorate(Push("outer"), chain);
        assert_eq!(wrapped.source(), Some("greet"));

        assert_eq!(Chain::new().with(Push("x")).source(), None);
    }
}
