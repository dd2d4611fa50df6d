//! Decorators: middleware that can wrap other middleware.

use async_trait::async_trait;
use strand_core::{
    Args, BoxedMiddleware, Chain, Context, IntoMiddleware, Kwargs, Middleware, Next, RunResult,
    decorate,
};

/// A filter ready to be wrapped around a handler.
///
/// Every filter factory in this crate returns a `Decorator`. Applying it to
/// an inner middleware yields a [`Chain`] in which the filter runs first:
///
/// ```rust,ignore
/// let ping = event(EventKind::Message).apply(
///     pattern(r"^!ping")?.apply(from_fn(on_ping)),
/// );
/// ```
///
/// A `Decorator` is also a middleware in its own right, running the wrapped
/// filter, so it can be placed directly in a chain:
///
/// ```rust,ignore
/// let ping = chain![from_fn(on_ping), pattern(r"^!ping")?, event(EventKind::Message)];
/// ```
#[derive(Clone)]
pub struct Decorator {
    outer: BoxedMiddleware,
}

impl Decorator {
    /// Creates a decorator that wraps its targets in `outer`.
    pub fn new(outer: impl IntoMiddleware) -> Self {
        Self {
            outer: outer.into_middleware(),
        }
    }

    /// Wraps `inner`, producing the chain `[inner, outer]`.
    pub fn apply(&self, inner: impl IntoMiddleware) -> Chain {
        decorate(self.outer.clone(), inner)
    }

    /// Returns the wrapping middleware.
    pub fn outer(&self) -> &BoxedMiddleware {
        &self.outer
    }
}

#[async_trait]
impl Middleware for Decorator {
    async fn run(&self, ctx: &mut Context, args: Args, kwargs: Kwargs, next: Next) -> RunResult {
        self.outer.run(ctx, args, kwargs, next).await
    }

    fn source(&self) -> Option<&str> {
        self.outer.source()
    }

    fn name(&self) -> &str {
        self.outer.name()
    }
}

impl std::fmt::Debug for Decorator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decorator")
            .field("outer", &self.outer.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::event::event;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use strand_core::{EventKind, MiddlewareCollection, Outcome, from_fn};

    #[tokio::test]
    async fn test_applied_filter_runs_before_handler() {
        let calls = Arc::new(Mutex::new(0));
        let handler = {
            let calls = calls.clone();
            from_fn(move |_ctx, _args, _kwargs, _next| {
                let calls = calls.clone();
                Box::pin(async move {
                    *calls.lock() += 1;
                    Ok(Outcome::Handled)
                })
            })
        };

        let chain = event(EventKind::Ready).apply(handler);
        assert_eq!(chain.len(), 2);

        let mut ready = Context::new(EventKind::Ready, Vec::new(), Kwargs::new());
        let outcome = chain
            .run(&mut ready, Vec::new(), Kwargs::new(), Next::noop())
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Handled);

        let mut message = Context::new(EventKind::Message, Vec::new(), Kwargs::new());
        let outcome = chain
            .run(&mut message, Vec::new(), Kwargs::new(), Next::noop())
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Ignore);

        assert_eq!(*calls.lock(), 1);
    }
}
