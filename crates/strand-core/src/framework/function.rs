//! Function-wrapped middleware.
//!
//! [`FnMiddleware`] turns an async callable into a [`Middleware`]. The callable
//! receives exactly what `run` receives and must return a boxed future:
//!
//! ```rust,ignore
//! use strand_core::{from_fn, Outcome};
//!
//! let greet = from_fn(|ctx, args, kwargs, next| {
//!     Box::pin(async move {
//!         println!("event: {}", ctx.event());
//!         next.run(ctx, args, kwargs).await
//!     })
//! });
//! ```
//!
//! Only asynchronous callables are accepted. A callable that returns a value
//! directly is rejected when the middleware is constructed:
//!
//! ```compile_fail
//! use strand_core::{Outcome, from_fn};
//!
//! let not_async = from_fn(|_ctx, _args, _kwargs, _next| Ok(Outcome::Handled));
//! ```

use std::borrow::Cow;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::foundation::context::{Args, Context, Kwargs};
use crate::foundation::error::RunResult;
use crate::framework::middleware::{Middleware, Next};

/// Middleware backed by an async callable.
pub struct FnMiddleware<F> {
    f: F,
    source: Cow<'static, str>,
}

impl<F> FnMiddleware<F> {
    /// Wraps `f`. Its type name is recorded as the middleware's source.
    pub fn new(f: F) -> Self
    where
        F: for<'a> Fn(&'a mut Context, Args, Kwargs, Next) -> BoxFuture<'a, RunResult>
            + Send
            + Sync
            + 'static,
    {
        Self {
            f,
            source: Cow::Borrowed(std::any::type_name::<F>()),
        }
    }

    /// Wraps `f` under an explicit source name.
    pub fn named(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: for<'a> Fn(&'a mut Context, Args, Kwargs, Next) -> BoxFuture<'a, RunResult>
            + Send
            + Sync
            + 'static,
    {
        Self {
            f,
            source: name.into(),
        }
    }
}

#[async_trait]
impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut Context, Args, Kwargs, Next) -> BoxFuture<'a, RunResult>
        + Send
        + Sync
        + 'static,
{
    async fn run(&self, ctx: &mut Context, args: Args, kwargs: Kwargs, next: Next) -> RunResult {
        (self.f)(ctx, args, kwargs, next).await
    }

    fn source(&self) -> Option<&str> {
        Some(&self.source)
    }

    fn name(&self) -> &str {
        &self.source
    }
}

/// Converts an async callable into middleware.
pub fn from_fn<F>(f: F) -> FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut Context, Args, Kwargs, Next) -> BoxFuture<'a, RunResult>
        + Send
        + Sync
        + 'static,
{
    FnMiddleware::new(f)
}

/// Alias of [`from_fn`].
///
/// Prefer [`chain!`](crate::chain) or [`decorate`](crate::decorate) when the
/// callable is going to be combined with other middleware anyway.
pub fn as_middleware<F>(f: F) -> FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut Context, Args, Kwargs, Next) -> BoxFuture<'a, RunResult>
        + Send
        + Sync
        + 'static,
{
    FnMiddleware::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::event::EventKind;
    use crate::foundation::outcome::Outcome;
    use serde_json::json;

    #[tokio::test]
    async fn test_wrapped_callable_receives_arguments() {
        let mw = from_fn(|ctx, args, mut kwargs, next| {
            Box::pin(async move {
                kwargs.insert("seen".into(), json!(args.len()));
                ctx.kwargs_mut().extend(kwargs.clone());
                next.run(ctx, args, kwargs).await
            })
        });

        let mut ctx = Context::new(EventKind::Message, Vec::new(), Kwargs::new());
        let outcome = mw
            .run(&mut ctx, vec![json!(1), json!(2)], Kwargs::new(), Next::noop())
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Handled);
        assert_eq!(ctx.kwarg("seen"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn test_callable_may_skip_next() {
        let mw = from_fn(|_ctx, _args, _kwargs, _next| {
            Box::pin(async move { Ok(Outcome::Data(json!("done"))) })
        });

        let mut ctx = Context::new(EventKind::Message, Vec::new(), Kwargs::new());
        let outcome = mw
            .run(&mut ctx, Vec::new(), Kwargs::new(), Next::noop())
            .await
            .unwrap();

        assert_eq!(outcome.into_data(), Some(json!("done")));
    }

    #[test]
    fn test_source_is_recorded() {
        let mw = FnMiddleware::named("greet", |ctx, args, kwargs, next: Next| {
            Box::pin(next.run(ctx, args, kwargs))
        });
        assert_eq!(mw.source(), Some("greet"));

        let anonymous = from_fn(|ctx, args, kwargs, next| Box::pin(next.run(ctx, args, kwargs)));
        assert!(anonymous.source().is_some_and(|s| s.contains("closure")));
    }
}
