//! "First success" middleware grouping.

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::foundation::context::{Args, Context, Kwargs};
use crate::foundation::error::RunResult;
use crate::foundation::outcome::Outcome;
use crate::framework::collection::MiddlewareCollection;
use crate::framework::middleware::{BoxedMiddleware, IntoMiddleware, Middleware, Next};

/// Tries each member in order until one handles the event.
///
/// Members are alternatives, not links: every member is run with the same
/// `next` and the same arguments, and the first outcome that is not
/// [`Outcome::Ignore`] is returned. Members after it are never invoked. If
/// every member ignores the event (or there are none), the collection
/// ignores it too.
///
/// A fault in a member propagates immediately; later members are not tried.
///
/// ```rust,ignore
/// let commands = FirstSuccess::new()
///     .with(decorate(pattern(r"^!ping")?, ping))
///     .with(decorate(pattern(r"^!help")?, help));
/// ```
#[derive(Clone, Default)]
pub struct FirstSuccess {
    units: Vec<BoxedMiddleware>,
}

impl FirstSuccess {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self { units: Vec::new() }
    }

    /// Appends an alternative (builder pattern).
    pub fn with(mut self, unit: impl IntoMiddleware) -> Self {
        self.units.push(unit.into_middleware());
        self
    }
}

impl MiddlewareCollection for FirstSuccess {
    fn units(&self) -> &[BoxedMiddleware] {
        &self.units
    }

    fn push(&mut self, unit: BoxedMiddleware) {
        self.units.push(unit);
    }
}

#[async_trait]
impl Middleware for FirstSuccess {
    async fn run(&self, ctx: &mut Context, args: Args, kwargs: Kwargs, next: Next) -> RunResult {
        for (index, unit) in self.units.iter().enumerate() {
            trace!(event = %ctx.event(), index, unit = unit.name(), "Trying alternative");

            let outcome = unit
                .run(ctx, args.clone(), kwargs.clone(), next.clone())
                .await?;

            if outcome.is_successful() {
                debug!(event = %ctx.event(), index, unit = unit.name(), "Alternative handled event");
                return Ok(outcome);
            }
        }

        trace!(event = %ctx.event(), "No alternative handled event");
        Ok(Outcome::Ignore)
    }
}

impl std::fmt::Debug for FirstSuccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirstSuccess")
            .field("units", &self.units.iter().map(|u| u.name()).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::error::MiddlewareError;
    use crate::foundation::event::EventKind;
    use crate::framework::function::from_fn;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fails;

    #[async_trait]
    impl Middleware for Fails {
        async fn run(&self, _ctx: &mut Context, _args: Args, _kwargs: Kwargs, _next: Next) -> RunResult {
            Err(MiddlewareError::msg("boom"))
        }
    }

    struct Ignores;

    #[async_trait]
    impl Middleware for Ignores {
        async fn run(&self, _ctx: &mut Context, _args: Args, _kwargs: Kwargs, _next: Next) -> RunResult {
            Ok(Outcome::Ignore)
        }
    }

    struct Returns(&'static str, Arc<AtomicUsize>);

    #[async_trait]
    impl Middleware for Returns {
        async fn run(&self, _ctx: &mut Context, _args: Args, _kwargs: Kwargs, _next: Next) -> RunResult {
            self.1.fetch_add(1, Ordering::SeqCst);
            Ok(Outcome::Data(json!(self.0)))
        }
    }

    #[tokio::test]
    async fn test_first_successful_member_wins() {
        let c_calls = Arc::new(AtomicUsize::new(0));
        let d_calls = Arc::new(AtomicUsize::new(0));

        let group = FirstSuccess::new()
            .with(Ignores)
            .with(Ignores)
            .with(Returns("c", c_calls.clone()))
            .with(Returns("d", d_calls.clone()));

        let mut ctx = Context::new(EventKind::Message, Vec::new(), Kwargs::new());
        let outcome = group
            .run(&mut ctx, Vec::new(), Kwargs::new(), Next::noop())
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Data(json!("c")));
        assert_eq!(c_calls.load(Ordering::SeqCst), 1);
        assert_eq!(d_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_ignore() {
        let group = FirstSuccess::new().with(Ignores).with(Ignores).with(Ignores);

        let mut ctx = Context::new(EventKind::Message, Vec::new(), Kwargs::new());
        let outcome = group
            .run(&mut ctx, Vec::new(), Kwargs::new(), Next::noop())
            .await
            .unwrap();

        assert!(outcome.is_ignored());
    }

    #[tokio::test]
    async fn test_members_share_next_and_arguments() {
        let seen = Arc::new(Mutex::new(Vec::new()));

        let record = {
            let seen = seen.clone();
            move |ignore: bool| {
                let seen = seen.clone();
                from_fn(move |_ctx, args, kwargs, _next| {
                    let seen = seen.clone();
                    Box::pin(async move {
                        seen.lock().push((args, kwargs));
                        Ok(if ignore { Outcome::Ignore } else { Outcome::Handled })
                    })
                })
            }
        };

        let group = FirstSuccess::new().with(record(true)).with(record(false));

        let mut kwargs = Kwargs::new();
        kwargs.insert("k".into(), json!("v"));
        let mut ctx = Context::new(EventKind::Message, Vec::new(), Kwargs::new());
        group
            .run(&mut ctx, vec![json!(1)], kwargs.clone(), Next::noop())
            .await
            .unwrap();

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], (vec![json!(1)], kwargs.clone()));
        assert_eq!(seen[1], seen[0]);
    }

    #[tokio::test]
    async fn test_empty_group_ignores() {
        let mut ctx = Context::new(EventKind::Ready, Vec::new(), Kwargs::new());
        let outcome = FirstSuccess::new()
            .run(&mut ctx, Vec::new(), Kwargs::new(), Next::noop())
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Ignore);
    }

    #[tokio::test]
    async fn test_fault_stops_the_search() {
        let group = FirstSuccess::new().with(Ignores).with(Fails).with(Ignores);

        let mut ctx = Context::new(EventKind::Ready, Vec::new(), Kwargs::new());
        let result = group
            .run(&mut ctx, Vec::new(), Kwargs::new(), Next::noop())
            .await;

        assert!(matches!(result, Err(MiddlewareError::Other(_))));
    }
}
