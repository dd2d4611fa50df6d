//! Event kind filter.

use async_trait::async_trait;
use strand_core::{Args, Context, EventKind, Kwargs, Middleware, Next, Outcome, RunResult};

use crate::decorator::Decorator;

/// Forwards only events of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventFilter {
    kind: EventKind,
}

impl EventFilter {
    /// Creates a filter accepting `kind`.
    pub fn new(kind: EventKind) -> Self {
        Self { kind }
    }

    /// Returns the accepted kind.
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

#[async_trait]
impl Middleware for EventFilter {
    async fn run(&self, ctx: &mut Context, args: Args, kwargs: Kwargs, next: Next) -> RunResult {
        if ctx.event() == self.kind {
            return next.run(ctx, args, kwargs).await;
        }
        Ok(Outcome::Ignore)
    }
}

/// Decorator accepting only events of `kind`.
pub fn event(kind: EventKind) -> Decorator {
    Decorator::new(EventFilter::new(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_kind_forwards() {
        let filter = EventFilter::new(EventKind::MemberJoin);

        let mut ctx = Context::new(EventKind::MemberJoin, Vec::new(), Kwargs::new());
        let outcome = tokio_test::block_on(filter.run(
            &mut ctx,
            Vec::new(),
            Kwargs::new(),
            Next::noop(),
        ))
        .unwrap();
        assert_eq!(outcome, Outcome::Handled);

        let mut ctx = Context::new(EventKind::MemberRemove, Vec::new(), Kwargs::new());
        let outcome = tokio_test::block_on(filter.run(
            &mut ctx,
            Vec::new(),
            Kwargs::new(),
            Next::noop(),
        ))
        .unwrap();
        assert_eq!(outcome, Outcome::Ignore);
    }

    #[test]
    fn test_unknown_events_can_be_selected() {
        let filter = EventFilter::new(EventKind::Unknown);
        let mut ctx = Context::new(
            EventKind::from_name("custom_event"),
            Vec::new(),
            Kwargs::new(),
        );

        let outcome = tokio_test::block_on(filter.run(
            &mut ctx,
            Vec::new(),
            Kwargs::new(),
            Next::noop(),
        ))
        .unwrap();
        assert!(outcome.is_successful());
    }
}
