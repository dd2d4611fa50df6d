//! Event argument normalization.

use std::sync::Arc;

use async_trait::async_trait;
use strand_core::{Args, Context, Kwargs, Middleware, Next, RunResult};
use tracing::{trace, warn};

use crate::catalog::Catalog;

/// Converts an event's leading positional arguments into keyword arguments.
///
/// For a catalogued event with parameter names `(a, b)` and context
/// arguments `(x, y, z)`, the context gains `a = x` and `b = y` and keeps
/// `(z)` as its positional arguments. Events without a catalog entry,
/// including [`EventKind::Unknown`](strand_core::EventKind::Unknown), keep
/// their arguments untouched. Either way the call is forwarded.
///
/// Only the context's arguments are rewritten; the call's own `args` and
/// `kwargs` are forwarded as received.
///
/// Usually the outermost unit of a root chain, so it is added last:
///
/// ```rust,ignore
/// let root = chain![handlers, Normalize::default()];
/// ```
#[derive(Debug, Clone, Default)]
pub struct Normalize {
    catalog: Arc<Catalog>,
}

impl Normalize {
    /// Creates a normalizer backed by `catalog`.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// Returns the catalog in use.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Binds the leading arguments of `ctx` per the catalog.
    ///
    /// If the event carries fewer arguments than its entry names, only the
    /// available ones are bound.
    pub fn apply(&self, ctx: &mut Context) {
        let Some(names) = self.catalog.get(ctx.event()) else {
            trace!(event = %ctx.event(), "Event not catalogued, skipping normalization");
            return;
        };

        let available = ctx.args().len();
        if available < names.len() {
            warn!(
                event = %ctx.event(),
                expected = names.len(),
                available,
                "Event carries fewer arguments than catalogued"
            );
        }

        let bound = names.len().min(available);
        let rest = ctx.args_mut().split_off(bound);
        let leading = std::mem::replace(ctx.args_mut(), rest);

        for (name, value) in names.iter().zip(leading) {
            ctx.kwargs_mut().insert(name.clone(), value);
        }

        trace!(event = %ctx.event(), bound, "Normalized event arguments");
    }
}

#[async_trait]
impl Middleware for Normalize {
    async fn run(&self, ctx: &mut Context, args: Args, kwargs: Kwargs, next: Next) -> RunResult {
        self.apply(ctx);
        next.run(ctx, args, kwargs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strand_core::{EventKind, Outcome};

    fn context(event: EventKind, args: Args) -> Context {
        Context::new(event, args, Kwargs::new())
    }

    #[tokio::test]
    async fn test_leading_arguments_become_keywords() {
        let normalize = Normalize::new(Catalog::empty().with(EventKind::MessageEdit, ["a", "b"]));
        let mut ctx = context(EventKind::MessageEdit, vec![json!("x"), json!("y"), json!("z")]);

        let outcome = normalize
            .run(&mut ctx, Vec::new(), Kwargs::new(), Next::noop())
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Handled);
        assert_eq!(ctx.kwarg("a"), Some(&json!("x")));
        assert_eq!(ctx.kwarg("b"), Some(&json!("y")));
        assert_eq!(ctx.kwargs().len(), 2);
        assert_eq!(ctx.args(), &[json!("z")]);
    }

    #[tokio::test]
    async fn test_unknown_event_passes_through() {
        let normalize = Normalize::default();
        let args = vec![json!(1), json!({"k": "v"})];
        let mut ctx = context(EventKind::Unknown, args.clone());

        normalize
            .run(&mut ctx, Vec::new(), Kwargs::new(), Next::noop())
            .await
            .unwrap();

        assert_eq!(ctx.args(), args.as_slice());
        assert!(ctx.kwargs().is_empty());
    }

    #[test]
    fn test_uncatalogued_event_passes_through() {
        let normalize = Normalize::new(Catalog::empty());
        let mut ctx = context(EventKind::Message, vec![json!({"content": "hi"})]);

        normalize.apply(&mut ctx);

        assert_eq!(ctx.args().len(), 1);
        assert!(ctx.kwargs().is_empty());
    }

    #[test]
    fn test_short_argument_list_binds_available() {
        let normalize = Normalize::default();
        let mut ctx = context(EventKind::Typing, vec![json!("general")]);

        normalize.apply(&mut ctx);

        assert_eq!(ctx.kwarg("channel"), Some(&json!("general")));
        assert_eq!(ctx.kwarg("user"), None);
        assert!(ctx.args().is_empty());
    }

    #[test]
    fn test_empty_entry_keeps_arguments() {
        let normalize = Normalize::default();
        let mut ctx = context(EventKind::Ready, vec![json!("extra")]);

        normalize.apply(&mut ctx);

        assert_eq!(ctx.args(), &[json!("extra")]);
        assert!(ctx.kwargs().is_empty());
    }
}
