//! Per-event context for the Strand engine.
//!
//! This module provides [`Context`], the envelope that carries one raw event
//! through a middleware chain. The event identifier is fixed at construction;
//! the positional and keyword arguments are rewritten freely as normalization
//! and filters consume and bind them.

use std::sync::Arc;

use serde_json::Value;

use crate::foundation::error::{MiddlewareError, RunResult};
use crate::foundation::event::EventKind;
use crate::integration::connection::BoxedConnection;

/// Ordered positional arguments.
pub type Args = Vec<Value>;

/// Named arguments. Keys are unique.
pub type Kwargs = serde_json::Map<String, Value>;

/// The context object passed to middleware during event processing.
///
/// One `Context` is created per raw event and is exclusively owned by the
/// chain invocation handling that event. Middleware receive it as
/// `&mut Context`, so every unit in one invocation sees the same argument
/// state. A unit may also replace it wholesale before calling `next`.
///
/// # Example
///
/// ```rust,ignore
/// use strand_core::{Context, EventKind};
/// use serde_json::json;
///
/// let mut ctx = Context::new(EventKind::Message, vec![json!({"content": "hi"})], Default::default());
/// let message = ctx.args_mut().remove(0);
/// ctx.kwargs_mut().insert("message".into(), message);
/// ```
#[derive(Clone)]
pub struct Context {
    /// The event being processed. Never reassigned.
    event: EventKind,
    /// The connection the event came from (if any).
    connection: Option<BoxedConnection>,
    /// Remaining positional arguments.
    args: Args,
    /// Named arguments bound so far.
    kwargs: Kwargs,
}

impl Context {
    /// Creates a context that is not attached to any connection.
    pub fn new(event: EventKind, args: Args, kwargs: Kwargs) -> Self {
        Self {
            event,
            connection: None,
            args,
            kwargs,
        }
    }

    /// Creates a context for an event received on `connection`.
    pub fn with_connection(
        connection: BoxedConnection,
        event: EventKind,
        args: Args,
        kwargs: Kwargs,
    ) -> Self {
        Self {
            event,
            connection: Some(connection),
            args,
            kwargs,
        }
    }

    /// Returns the event identifier.
    pub fn event(&self) -> EventKind {
        self.event
    }

    /// Returns the originating connection, if available.
    pub fn connection(&self) -> Option<&BoxedConnection> {
        self.connection.as_ref()
    }

    /// Returns the originating connection downcast to its concrete type.
    pub fn connection_as<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.connection
            .clone()
            .and_then(|conn| conn.as_any().downcast::<T>().ok())
    }

    /// Returns the remaining positional arguments.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Returns mutable access to the positional arguments.
    pub fn args_mut(&mut self) -> &mut Args {
        &mut self.args
    }

    /// Replaces the positional arguments.
    pub fn set_args(&mut self, args: Args) {
        self.args = args;
    }

    /// Takes the positional arguments, leaving none behind.
    pub fn take_args(&mut self) -> Args {
        std::mem::take(&mut self.args)
    }

    /// Returns the named arguments.
    pub fn kwargs(&self) -> &Kwargs {
        &self.kwargs
    }

    /// Returns mutable access to the named arguments.
    pub fn kwargs_mut(&mut self) -> &mut Kwargs {
        &mut self.kwargs
    }

    /// Looks up a named argument.
    pub fn kwarg(&self, key: &str) -> Option<&Value> {
        self.kwargs.get(key)
    }

    /// Looks up a named argument, failing if it is not bound.
    pub fn require(&self, key: &str) -> RunResult<&Value> {
        self.kwargs
            .get(key)
            .ok_or_else(|| MiddlewareError::missing(key))
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("event", &self.event)
            .field("connection", &self.connection.as_ref().map(|c| c.id()))
            .field("args", &self.args)
            .field("kwargs", &self.kwargs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::connection::Connection;
    use serde_json::json;
    use std::any::Any;

    struct MockConnection;

    impl Connection for MockConnection {
        fn id(&self) -> &str {
            "mock"
        }

        fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    #[test]
    fn test_args_and_kwargs_are_mutable() {
        let mut ctx = Context::new(
            EventKind::Typing,
            vec![json!("channel"), json!("user")],
            Kwargs::new(),
        );

        let first = ctx.args_mut().remove(0);
        ctx.kwargs_mut().insert("channel".into(), first);

        assert_eq!(ctx.args(), &[json!("user")]);
        assert_eq!(ctx.kwarg("channel"), Some(&json!("channel")));
        assert_eq!(ctx.event(), EventKind::Typing);
    }

    #[test]
    fn test_require_reports_missing_key() {
        let ctx = Context::new(EventKind::Message, Vec::new(), Kwargs::new());
        let err = ctx.require("message").unwrap_err();
        assert!(matches!(err, MiddlewareError::Missing { ref key } if key == "message"));
    }

    #[test]
    fn test_connection_downcast() {
        let ctx = Context::with_connection(
            Arc::new(MockConnection),
            EventKind::Ready,
            Vec::new(),
            Kwargs::new(),
        );

        assert_eq!(ctx.connection().map(|c| c.id()), Some("mock"));
        assert!(ctx.connection_as::<MockConnection>().is_some());
        assert!(ctx.connection_as::<String>().is_none());
    }
}
