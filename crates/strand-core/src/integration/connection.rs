//! Connection trait and related types.
//!
//! A [`Connection`] is the live chat client an event came from. The engine
//! only needs two things from it: a stable identifier for logs, and a hook
//! for the client's own bookkeeping, which the dispatcher calls before any
//! middleware sees the event. Middleware that wants to talk back to the
//! network downcasts the connection to its concrete client type.

use std::any::Any;
use std::sync::Arc;

use serde_json::Value;

/// The originating side of a stream of raw chat events.
pub trait Connection: Send + Sync + 'static {
    /// Returns an identifier for this connection.
    fn id(&self) -> &str;

    /// The client's default handling of a raw event.
    ///
    /// Called unconditionally for every raw event before it is routed to
    /// middleware. The default does nothing.
    fn on_raw_event(&self, _name: &str, _args: &[Value]) {}

    /// Returns this connection as `Any` for downcasting.
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// A shared, type-erased connection.
pub type BoxedConnection = Arc<dyn Connection>;
