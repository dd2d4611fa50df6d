//! Middleware collections.
//!
//! A collection groups middleware and is itself a middleware. How the
//! members run is up to the strategy:
//!
//! - [`Chain`](crate::Chain) threads the call through every member in turn.
//! - [`FirstSuccess`](crate::FirstSuccess) tries members until one handles
//!   the event.
//!
//! Only middleware can be added to a collection:
//!
//! ```compile_fail
//! use strand_core::{Chain, MiddlewareCollection};
//!
//! let mut chain = Chain::new();
//! chain.add_middleware("not a middleware");
//! ```

use crate::framework::middleware::{BoxedMiddleware, IntoMiddleware, Middleware};

/// An ordered group of middleware with a grouping strategy.
pub trait MiddlewareCollection: Middleware + Default {
    /// Returns the members, in the order they were added.
    fn units(&self) -> &[BoxedMiddleware];

    /// Appends an already boxed member.
    fn push(&mut self, unit: BoxedMiddleware);

    /// Adds a member and returns it.
    fn add_middleware(&mut self, unit: impl IntoMiddleware) -> BoxedMiddleware {
        let unit = unit.into_middleware();
        self.push(unit.clone());
        unit
    }

    /// Returns the number of members.
    fn len(&self) -> usize {
        self.units().len()
    }

    /// Returns `true` if the collection has no members.
    fn is_empty(&self) -> bool {
        self.units().is_empty()
    }
}

/// Creates a collection of strategy `C` from `units`, in order.
///
/// ```rust,ignore
/// let alternatives: FirstSuccess = collection_of([
///     from_fn(on_ping).into_middleware(),
///     from_fn(on_help).into_middleware(),
/// ]);
/// ```
pub fn collection_of<C, I>(units: I) -> C
where
    C: MiddlewareCollection,
    I: IntoIterator<Item = BoxedMiddleware>,
{
    let mut collection = C::default();
    for unit in units {
        collection.push(unit);
    }
    collection
}
