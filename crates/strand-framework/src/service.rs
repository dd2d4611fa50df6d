//! Tower integration.
//!
//! [`MiddlewareService`] exposes a root middleware as a
//! `tower::Service<Context>`, so Tower layers can be stacked around a whole
//! chain:
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use tower::ServiceBuilder;
//! use tower::timeout::TimeoutLayer;
//!
//! let service = ServiceBuilder::new()
//!     .layer(TimeoutLayer::new(Duration::from_secs(5)))
//!     .service(MiddlewareService::new(root, Next::noop()));
//! ```

use std::task::Poll;

use futures::future::BoxFuture;
use strand_core::{
    BoxedMiddleware, Context, IntoMiddleware, Kwargs, MiddlewareError, Next, Outcome,
};
use tower::Service;

/// A root middleware and its terminal continuation, callable as a service.
///
/// Each call takes ownership of one event's [`Context`] and runs the root
/// with empty call arguments.
#[derive(Clone)]
pub struct MiddlewareService {
    root: BoxedMiddleware,
    terminal: Next,
}

impl MiddlewareService {
    /// Creates a service running `root` in front of `terminal`.
    pub fn new(root: impl IntoMiddleware, terminal: Next) -> Self {
        Self {
            root: root.into_middleware(),
            terminal,
        }
    }

    /// Returns the root middleware.
    pub fn root(&self) -> &BoxedMiddleware {
        &self.root
    }
}

impl Service<Context> for MiddlewareService {
    type Response = Outcome;
    type Error = MiddlewareError;
    type Future = BoxFuture<'static, Result<Outcome, MiddlewareError>>;

    fn poll_ready(&mut self, _cx: &mut std::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, mut ctx: Context) -> Self::Future {
        let root = self.root.clone();
        let terminal = self.terminal.clone();

        Box::pin(async move { root.run(&mut ctx, Vec::new(), Kwargs::new(), terminal).await })
    }
}

impl std::fmt::Debug for MiddlewareService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareService")
            .field("root", &self.root.name())
            .field("terminal", &self.terminal)
            .finish()
    }
}
