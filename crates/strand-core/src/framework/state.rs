//! State-injecting middleware.

use async_trait::async_trait;
use serde_json::Value;

use crate::foundation::context::{Args, Context, Kwargs};
use crate::foundation::error::RunResult;
use crate::framework::middleware::{Middleware, Next};

/// Keyword under which [`StateMiddleware`] binds its state.
pub const STATE_KEY: &str = "state";

/// Provides a shared state value to everything after it in a chain.
///
/// The state is bound to the `state` keyword argument of the forwarded call;
/// all other arguments pass through unchanged. Use it to hand configuration
/// to a sub-chain without reaching for globals.
///
/// ```rust,ignore
/// let chain = chain![reply_handler, StateMiddleware::new(json!({"prefix": "!"}))];
/// ```
#[derive(Debug, Clone)]
pub struct StateMiddleware {
    state: Value,
}

impl StateMiddleware {
    /// Creates a middleware providing `state`.
    pub fn new(state: impl Into<Value>) -> Self {
        Self {
            state: state.into(),
        }
    }

    /// Returns the provided state.
    pub fn state(&self) -> &Value {
        &self.state
    }
}

#[async_trait]
impl Middleware for StateMiddleware {
    async fn run(
        &self,
        ctx: &mut Context,
        args: Args,
        mut kwargs: Kwargs,
        next: Next,
    ) -> RunResult {
        kwargs.insert(STATE_KEY.to_string(), self.state.clone());
        next.run(ctx, args, kwargs).await
    }
}
