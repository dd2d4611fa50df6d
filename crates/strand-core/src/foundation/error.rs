//! Error types for the Strand core engine.
//!
//! A fault raised inside a middleware's `run` travels back up the awaiting
//! chain as a [`MiddlewareError`]. The engine never catches or retries it;
//! whoever spawned the invocation decides what to do with it.
//!
//! Not handling an event is not an error. That is signalled with
//! [`Outcome::Ignore`](crate::Outcome::Ignore).

use thiserror::Error;

/// A boxed error type for faults raised by user middleware.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while running a middleware.
#[derive(Debug, Error)]
pub enum MiddlewareError {
    /// A keyword argument the middleware depends on was not bound.
    #[error("missing keyword argument '{key}'")]
    Missing {
        /// Name of the absent argument.
        key: String,
    },

    /// A keyword argument was bound but had the wrong shape.
    #[error("invalid keyword argument '{key}': {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        key: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Any other fault raised by a middleware.
    #[error(transparent)]
    Other(#[from] BoxError),
}

impl MiddlewareError {
    /// Creates a missing argument error.
    pub fn missing(key: impl Into<String>) -> Self {
        Self::Missing { key: key.into() }
    }

    /// Creates an invalid argument error.
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Wraps an arbitrary error.
    pub fn other<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Other(Box::new(err))
    }

    /// Creates an error from a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::Other(message.into())
    }
}

/// Result type returned by middleware.
pub type RunResult<T = crate::Outcome> = Result<T, MiddlewareError>;
