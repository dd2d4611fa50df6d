//! Foundation layer - Core abstractions and value model.
//!
//! This module contains the fundamental building blocks of the Strand engine:
//! - Event identifiers for raw chat events
//! - The per-event [`Context`] envelope
//! - Middleware outcomes and errors

pub mod context;
pub mod error;
pub mod event;
pub mod outcome;

pub use context::{Args, Context, Kwargs};
pub use error::{BoxError, MiddlewareError, RunResult};
pub use event::EventKind;
pub use outcome::{Outcome, is_successful_result};
