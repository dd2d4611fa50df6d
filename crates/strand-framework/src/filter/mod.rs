//! Predicate middleware for common routing decisions.
//!
//! Each filter forwards the call unchanged when its predicate holds and
//! returns [`Outcome::Ignore`](strand_core::Outcome::Ignore) otherwise. The
//! factory functions return a [`Decorator`](crate::Decorator), which can be
//! applied to a handler or placed in a chain directly.
//!
//! | Factory | Accepts |
//! |---|---|
//! | [`event`] | events of one kind |
//! | [`pattern`] | messages whose content matches a regex |
//! | [`authored_by_bot`] / [`not_authored_by_bot`] | messages by bot / human authors |
//! | [`channel_type`] | messages in selected kinds of channel |
//!
//! Message filters read the `message` keyword argument of the context, which
//! [`Normalize`](crate::Normalize) binds for message events.

pub mod author;
pub mod channel;
pub mod event;
pub mod pattern;

pub use author::{AuthorFilter, authored_by_bot, not_authored_by_bot};
pub use channel::{ChannelFilter, ChannelKind, ChannelTypes, channel_type};
pub use event::{EventFilter, event};
pub use pattern::{Pattern, pattern};

use serde_json::Value;
use strand_core::Context;

/// Looks up a JSON pointer inside the context's `message` argument.
fn message_field<'a>(ctx: &'a Context, pointer: &str) -> Option<&'a Value> {
    ctx.kwarg("message")?.pointer(pointer)
}
