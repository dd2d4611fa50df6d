//! Message author filter.

use async_trait::async_trait;
use serde_json::Value;
use strand_core::{Args, Context, Kwargs, Middleware, Next, Outcome, RunResult};

use super::message_field;
use crate::decorator::Decorator;

/// Forwards messages by whether their author is a bot account.
///
/// Reads `message.author.bot` from the context's keyword arguments. An
/// author without the flag counts as a human. Events that carry no message
/// are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorFilter {
    bot: bool,
}

impl AuthorFilter {
    /// Creates a filter accepting messages whose author's bot flag equals `bot`.
    pub fn new(bot: bool) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Middleware for AuthorFilter {
    async fn run(&self, ctx: &mut Context, args: Args, kwargs: Kwargs, next: Next) -> RunResult {
        if ctx.kwarg("message").is_none() {
            return Ok(Outcome::Ignore);
        }

        let is_bot = message_field(ctx, "/author/bot")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        if is_bot == self.bot {
            return next.run(ctx, args, kwargs).await;
        }
        Ok(Outcome::Ignore)
    }
}

/// Decorator accepting only messages written by bot accounts.
pub fn authored_by_bot() -> Decorator {
    Decorator::new(AuthorFilter::new(true))
}

/// Decorator accepting only messages written by real users.
pub fn not_authored_by_bot() -> Decorator {
    Decorator::new(AuthorFilter::new(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strand_core::EventKind;

    fn from_author(author: Value) -> Context {
        let mut kwargs = Kwargs::new();
        kwargs.insert("message".into(), json!({ "content": "hi", "author": author }));
        Context::new(EventKind::Message, Vec::new(), kwargs)
    }

    async fn outcome(filter: &Decorator, ctx: &mut Context) -> Outcome {
        filter
            .run(ctx, Vec::new(), Kwargs::new(), Next::noop())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_bot_authors() {
        let mut ctx = from_author(json!({ "name": "helper", "bot": true }));

        assert_eq!(outcome(&authored_by_bot(), &mut ctx).await, Outcome::Handled);
        assert_eq!(outcome(&not_authored_by_bot(), &mut ctx).await, Outcome::Ignore);
    }

    #[tokio::test]
    async fn test_missing_flag_counts_as_human() {
        let mut ctx = from_author(json!({ "name": "ana" }));

        assert_eq!(outcome(&authored_by_bot(), &mut ctx).await, Outcome::Ignore);
        assert_eq!(outcome(&not_authored_by_bot(), &mut ctx).await, Outcome::Handled);
    }

    #[tokio::test]
    async fn test_missing_message_ignores() {
        let mut ctx = Context::new(EventKind::Typing, Vec::new(), Kwargs::new());

        assert_eq!(outcome(&not_authored_by_bot(), &mut ctx).await, Outcome::Ignore);
    }
}
