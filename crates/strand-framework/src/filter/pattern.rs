//! Message content filter.

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use strand_core::{Args, Context, Kwargs, Middleware, Next, Outcome, RunResult};
use tracing::trace;

use super::message_field;
use crate::decorator::Decorator;
use crate::error::{FilterError, FilterResult};

/// Forwards messages whose content matches a regular expression.
///
/// The expression is searched for anywhere in `message.content` of the
/// context's keyword arguments. On a match every named group is added to the
/// forwarded keyword arguments, bound to the matched text, or to `null` if
/// the group did not take part in the match. Unnamed groups are dropped.
///
/// Events without a textual message content are ignored.
///
/// ```rust,ignore
/// let greet = pattern(r"hello (?P<name>\w+)")?.apply(from_fn(|ctx, args, kwargs, next| {
///     Box::pin(async move {
///         let name = kwargs["name"].as_str().unwrap_or_default();
///         // ...
///         Ok(Outcome::Handled)
///     })
/// }));
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Compiles `pattern`.
    pub fn new(pattern: &str) -> FilterResult<Self> {
        let regex = Regex::new(pattern).map_err(|source| FilterError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex })
    }

    /// Returns the source expression.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Searches `content`, returning the named groups on a match.
    pub fn captures(&self, content: &str) -> Option<Kwargs> {
        let captures = self.regex.captures(content)?;

        let groups = self
            .regex
            .capture_names()
            .flatten()
            .map(|name| {
                let value = captures
                    .name(name)
                    .map_or(Value::Null, |m| Value::String(m.as_str().to_string()));
                (name.to_string(), value)
            })
            .collect();

        Some(groups)
    }
}

#[async_trait]
impl Middleware for Pattern {
    async fn run(
        &self,
        ctx: &mut Context,
        args: Args,
        mut kwargs: Kwargs,
        next: Next,
    ) -> RunResult {
        let groups = match message_field(ctx, "/content").and_then(Value::as_str) {
            Some(content) => self.captures(content),
            None => {
                trace!(event = %ctx.event(), "No message content to match");
                return Ok(Outcome::Ignore);
            }
        };

        match groups {
            Some(groups) => {
                kwargs.extend(groups);
                next.run(ctx, args, kwargs).await
            }
            None => Ok(Outcome::Ignore),
        }
    }
}

/// Decorator accepting messages whose content matches `pattern`.
///
/// Fails if `pattern` is not a valid regular expression.
pub fn pattern(pattern: &str) -> FilterResult<Decorator> {
    Pattern::new(pattern).map(Decorator::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;
    use strand_core::{EventKind, Middleware, from_fn};

    fn message_context(content: Value) -> Context {
        let mut kwargs = Kwargs::new();
        kwargs.insert("message".into(), json!({ "content": content }));
        Context::new(EventKind::Message, Vec::new(), kwargs)
    }

    fn recorder(seen: Arc<Mutex<Option<Kwargs>>>) -> Next {
        Next::to(from_fn(move |_ctx, _args, kwargs, _next| {
            let seen = seen.clone();
            Box::pin(async move {
                *seen.lock() = Some(kwargs);
                Ok(Outcome::Handled)
            })
        }))
    }

    #[tokio::test]
    async fn test_named_groups_are_forwarded() {
        let seen = Arc::new(Mutex::new(None));
        let filter = Pattern::new(r"hello (?P<name>\w+)").unwrap();

        let mut ctx = message_context(json!("hello world"));
        let mut kwargs = Kwargs::new();
        kwargs.insert("kept".into(), json!(true));

        let outcome = filter
            .run(&mut ctx, Vec::new(), kwargs, recorder(seen.clone()))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Handled);
        let forwarded = seen.lock().clone().unwrap();
        assert_eq!(forwarded.get("name"), Some(&json!("world")));
        assert_eq!(forwarded.get("kept"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn test_no_match_ignores_without_calling_next() {
        let seen = Arc::new(Mutex::new(None));
        let filter = Pattern::new(r"hello (?P<name>\w+)").unwrap();

        let mut ctx = message_context(json!("goodbye world"));
        let outcome = filter
            .run(&mut ctx, Vec::new(), Kwargs::new(), recorder(seen.clone()))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Ignore);
        assert!(seen.lock().is_none());
    }

    #[tokio::test]
    async fn test_missing_content_ignores() {
        let filter = Pattern::new(".*").unwrap();

        let mut ctx = Context::new(EventKind::Ready, Vec::new(), Kwargs::new());
        let outcome = filter
            .run(&mut ctx, Vec::new(), Kwargs::new(), Next::noop())
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Ignore);

        let mut ctx = message_context(json!(42));
        let outcome = filter
            .run(&mut ctx, Vec::new(), Kwargs::new(), Next::noop())
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Ignore);
    }

    #[test]
    fn test_unmatched_optional_group_binds_null() {
        let filter = Pattern::new(r"^!roll(?: (?P<sides>\d+))?(\s*)$").unwrap();

        let groups = filter.captures("!roll").unwrap();
        assert_eq!(groups.get("sides"), Some(&Value::Null));
        assert_eq!(groups.len(), 1);

        let groups = filter.captures("!roll 20").unwrap();
        assert_eq!(groups.get("sides"), Some(&json!("20")));
    }

    #[test]
    fn test_invalid_pattern_fails_at_construction() {
        let err = pattern(r"hello (?P<name>\w+").unwrap_err();
        assert!(matches!(err, FilterError::InvalidPattern { ref pattern, .. } if pattern.starts_with("hello")));
    }
}
