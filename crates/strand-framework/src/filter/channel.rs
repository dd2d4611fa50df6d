//! Message channel filter.

use std::ops::BitOr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strand_core::{Args, Context, Kwargs, Middleware, Next, Outcome, RunResult};

use super::message_field;
use crate::decorator::Decorator;

/// The kind of channel a message was sent in.
///
/// Numeric codes follow the chat platform's channel type numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// A guild text channel.
    Text,
    /// A direct message with a single user.
    Dm,
    /// A guild voice channel.
    Voice,
    /// A direct message with several users.
    Group,
    /// A guild channel category.
    Category,
    /// A guild news channel.
    News,
}

impl ChannelKind {
    /// Maps a numeric channel type code.
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Self::Text),
            1 => Some(Self::Dm),
            2 => Some(Self::Voice),
            3 => Some(Self::Group),
            4 => Some(Self::Category),
            5 => Some(Self::News),
            _ => None,
        }
    }

    /// Maps a channel type name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(Self::Text),
            "dm" => Some(Self::Dm),
            "voice" => Some(Self::Voice),
            "group" => Some(Self::Group),
            "category" => Some(Self::Category),
            "news" => Some(Self::News),
            _ => None,
        }
    }

    /// Reads a channel type given either as a code or as a name.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(code) => code.as_u64().and_then(Self::from_code),
            Value::String(name) => Self::from_name(name),
            _ => None,
        }
    }
}

/// A set of accepted channel kinds.
///
/// Voice, category and news channels never carry messages and are not
/// selectable.
///
/// ```rust,ignore
/// let dms_only = channel_type(ChannelTypes::DM);
/// let text_or_dm = channel_type(ChannelTypes::TEXT | ChannelTypes::DM);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelTypes {
    /// Guild text channels.
    #[serde(default)]
    pub text: bool,
    /// One-to-one direct messages.
    #[serde(default)]
    pub dm: bool,
    /// Group direct messages.
    #[serde(default)]
    pub group: bool,
}

impl ChannelTypes {
    /// Accepts nothing.
    pub const NONE: Self = Self {
        text: false,
        dm: false,
        group: false,
    };

    /// Guild text channels.
    pub const TEXT: Self = Self {
        text: true,
        ..Self::NONE
    };

    /// One-to-one direct messages.
    pub const DM: Self = Self {
        dm: true,
        ..Self::NONE
    };

    /// Group direct messages.
    pub const GROUP: Self = Self {
        group: true,
        ..Self::NONE
    };

    /// Every channel in a guild that carries messages. Same as [`Self::TEXT`].
    pub const GUILD: Self = Self::TEXT;

    /// Every private channel: one-to-one and group direct messages.
    pub const PRIVATE: Self = Self {
        dm: true,
        group: true,
        text: false,
    };

    /// Returns `true` if messages in `kind` channels are accepted.
    pub fn accepts(&self, kind: ChannelKind) -> bool {
        match kind {
            ChannelKind::Text => self.text,
            ChannelKind::Dm => self.dm,
            ChannelKind::Group => self.group,
            ChannelKind::Voice | ChannelKind::Category | ChannelKind::News => false,
        }
    }
}

impl BitOr for ChannelTypes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            text: self.text || rhs.text,
            dm: self.dm || rhs.dm,
            group: self.group || rhs.group,
        }
    }
}

/// Forwards messages sent in accepted kinds of channel.
///
/// The channel kind is read from `message.channel.type` of the context's
/// keyword arguments. Messages whose channel kind is missing or unrecognized
/// are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelFilter {
    accepted: ChannelTypes,
}

impl ChannelFilter {
    /// Creates a filter accepting `accepted`.
    pub fn new(accepted: ChannelTypes) -> Self {
        Self { accepted }
    }

    /// Returns the accepted channel kinds.
    pub fn accepted(&self) -> ChannelTypes {
        self.accepted
    }
}

#[async_trait]
impl Middleware for ChannelFilter {
    async fn run(&self, ctx: &mut Context, args: Args, kwargs: Kwargs, next: Next) -> RunResult {
        let accepted = message_field(ctx, "/channel/type")
            .and_then(ChannelKind::from_value)
            .is_some_and(|kind| self.accepted.accepts(kind));

        if accepted {
            return next.run(ctx, args, kwargs).await;
        }
        Ok(Outcome::Ignore)
    }
}

/// Decorator accepting messages sent in `accepted` kinds of channel.
pub fn channel_type(accepted: ChannelTypes) -> Decorator {
    Decorator::new(ChannelFilter::new(accepted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strand_core::EventKind;

    fn in_channel(kind: Value) -> Context {
        let mut kwargs = Kwargs::new();
        kwargs.insert(
            "message".into(),
            json!({ "content": "hi", "channel": { "id": 7, "type": kind } }),
        );
        Context::new(EventKind::Message, Vec::new(), kwargs)
    }

    fn passes(accepted: ChannelTypes, kind: Value) -> bool {
        let mut ctx = in_channel(kind);
        let outcome = tokio_test::block_on(channel_type(accepted).run(
            &mut ctx,
            Vec::new(),
            Kwargs::new(),
            Next::noop(),
        ))
        .unwrap();
        outcome.is_successful()
    }

    #[test]
    fn test_guild_means_text() {
        assert!(passes(ChannelTypes::GUILD, json!(0)));
        assert!(passes(ChannelTypes::GUILD, json!("text")));
        assert!(!passes(ChannelTypes::GUILD, json!(1)));
        assert!(!passes(ChannelTypes::GUILD, json!(2)));
    }

    #[test]
    fn test_private_means_dm_and_group() {
        assert!(passes(ChannelTypes::PRIVATE, json!(1)));
        assert!(passes(ChannelTypes::PRIVATE, json!(3)));
        assert!(passes(ChannelTypes::PRIVATE, json!("group")));
        assert!(!passes(ChannelTypes::PRIVATE, json!(0)));
    }

    #[test]
    fn test_private_is_not_a_channel_name() {
        assert_eq!(ChannelKind::from_name("dm"), Some(ChannelKind::Dm));
        assert_eq!(ChannelKind::from_name("private"), None);
        assert!(!passes(ChannelTypes::PRIVATE, json!("private")));
    }

    #[test]
    fn test_combined_sets() {
        let accepted = ChannelTypes::TEXT | ChannelTypes::DM;
        assert!(passes(accepted, json!(0)));
        assert!(passes(accepted, json!(1)));
        assert!(!passes(accepted, json!(3)));
    }

    #[test]
    fn test_unrecognized_channel_is_ignored() {
        let everything = ChannelTypes::GUILD | ChannelTypes::PRIVATE;
        assert!(!passes(everything, json!(42)));
        assert!(!passes(everything, json!("forum")));
        assert!(!passes(everything, Value::Null));
        assert!(!passes(ChannelTypes::NONE, json!(0)));
    }
}
