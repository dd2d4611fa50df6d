//! Event identifiers for the Strand framework.
//!
//! Every raw event delivered by a chat connection carries a name. The
//! dispatcher maps that name onto [`EventKind`], a closed catalog of the
//! events a chat client is known to emit. Names outside the catalog are not
//! an error: they become [`EventKind::Unknown`] and still flow through the
//! middleware chain, so a catch-all filter can observe them.
//!
//! ```rust,ignore
//! use strand_core::EventKind;
//!
//! assert_eq!(EventKind::from_name("message"), EventKind::Message);
//! assert_eq!(EventKind::from_name("no_such_event"), EventKind::Unknown);
//! ```

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Generates [`EventKind`] together with its name table.
macro_rules! event_kinds {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Classification of the events a chat connection can emit.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum EventKind {
            $(
                #[doc = concat!("The `", $name, "` event.")]
                $variant,
            )*
            /// An event whose name is not in the catalog.
            Unknown,
        }

        impl EventKind {
            /// Every catalogued kind, in declaration order. Excludes [`EventKind::Unknown`].
            pub const ALL: &'static [EventKind] = &[$(EventKind::$variant,)*];

            /// Returns the wire name of this event.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(EventKind::$variant => $name,)*
                    EventKind::Unknown => "unknown",
                }
            }

            /// Maps a raw event name onto the catalog.
            ///
            /// Never fails; unrecognized names map to [`EventKind::Unknown`].
            pub fn from_name(name: &str) -> Self {
                match name {
                    $($name => EventKind::$variant,)*
                    _ => EventKind::Unknown,
                }
            }
        }
    };
}

event_kinds! {
    Connect => "connect",
    Ready => "ready",
    ShardReady => "shard_ready",
    Resumed => "resumed",
    Error => "error",
    SocketRawReceive => "socket_raw_receive",
    SocketRawSend => "socket_raw_send",
    Typing => "typing",
    Message => "message",
    MessageDelete => "message_delete",
    RawMessageDelete => "raw_message_delete",
    RawBulkMessageDelete => "raw_bulk_message_delete",
    MessageEdit => "message_edit",
    RawMessageEdit => "raw_message_edit",
    ReactionAdd => "reaction_add",
    RawReactionAdd => "raw_reaction_add",
    ReactionRemove => "reaction_remove",
    RawReactionRemove => "raw_reaction_remove",
    ReactionClear => "reaction_clear",
    RawReactionClear => "raw_reaction_clear",
    PrivateChannelCreate => "private_channel_create",
    PrivateChannelDelete => "private_channel_delete",
    PrivateChannelUpdate => "private_channel_update",
    PrivateChannelPinsUpdate => "private_channel_pins_update",
    GuildChannelCreate => "guild_channel_create",
    GuildChannelDelete => "guild_channel_delete",
    GuildChannelUpdate => "guild_channel_update",
    GuildChannelPinsUpdate => "guild_channel_pins_update",
    MemberJoin => "member_join",
    MemberRemove => "member_remove",
    MemberUpdate => "member_update",
    GuildJoin => "guild_join",
    GuildRemove => "guild_remove",
    GuildUpdate => "guild_update",
    GuildRoleCreate => "guild_role_create",
    GuildRoleDelete => "guild_role_delete",
    GuildRoleUpdate => "guild_role_update",
    GuildEmojisUpdate => "guild_emojis_update",
    GuildAvailable => "guild_available",
    GuildUnavailable => "guild_unavailable",
    VoiceStateUpdate => "voice_state_update",
    MemberBan => "member_ban",
    MemberUnban => "member_unban",
    GroupJoin => "group_join",
    GroupRemove => "group_remove",
    RelationshipAdd => "relationship_add",
    RelationshipRemove => "relationship_remove",
    RelationshipUpdate => "relationship_update",
}

impl EventKind {
    /// Returns `true` for every kind except [`EventKind::Unknown`].
    pub fn is_known(&self) -> bool {
        !matches!(self, EventKind::Unknown)
    }
}

impl FromStr for EventKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_catalog() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_name(kind.as_str()), *kind);
        }
    }

    #[test]
    fn test_unrecognized_name_is_unknown() {
        assert_eq!(EventKind::from_name("presence_update"), EventKind::Unknown);
        assert_eq!(EventKind::from_name(""), EventKind::Unknown);
        assert!(!EventKind::Unknown.is_known());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&EventKind::ReactionAdd).unwrap();
        assert_eq!(json, "\"reaction_add\"");

        let kind: EventKind = serde_json::from_str("\"member_join\"").unwrap();
        assert_eq!(kind, EventKind::MemberJoin);

        let kind: EventKind = serde_json::from_str("\"whatever\"").unwrap();
        assert_eq!(kind, EventKind::Unknown);
    }
}
