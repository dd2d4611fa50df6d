//! Parameter catalog for event normalization.
//!
//! Raw events arrive with positional arguments only. The catalog names those
//! arguments per event kind so that [`Normalize`](crate::Normalize) can bind
//! them as keyword arguments. A kind without an entry is left untouched.

use std::collections::HashMap;

use strand_core::EventKind;

/// The built-in parameter names of every catalogued event.
const BUILTIN: &[(EventKind, &[&str])] = &[
    (EventKind::Connect, &[]),
    (EventKind::Ready, &[]),
    (EventKind::ShardReady, &["shard_id"]),
    (EventKind::Resumed, &[]),
    (EventKind::Error, &[]),
    (EventKind::SocketRawReceive, &["msg"]),
    (EventKind::SocketRawSend, &["payload"]),
    (EventKind::Typing, &["channel", "user", "when"]),
    (EventKind::Message, &["message"]),
    (EventKind::MessageDelete, &["message"]),
    (EventKind::RawMessageDelete, &["payload"]),
    (EventKind::RawBulkMessageDelete, &["payload"]),
    (EventKind::MessageEdit, &["before", "after"]),
    (EventKind::RawMessageEdit, &["payload"]),
    (EventKind::ReactionAdd, &["reaction", "user"]),
    (EventKind::RawReactionAdd, &["payload"]),
    (EventKind::ReactionRemove, &["reaction", "user"]),
    (EventKind::RawReactionRemove, &["payload"]),
    (EventKind::ReactionClear, &["message", "reactions"]),
    (EventKind::RawReactionClear, &["payload"]),
    (EventKind::PrivateChannelCreate, &["channel"]),
    (EventKind::PrivateChannelDelete, &["channel"]),
    (EventKind::PrivateChannelUpdate, &["before", "after"]),
    (EventKind::PrivateChannelPinsUpdate, &["channel", "last_pin"]),
    (EventKind::GuildChannelCreate, &["channel"]),
    (EventKind::GuildChannelDelete, &["channel"]),
    (EventKind::GuildChannelUpdate, &["before", "after"]),
    (EventKind::GuildChannelPinsUpdate, &["channel", "last_pin"]),
    (EventKind::MemberJoin, &["member"]),
    (EventKind::MemberRemove, &["member"]),
    (EventKind::MemberUpdate, &["before", "after"]),
    (EventKind::GuildJoin, &["guild"]),
    (EventKind::GuildRemove, &["guild"]),
    (EventKind::GuildUpdate, &["before", "after"]),
    (EventKind::GuildRoleCreate, &["role"]),
    (EventKind::GuildRoleDelete, &["role"]),
    (EventKind::GuildRoleUpdate, &["before", "after"]),
    (EventKind::GuildEmojisUpdate, &["guild", "before", "after"]),
    (EventKind::GuildAvailable, &["guild"]),
    (EventKind::GuildUnavailable, &["guild"]),
    (EventKind::VoiceStateUpdate, &["member", "before", "after"]),
    (EventKind::MemberBan, &["guild", "user"]),
    (EventKind::MemberUnban, &["guild", "user"]),
    (EventKind::GroupJoin, &["channel", "user"]),
    (EventKind::GroupRemove, &["channel", "user"]),
    (EventKind::RelationshipAdd, &["relationship"]),
    (EventKind::RelationshipRemove, &["relationship"]),
    (EventKind::RelationshipUpdate, &["before", "after"]),
];

/// Maps event kinds to the names of their leading positional arguments.
///
/// [`Catalog::default`] holds the built-in table. Entries for
/// [`EventKind::Unknown`] are never stored: an unrecognized event always
/// passes through normalization untouched.
///
/// # Example
///
/// ```rust,ignore
/// let mut catalog = Catalog::default();
/// assert_eq!(catalog.get(EventKind::Typing), Some(&["channel".to_string(), "user".into(), "when".into()][..]));
///
/// catalog.insert(EventKind::Ready, ["session"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    params: HashMap<EventKind, Vec<String>>,
}

impl Catalog {
    /// Creates a catalog with no entries.
    pub fn empty() -> Self {
        Self {
            params: HashMap::new(),
        }
    }

    /// Sets the parameter names of `kind`, returning the previous ones.
    pub fn insert<I, S>(&mut self, kind: EventKind, names: I) -> Option<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !kind.is_known() {
            return None;
        }
        self.params
            .insert(kind, names.into_iter().map(Into::into).collect())
    }

    /// Sets the parameter names of `kind` (builder pattern).
    pub fn with<I, S>(mut self, kind: EventKind, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(kind, names);
        self
    }

    /// Removes the entry for `kind`, so that its events pass through untouched.
    pub fn remove(&mut self, kind: EventKind) -> Option<Vec<String>> {
        self.params.remove(&kind)
    }

    /// Returns the parameter names of `kind`, if catalogued.
    pub fn get(&self, kind: EventKind) -> Option<&[String]> {
        self.params.get(&kind).map(Vec::as_slice)
    }

    /// Returns `true` if `kind` has an entry.
    pub fn contains(&self, kind: EventKind) -> bool {
        self.params.contains_key(&kind)
    }

    /// Copies every entry of `other` into this catalog, replacing existing ones.
    pub fn merge(&mut self, other: Catalog) {
        self.params.extend(other.params);
    }

    /// Returns the number of catalogued kinds.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if nothing is catalogued.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterates over the entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (EventKind, &[String])> {
        self.params.iter().map(|(kind, names)| (*kind, names.as_slice()))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let params = BUILTIN
            .iter()
            .map(|(kind, names)| (*kind, names.iter().map(|n| n.to_string()).collect()))
            .collect();
        Self { params }
    }
}
