//! Messages and reactions seen by the bot.

use super::{ChannelId, EmojiId, GuildId, MessageId, UserId};

/// Author of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAuthor {
    pub id: UserId,
    pub username: String,
    pub bot: bool,
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub guild_id: Option<GuildId>,
    pub author: MessageAuthor,
    pub content: String,
}

impl Message {
    /// Returns whether the message was written by a bot account.
    #[must_use]
    pub const fn is_from_bot(&self) -> bool {
        self.author.bot
    }
}

/// Emoji used in a reaction. Unicode emoji have no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEmoji {
    pub id: Option<EmojiId>,
    pub name: Option<String>,
    pub animated: bool,
}

impl ReactionEmoji {
    /// Returns whether this reaction is the given unicode emoji.
    #[must_use]
    pub fn is_unicode(&self, emoji: &str) -> bool {
        self.id.is_none() && self.name.as_deref() == Some(emoji)
    }
}

/// A reaction added to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionAdd {
    pub user_id: UserId,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub guild_id: Option<GuildId>,
    pub emoji: ReactionEmoji,
    pub user_is_bot: bool,
}
