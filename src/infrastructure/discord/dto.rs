use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    ChannelId, Embed, FileAttachment, GuildId, Message, MessageAuthor, MessageId, UserId,
};
use crate::domain::errors::DiscordError;

/// Interaction callback type for an immediate channel message.
pub const CALLBACK_CHANNEL_MESSAGE: u8 = 4;
/// Interaction callback type for a deferred channel message.
pub const CALLBACK_DEFERRED_CHANNEL_MESSAGE: u8 = 5;

/// Discord API error response structure.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    /// Error message from Discord.
    pub message: String,
    /// Numeric JSON error code.
    #[serde(default)]
    pub code: Option<u64>,
}

/// Body of a 429 response.
#[derive(Debug, Deserialize)]
pub struct RateLimitResponse {
    /// Seconds until the bucket resets.
    pub retry_after: f64,
}

/// Discord API user object (subset).
#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub bot: bool,
}

/// Discord API message object (subset).
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub channel_id: String,
    #[serde(default)]
    pub guild_id: Option<String>,
    pub author: UserResponse,
    #[serde(default)]
    pub content: String,
}

impl MessageResponse {
    /// Converts into the domain message.
    ///
    /// # Errors
    /// Returns error if any snowflake is malformed.
    pub fn into_domain(self) -> Result<Message, DiscordError> {
        Ok(Message {
            id: parse_id(&self.id, "message id", MessageId::parse)?,
            channel_id: parse_id(&self.channel_id, "channel id", ChannelId::parse)?,
            guild_id: self.guild_id.as_deref().and_then(GuildId::parse),
            author: MessageAuthor {
                id: parse_id(&self.author.id, "author id", UserId::parse)?,
                username: self.author.username,
                bot: self.author.bot,
            },
            content: self.content,
        })
    }
}

/// Parses a snowflake string with a descriptive error.
///
/// # Errors
/// Returns `InvalidResponse` when the value is not a snowflake.
pub fn parse_id<T>(
    value: &str,
    what: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, DiscordError> {
    parse(value).ok_or_else(|| DiscordError::invalid_response(format!("invalid {what}: {value}")))
}

#[derive(Debug, Serialize)]
pub struct CallbackData<'a> {
    pub content: &'a str,
}

/// Body of `POST /interactions/{id}/{token}/callback`.
#[derive(Debug, Serialize)]
pub struct InteractionCallback<'a> {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<CallbackData<'a>>,
}

impl<'a> InteractionCallback<'a> {
    #[must_use]
    pub const fn deferred() -> Self {
        Self {
            kind: CALLBACK_DEFERRED_CHANNEL_MESSAGE,
            data: None,
        }
    }

    #[must_use]
    pub const fn message(content: &'a str) -> Self {
        Self {
            kind: CALLBACK_CHANNEL_MESSAGE,
            data: Some(CallbackData { content }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EmbedImage<'a> {
    pub url: &'a str,
}

#[derive(Debug, Serialize)]
pub struct EmbedFooter<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub struct EmbedPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl<'a> From<&'a Embed> for EmbedPayload<'a> {
    fn from(embed: &'a Embed) -> Self {
        Self {
            title: embed.title.as_deref(),
            color: embed.color,
            image: embed.image_url.as_deref().map(|url| EmbedImage { url }),
            footer: embed.footer.as_deref().map(|text| EmbedFooter { text }),
            timestamp: embed.timestamp.map(|ts| ts.to_rfc3339()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AttachmentPayload<'a> {
    pub id: u32,
    pub filename: &'a str,
}

#[derive(Debug, Serialize)]
pub struct MessageReference {
    pub message_id: String,
}

/// JSON part of a message create or webhook edit request.
#[derive(Debug, Serialize)]
pub struct MessagePayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<&'a str>,
    pub embeds: Vec<EmbedPayload<'a>>,
    pub attachments: Vec<AttachmentPayload<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_reference: Option<MessageReference>,
}

impl<'a> MessagePayload<'a> {
    #[must_use]
    pub fn new(
        content: Option<&'a str>,
        embeds: &'a [Embed],
        attachment: Option<&'a FileAttachment>,
    ) -> Self {
        Self {
            content,
            embeds: embeds.iter().map(EmbedPayload::from).collect(),
            attachments: attachment
                .map(|file| AttachmentPayload {
                    id: 0,
                    filename: file.filename(),
                })
                .into_iter()
                .collect(),
            message_reference: None,
        }
    }

    #[must_use]
    pub fn replying_to(mut self, message_id: Option<MessageId>) -> Self {
        self.message_reference = message_id.map(|id| MessageReference {
            message_id: id.to_string(),
        });
        self
    }
}
