//! Message and reaction triggered upscaling.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::application::services::EmojiParser;
use crate::application::use_cases::{FAILURE_MESSAGE, UpscaleEmojiUseCase};
use crate::domain::entities::{
    ChannelId, EmojiReference, Message, MessageId, ReactionAdd, ScaleFactor,
};
use crate::domain::errors::DiscordError;
use crate::domain::ports::{DiscordRestPort, SendMessageRequest};

/// Reply to a prefixed command that carries no custom emoji.
pub const MISSING_EMOJI_MESSAGE: &str = "Please include a custom emoji to upscale!";

/// Behaviour switches for passive triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassiveSettings {
    /// Upscale any message that contains a custom emoji.
    pub auto_upscale: bool,
    /// Prefix that always triggers processing.
    pub command_prefix: String,
    /// Unicode reaction that triggers processing of the reacted message.
    pub reaction_emoji: String,
    /// Delete the triggering message after a successful post.
    pub delete_trigger_message: bool,
    /// Post the failure message instead of staying silent.
    pub notify_failures: bool,
}

impl Default for PassiveSettings {
    fn default() -> Self {
        Self {
            auto_upscale: true,
            command_prefix: "!upscale".to_string(),
            reaction_emoji: "🔍".to_string(),
            delete_trigger_message: true,
            notify_failures: false,
        }
    }
}

/// Result of handling one passive trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassiveOutcome {
    /// The event was not a trigger.
    Ignored,
    /// A prefixed command without an emoji was answered with a hint.
    Prompted,
    /// The upscaled file was posted.
    Delivered { filename: String },
    /// Fetching or enhancing failed.
    Failed,
}

/// Handles messages and reactions that ask for an upscale implicitly.
#[derive(Clone)]
pub struct PassiveUpscaleUseCase {
    rest: Arc<dyn DiscordRestPort>,
    upscale: UpscaleEmojiUseCase,
    settings: PassiveSettings,
}

impl PassiveUpscaleUseCase {
    #[must_use]
    pub const fn new(
        rest: Arc<dyn DiscordRestPort>,
        upscale: UpscaleEmojiUseCase,
        settings: PassiveSettings,
    ) -> Self {
        Self {
            rest,
            upscale,
            settings,
        }
    }

    /// Handles a newly created message.
    ///
    /// # Errors
    /// Returns error when posting to the channel fails.
    pub async fn on_message(&self, message: &Message) -> Result<PassiveOutcome, DiscordError> {
        if message.is_from_bot() {
            return Ok(PassiveOutcome::Ignored);
        }

        let is_command = message
            .content
            .trim_start()
            .starts_with(&self.settings.command_prefix);
        if !is_command && !self.settings.auto_upscale {
            return Ok(PassiveOutcome::Ignored);
        }

        let Some(emoji) = EmojiParser::first_emoji(&message.content) else {
            if is_command {
                let request = SendMessageRequest::new(message.channel_id)
                    .with_content(MISSING_EMOJI_MESSAGE)
                    .with_reply(message.id);
                self.rest.send_message(request).await?;
                return Ok(PassiveOutcome::Prompted);
            }
            return Ok(PassiveOutcome::Ignored);
        };

        debug!(message_id = %message.id, emoji = %emoji, is_command, "Message trigger");
        let trigger = self
            .settings
            .delete_trigger_message
            .then_some(message.id);
        self.deliver(message.channel_id, &emoji, trigger).await
    }

    /// Handles a reaction added to a message.
    ///
    /// # Errors
    /// Returns error when the reacted message cannot be fetched or posting fails.
    pub async fn on_reaction(&self, reaction: &ReactionAdd) -> Result<PassiveOutcome, DiscordError> {
        if reaction.user_is_bot || !reaction.emoji.is_unicode(&self.settings.reaction_emoji) {
            return Ok(PassiveOutcome::Ignored);
        }

        let message = self
            .rest
            .get_message(reaction.channel_id, reaction.message_id)
            .await?;

        let Some(emoji) = EmojiParser::first_emoji(&message.content) else {
            debug!(message_id = %message.id, "Reacted message has no custom emoji");
            return Ok(PassiveOutcome::Ignored);
        };

        debug!(message_id = %message.id, emoji = %emoji, "Reaction trigger");
        self.deliver(reaction.channel_id, &emoji, None).await
    }

    async fn deliver(
        &self,
        channel_id: ChannelId,
        emoji: &EmojiReference,
        delete_after: Option<MessageId>,
    ) -> Result<PassiveOutcome, DiscordError> {
        let attachment = match self.upscale.execute(emoji, ScaleFactor::default()).await {
            Ok(attachment) => attachment,
            Err(e) => {
                error!(error = %e, emoji = %emoji, channel_id = %channel_id, "Passive upscale failed");
                if self.settings.notify_failures {
                    let request = SendMessageRequest::new(channel_id).with_content(FAILURE_MESSAGE);
                    self.rest.send_message(request).await?;
                }
                return Ok(PassiveOutcome::Failed);
            }
        };

        let filename = attachment.filename().to_string();
        self.rest
            .send_message(SendMessageRequest::new(channel_id).with_attachment(attachment))
            .await?;
        info!(filename = %filename, channel_id = %channel_id, "Posted upscaled emoji");

        if let Some(message_id) = delete_after
            && let Err(e) = self.rest.delete_message(channel_id, message_id).await
        {
            debug!(error = %e, message_id = %message_id, "Could not delete trigger message");
        }

        Ok(PassiveOutcome::Delivered { filename })
    }
}
