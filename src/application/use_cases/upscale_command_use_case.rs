//! `/upscale` slash command handling.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::application::services::EmojiParser;
use crate::application::use_cases::UpscaleEmojiUseCase;
use crate::domain::entities::{EMBED_COLOR, Embed, FileAttachment, Interaction, ScaleFactor};
use crate::domain::errors::DiscordError;
use crate::domain::ports::{DiscordRestPort, EditResponseRequest};

/// Reply sent when the `emoji` option is not a single custom emoji.
pub const INVALID_EMOJI_MESSAGE: &str =
    "Please provide a valid custom emoji! Default Discord emojis cannot be upscaled.";

/// Text shown when fetching or enhancing fails.
pub const FAILURE_MESSAGE: &str = "Failed to upscale the emoji. Please try again later.";

/// Result of one command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The input was not a custom emoji; nothing was processed.
    Rejected,
    /// The upscaled file was delivered.
    Delivered { filename: String },
    /// Processing failed and the failure message was shown.
    Failed,
}

/// Validates, defers and answers an `/upscale` interaction.
#[derive(Clone)]
pub struct UpscaleCommandUseCase {
    rest: Arc<dyn DiscordRestPort>,
    upscale: UpscaleEmojiUseCase,
}

impl UpscaleCommandUseCase {
    #[must_use]
    pub const fn new(rest: Arc<dyn DiscordRestPort>, upscale: UpscaleEmojiUseCase) -> Self {
        Self { rest, upscale }
    }

    /// Handles one interaction end to end.
    ///
    /// # Errors
    /// Returns error only when a Discord REST call fails.
    pub async fn execute(&self, interaction: &Interaction) -> Result<CommandOutcome, DiscordError> {
        let data = interaction.data.as_ref();
        let input = data.and_then(|d| d.string_option("emoji")).unwrap_or_default();
        let scale = data
            .and_then(|d| d.integer_option("scale"))
            .and_then(ScaleFactor::from_i64)
            .unwrap_or_default();

        let emoji = match EmojiParser::parse_exact(input) {
            Ok(emoji) => emoji,
            Err(e) => {
                debug!(error = %e, "Rejecting command input");
                self.rest
                    .respond_to_interaction(&interaction.reference, INVALID_EMOJI_MESSAGE)
                    .await?;
                return Ok(CommandOutcome::Rejected);
            }
        };

        self.rest.defer_interaction(&interaction.reference).await?;

        match self.upscale.execute(&emoji, scale).await {
            Ok(attachment) => {
                let filename = attachment.filename().to_string();
                let request = EditResponseRequest::default()
                    .with_embed(Self::result_embed(emoji.display_name(), scale, &attachment))
                    .with_attachment(attachment);
                self.rest
                    .edit_original_response(&interaction.reference, request)
                    .await?;
                info!(filename = %filename, "Delivered upscaled emoji to command");
                Ok(CommandOutcome::Delivered { filename })
            }
            Err(e) => {
                error!(error = %e, emoji = %emoji, "Command upscale failed");
                self.rest
                    .edit_original_response(
                        &interaction.reference,
                        EditResponseRequest::text(FAILURE_MESSAGE),
                    )
                    .await?;
                Ok(CommandOutcome::Failed)
            }
        }
    }

    fn result_embed(name: &str, scale: ScaleFactor, attachment: &FileAttachment) -> Embed {
        Embed::new()
            .with_title(format!("Upscaled {name}"))
            .with_color(EMBED_COLOR)
            .with_image(attachment.attachment_url())
            .with_footer(format!("Upscaled {scale}x using advanced algorithms"))
            .with_timestamp(Utc::now())
    }
}
