//! Domain entity definitions.

mod attachment;
mod command;
mod embed;
mod emoji;
mod enhancement;
mod ids;
mod interaction;
mod message;
mod token;

pub use attachment::FileAttachment;
pub use command::{ApplicationCommand, CommandChoice, CommandOption, CommandOptionKind};
pub use embed::{EMBED_COLOR, Embed};
pub use emoji::{EMOJI_CDN_BASE, EMOJI_CDN_SIZE, EmojiReference};
pub use enhancement::{EnhancedImage, EnhancementOptions, OutputFormat, ScaleFactor};
pub use ids::{ApplicationId, ChannelId, EmojiId, GuildId, InteractionId, MessageId, UserId};
pub use interaction::{CommandData, Interaction, InteractionKind, InteractionRef, OptionValue};
pub use message::{Message, MessageAuthor, ReactionAdd, ReactionEmoji};
pub use token::AuthToken;
