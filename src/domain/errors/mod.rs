//! Domain error types.

mod discord_error;
mod upscale_error;

pub use discord_error::DiscordError;
pub use upscale_error::UpscaleError;
