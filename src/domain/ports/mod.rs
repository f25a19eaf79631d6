mod asset_fetcher_port;
mod discord_rest_port;
mod image_enhancer_port;

pub use asset_fetcher_port::AssetFetcherPort;
pub use discord_rest_port::{DiscordRestPort, EditResponseRequest, SendMessageRequest};
pub use image_enhancer_port::ImageEnhancerPort;
