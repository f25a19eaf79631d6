//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Discord REST and gateway clients.
pub mod discord;
/// Emoji fetching and enhancement.
pub mod image;

pub use config::{AppConfig, CliArgs, ConfigStore, LogLevel};
pub use discord::{
    DiscordClient, DispatchEvent, GatewayClient, GatewayClientConfig, GatewayEventKind,
    GatewayIntents,
};
pub use image::{HttpAssetFetcher, ImageEnhancer};
