//! Discord REST and gateway clients.

mod client;
mod dto;
pub mod gateway;

pub use client::DiscordClient;
pub use gateway::{
    DispatchEvent, GatewayClient, GatewayClientConfig, GatewayError, GatewayEventKind,
    GatewayIntents,
};
