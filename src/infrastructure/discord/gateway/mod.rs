//! Discord gateway websocket client.

mod client;
mod codec;
mod connection;
mod constants;
mod error;
mod events;
mod heartbeat;
mod payloads;
mod session;
mod state;

pub use client::{ConnectionFactory, GatewayClient, GatewayClientConfig};
pub use connection::{GatewayConnection, WebSocketConnection};
pub use constants::{GatewayIntent, GatewayIntents};
pub use error::{GatewayError, GatewayResult, Recovery};
pub use events::{DispatchEvent, GatewayEventKind};
pub use payloads::{GatewayMessage, GatewayPayload};
