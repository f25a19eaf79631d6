//! Presentation layer wiring gateway events to use cases.

/// Gateway event router.
pub mod bot;
/// Slash command definitions.
pub mod commands;

pub use bot::{BotExit, UpscaleBot};
pub use commands::{all_commands, upscale_command};
