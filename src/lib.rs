//! emoji-upscaler - A Discord bot that enlarges custom emojis.
//!
//! Custom emoji found in slash commands, messages and reactions are fetched
//! from the CDN, run through a sharpening and resampling pipeline and posted
//! back as a 512x512 image.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases and services.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer routing gateway events.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "emoji-upscaler";
