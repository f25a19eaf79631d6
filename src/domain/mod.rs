//! Domain layer with core entities, error types and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{AuthToken, EmojiReference, EnhancementOptions, ScaleFactor};
pub use errors::{DiscordError, UpscaleError};
pub use ports::{AssetFetcherPort, DiscordRestPort, ImageEnhancerPort};
