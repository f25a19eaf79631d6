//! Application layer with use cases and services.

/// Stateless helpers.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use services::EmojiParser;
pub use use_cases::{
    CommandOutcome, PassiveOutcome, PassiveSettings, PassiveUpscaleUseCase,
    UpscaleCommandUseCase, UpscaleEmojiUseCase,
};
