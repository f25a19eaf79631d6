//! Use case implementations.

mod passive_upscale_use_case;
mod upscale_command_use_case;
mod upscale_emoji_use_case;

pub use passive_upscale_use_case::{
    MISSING_EMOJI_MESSAGE, PassiveOutcome, PassiveSettings, PassiveUpscaleUseCase,
};
pub use upscale_command_use_case::{
    CommandOutcome, FAILURE_MESSAGE, INVALID_EMOJI_MESSAGE, UpscaleCommandUseCase,
};
pub use upscale_emoji_use_case::UpscaleEmojiUseCase;
